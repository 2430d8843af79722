use assert_cmd::cargo::cargo_bin_cmd;

fn help_output(args: &[&str]) -> String {
    let assert = cargo_bin_cmd!("duck").args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 help")
}

#[test]
fn top_level_help_lists_commands_and_examples() {
    let output = help_output(&["--help"]);
    assert!(output.contains("get"), "get missing from help: {output}");
    assert!(output.contains("repo"), "repo missing from help: {output}");
    assert!(
        output.contains("duck get snwfdhmp/go"),
        "example missing: {output}"
    );
}

#[test]
fn get_help_mentions_flags_and_package_pattern() {
    let output = help_output(&["get", "--help"]);
    assert!(
        output.contains("--force"),
        "force flag missing: {output}"
    );
    assert!(
        output.contains("--no-check"),
        "no-check flag missing: {output}"
    );
    assert!(
        output.contains("--global"),
        "global flag missing: {output}"
    );
    assert!(
        output.contains("'author/name'"),
        "package pattern missing: {output}"
    );
}

#[test]
fn repo_add_help_shows_url_convention() {
    let output = help_output(&["repo", "add", "--help"]);
    assert!(
        output.contains(".duckpkg.ini"),
        "manifest convention missing: {output}"
    );
}
