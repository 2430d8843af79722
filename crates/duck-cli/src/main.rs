use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use duck_core::{ExecutionOutcome, GetRequest, RepoScope};

mod output;
mod style;

use output::OutputOptions;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = DuckCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let opts = OutputOptions {
        quiet: cli.quiet,
        json: cli.json,
        no_color: cli.no_color,
    };

    let (command, outcome) = dispatch(&cli.command).map_err(|err| eyre!("{err:?}"))?;
    let code = output::emit_output(&opts, command, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("duck_core={level},duck_cli={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn dispatch(command: &DuckCommand) -> anyhow::Result<(&'static str, ExecutionOutcome)> {
    match command {
        DuckCommand::Get(args) => {
            let request = GetRequest {
                packages: args.packages.clone(),
                force: args.force,
                no_check: args.no_check,
                global: args.global,
            };
            Ok(("get", duck_core::get_packages(&request)?))
        }
        DuckCommand::Repo(repo) => {
            let cwd = std::env::current_dir()?;
            match repo {
                RepoCommand::List(args) => Ok((
                    "repo list",
                    duck_core::repo_list(scope_for(args.global), &cwd)?,
                )),
                RepoCommand::Add(args) => Ok((
                    "repo add",
                    duck_core::repo_add(scope_for(args.global), &cwd, &args.name, &args.url)?,
                )),
            }
        }
    }
}

fn scope_for(global: bool) -> RepoScope {
    if global {
        RepoScope::Global
    } else {
        RepoScope::Project
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fetch packages from your configured repositories",
    long_about = "duck get <package> looks for <package> in your configured repositories \
and downloads it from the first repository where it is available.\n\n\
Packages are named following the 'author/name' pattern (ie: 'snwfdhmp/go').",
    after_help = "Examples:\n  duck get snwfdhmp/go\n  duck get -g snwfdhmp/go\n  duck repo list\n"
)]
struct DuckCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)"
    )]
    quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q")]
    trace: bool,
    #[arg(long, help = "Emit {status,message,details} JSON envelopes")]
    json: bool,
    #[arg(long, help = "Disable colored human output")]
    no_color: bool,
    #[command(subcommand)]
    command: DuckCommand,
}

#[derive(Subcommand, Debug)]
enum DuckCommand {
    #[command(
        about = "Download packages from the first repository that provides them.",
        override_usage = "duck get [-f] [-g] [--no-check] <PACKAGE>...",
        after_help = "Examples:\n  duck get snwfdhmp/go\n  duck get -f snwfdhmp/go snwfdhmp/node\n"
    )]
    Get(GetArgs),
    #[command(subcommand, about = "Manage your package repositories")]
    Repo(RepoCommand),
}

#[derive(Args, Debug)]
struct GetArgs {
    #[arg(
        value_name = "PACKAGE",
        required = true,
        help = "Package names following the 'author/name' pattern"
    )]
    packages: Vec<String>,
    #[arg(short, long, help = "Replace the manifest if the package is already installed")]
    force: bool,
    #[arg(
        short,
        long,
        help = "Install for the user instead of the current project"
    )]
    global: bool,
    #[arg(
        long = "no-check",
        help = "Skip file/folder existence checking and continue past creation errors"
    )]
    no_check: bool,
}

#[derive(Subcommand, Debug)]
enum RepoCommand {
    #[command(
        about = "List configured repositories in priority order.",
        after_help = "Example:\n  duck repo list\n"
    )]
    List(RepoScopeArgs),
    #[command(
        about = "Add or replace a repository (NAME => URL).",
        override_usage = "duck repo add <NAME> <URL>",
        after_help = "Example:\n  duck repo add core http://raw.githubusercontent.com/snwfdhmp/duck-core/master/\n"
    )]
    Add(RepoAddArgs),
}

#[derive(Args, Debug)]
struct RepoScopeArgs {
    #[arg(short, long, help = "Use the user-global configuration")]
    global: bool,
}

#[derive(Args, Debug)]
struct RepoAddArgs {
    #[arg(value_name = "NAME")]
    name: String,
    #[arg(
        value_name = "URL",
        help = "Base URL; manifests resolve to <URL><package>.duckpkg.ini"
    )]
    url: String,
    #[arg(short, long, help = "Use the user-global configuration")]
    global: bool,
}
