use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Result envelope every command produces; the CLI renders it as styled
/// text or a JSON response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

impl CommandStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandStatus::Ok => "ok",
            CommandStatus::UserError => "user-error",
            CommandStatus::Failure => "failure",
        }
    }
}

/// Error carrier for conditions the user can fix; command layers downcast
/// it out of `anyhow::Error` and turn it into a `UserError` outcome instead
/// of bubbling a report.
#[derive(thiserror::Error, Debug)]
#[error("{message}")]
pub struct UserError {
    pub(crate) message: String,
    pub(crate) details: Value,
}

impl UserError {
    pub fn new(message: impl Into<String>, details: Value) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn details(&self) -> &Value {
        &self.details
    }
}

/// Turns a `UserError` buried in `err` into a `UserError` outcome; any
/// other error keeps bubbling.
pub fn outcome_from_error(err: anyhow::Error) -> anyhow::Result<ExecutionOutcome> {
    match err.downcast::<UserError>() {
        Ok(user) => Ok(ExecutionOutcome::user_error(user.message, user.details)),
        Err(other) => Err(other),
    }
}

#[must_use]
pub fn to_json_response(command: &str, outcome: &ExecutionOutcome, code: i32) -> Value {
    json!({
        "command": command,
        "status": outcome.status.as_str(),
        "code": code,
        "message": outcome.message,
        "details": outcome.details,
    })
}
