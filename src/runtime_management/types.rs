//! Core types used by the runtime management subsystem.

use std::collections::HashMap;
use std::fmt;

use crate::error_handling::types::RuntimeError;

/// Semantic container state as reported by the external runtime tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeState {
    /// No status information observed yet.
    Unknown,
    /// The tool answered but the container is not schedulable yet.
    NotYetReady,
    /// The container is up.
    Running,
    /// Any other state string the tool reported.
    Other(String),
}

impl RuntimeState {
    /// Maps the raw `state` field of a status report.
    pub fn from_report(state: &str) -> Self {
        match state {
            "running" => RuntimeState::Running,
            other => RuntimeState::Other(other.to_string()),
        }
    }

    pub fn is_running(&self) -> bool {
        *self == RuntimeState::Running
    }
}

impl fmt::Display for RuntimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeState::Unknown => write!(f, "unknown"),
            RuntimeState::NotYetReady => write!(f, "not-yet-ready"),
            RuntimeState::Running => write!(f, "running"),
            RuntimeState::Other(state) => write!(f, "{}", state),
        }
    }
}

/// Decoded output of the runtime tool's status command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub state: RuntimeState,
    /// Process id of the container; only reported while running.
    pub pid: Option<i32>,
}

impl StatusReport {
    /// Builds a report from parsed key/value pairs.
    ///
    /// A missing `state` key is a structural error, as is a missing or
    /// unparsable `pid` alongside a running state. A `pid` reported with
    /// any other state is ignored; it is only meaningful while running.
    pub fn from_keyval(data: &HashMap<String, String>) -> Result<Self, RuntimeError> {
        let state = data.get("state").ok_or_else(|| {
            RuntimeError::MalformedStatus("status output has no state field".to_string())
        })?;
        let state = RuntimeState::from_report(state);
        let pid = if state.is_running() {
            let raw = data.get("pid").ok_or_else(|| {
                RuntimeError::MalformedStatus("status output has no pid field".to_string())
            })?;
            Some(raw.parse::<i32>().map_err(|_| {
                RuntimeError::MalformedStatus(format!("unparsable pid {:?}", raw))
            })?)
        } else {
            None
        };
        Ok(StatusReport { state, pid })
    }
}
