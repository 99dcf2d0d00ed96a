//! Failure type for calls across the lineage service boundary.

use std::fmt;

/// Which remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    ListProcesses,
    CreateProcess,
    CreateRun,
    CreateLineageEvent,
    DeleteProcess,
    GetProcess,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RemoteOperation::ListProcesses => "list processes",
            RemoteOperation::CreateProcess => "create process",
            RemoteOperation::CreateRun => "create run",
            RemoteOperation::CreateLineageEvent => "create lineage event",
            RemoteOperation::DeleteProcess => "delete process",
            RemoteOperation::GetProcess => "get process",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {message}")]
pub struct RemoteError {
    pub operation: RemoteOperation,
    pub message: String,
}

impl RemoteError {
    pub fn new(operation: RemoteOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// A window bound that cannot be written as `YYYY-MM-DDTHH:MM:SS.sssZ`.
#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error("year {0} is outside 0000-9999")]
    YearOutOfRange(i32),
    #[error("failed to format timestamp: {0}")]
    Format(#[from] time::error::Format),
}
