//! Result codes returned by command bodies and the dispatcher.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one command invocation.
///
/// Bodies return `Success` or `Failure`. `Terminated` and `Invalid` are
/// produced by the dispatcher: `Terminated` when the body errored,
/// panicked, or could not be scheduled, `Invalid` when input failed to
/// resolve and the body never ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    /// The command completed normally
    Success,
    /// The command ran and reported failure
    Failure,
    /// The command body raised an error
    Terminated,
    /// Input could not be resolved to a command
    Invalid,
}

impl ResultCode {
    /// Whether this is [`ResultCode::Success`].
    pub fn is_success(self) -> bool {
        self == ResultCode::Success
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            ResultCode::Success => "SUCCESS",
            ResultCode::Failure => "FAILURE",
            ResultCode::Terminated => "TERMINATED",
            ResultCode::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for ResultCode {
    fn from(ok: bool) -> Self {
        if ok {
            ResultCode::Success
        } else {
            ResultCode::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(ResultCode::Invalid.to_string(), "INVALID");
        assert_eq!(ResultCode::Terminated.as_str(), "TERMINATED");
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(ResultCode::from(true), ResultCode::Success);
        assert_eq!(ResultCode::from(false), ResultCode::Failure);
    }
}
