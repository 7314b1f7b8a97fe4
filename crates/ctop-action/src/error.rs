//! Error types for the action server.

use ctop_recommend::RecommendError;

/// Errors from action lookup and execution.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("No registered action found for name '{0}'.")]
    UnknownAction(String),
    #[error("Action '{action}' rejected execution: {reason}")]
    Rejected { action: String, reason: String },
    #[error(transparent)]
    Recommend(#[from] RecommendError),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        ActionError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::UnknownAction("action_do_magic".to_string());
        assert_eq!(
            err.to_string(),
            "No registered action found for name 'action_do_magic'."
        );

        let err = ActionError::Rejected {
            action: "action_navigate_to_node_analytics".to_string(),
            reason: "missing tracker".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Action 'action_navigate_to_node_analytics' rejected execution: missing tracker"
        );
    }

    #[test]
    fn test_action_error_from_recommend_error() {
        let err: ActionError =
            RecommendError::InvalidArgument("`text` must be a string".to_string()).into();
        assert!(matches!(err, ActionError::Recommend(_)));
        assert_eq!(err.to_string(), "Invalid argument: `text` must be a string");
    }

    #[test]
    fn test_action_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let action_err: ActionError = err.unwrap_err().into();
        assert!(matches!(action_err, ActionError::Serialization(_)));
    }
}
