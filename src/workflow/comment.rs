use crate::entity::IdeaStatus;
use crate::error::{IdeaflowError, Result};

/// Whether an outcome demands a non-blank comment
pub fn requires_comment(outcome: IdeaStatus) -> bool {
    matches!(outcome, IdeaStatus::Accepted | IdeaStatus::Rejected)
}

/// Final outcomes need a reason; `UnderReview` takes any comment, including none.
pub fn validate_comment(outcome: IdeaStatus, comment: &str) -> Result<()> {
    if requires_comment(outcome) && comment.trim().is_empty() {
        return Err(IdeaflowError::InvalidComment {
            outcome,
            message: format!("Comment is required for {} outcome.", outcome),
        });
    }
    Ok(())
}

pub fn is_valid_comment(outcome: IdeaStatus, comment: &str) -> bool {
    validate_comment(outcome, comment).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_outcomes_need_text() {
        for outcome in [IdeaStatus::Accepted, IdeaStatus::Rejected] {
            assert!(!is_valid_comment(outcome, ""));
            assert!(!is_valid_comment(outcome, "   "));
            assert!(!is_valid_comment(outcome, "\n\t"));
            assert!(is_valid_comment(outcome, "x"));
        }
    }

    #[test]
    fn test_under_review_comment_is_optional() {
        assert!(is_valid_comment(IdeaStatus::UnderReview, ""));
        assert!(is_valid_comment(IdeaStatus::UnderReview, "   "));
        assert!(is_valid_comment(IdeaStatus::UnderReview, "taking a look"));
    }

    #[test]
    fn test_error_names_the_outcome() {
        let err = validate_comment(IdeaStatus::Rejected, " ").unwrap_err();
        match &err {
            IdeaflowError::InvalidComment { outcome, message } => {
                assert_eq!(*outcome, IdeaStatus::Rejected);
                assert!(message.contains("Rejected"));
            }
            other => panic!("Expected InvalidComment, got {:?}", other),
        }
        assert_eq!(err.to_string(), "Comment is required for Rejected outcome.");
    }
}
