//! Status transition policy.
//!
//! ```text
//! Submitted ──▶ UnderReview ──▶ Accepted
//!                    │
//!                    └────────▶ Rejected
//! ```

use crate::entity::IdeaStatus;
use crate::error::{IdeaflowError, Result};

/// Legal successors of `from`
pub fn allowed_targets(from: IdeaStatus) -> &'static [IdeaStatus] {
    match from {
        IdeaStatus::Submitted => &[IdeaStatus::UnderReview],
        IdeaStatus::UnderReview => &[IdeaStatus::Accepted, IdeaStatus::Rejected],
        IdeaStatus::Accepted | IdeaStatus::Rejected => &[],
    }
}

/// Check a proposed transition, failing with `InvalidTransition` and a
/// human-readable reason when it is not allowed.
pub fn check_transition(from: IdeaStatus, to: IdeaStatus) -> Result<()> {
    let reason = if from == to {
        "Cannot transition to the same status.".to_string()
    } else if from.is_terminal() {
        format!("{} is a final status; no further transitions are allowed.", from)
    } else if allowed_targets(from).contains(&to) {
        return Ok(());
    } else if to == IdeaStatus::Submitted {
        format!("Cannot move an idea from {} back to Submitted.", from)
    } else {
        format!(
            "Cannot transition from {} to {}. Must go through Under Review first.",
            from, to
        )
    };

    Err(IdeaflowError::InvalidTransition { from, to, reason })
}

pub fn can_transition(from: IdeaStatus, to: IdeaStatus) -> bool {
    check_transition(from, to).is_ok()
}
