//! Review workflow: the status and comment policies, the decision service
//! that applies them, and the role-aware read side.

mod comment;
mod overview;
mod service;
mod transition;
mod visibility;

pub use comment::{is_valid_comment, requires_comment, validate_comment};
pub use overview::{admin_overview, status_counts, IdeaOverview};
pub use service::DecisionWorkflow;
pub use transition::{allowed_targets, can_transition, check_transition};
pub use visibility::{
    decision_visible_to_submitter, is_idea_visible_to_submitter, submitter_visible_ideas,
    Visibility,
};
