use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::IdeaStatus;

/// A recorded review decision on an idea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub admin_id: String,
    pub outcome: IdeaStatus,
    /// Trimmed; empty only for `UnderReview`
    pub comment: String,
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    pub fn new(
        idea_id: Uuid,
        admin_id: impl Into<String>,
        outcome: IdeaStatus,
        comment: &str,
        decided_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            idea_id,
            admin_id: admin_id.into(),
            outcome,
            comment: comment.trim().to_string(),
            decided_at,
        }
    }

    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty()
    }

    pub fn summary(&self) -> DecisionSummary {
        DecisionSummary {
            decision: self.clone(),
            is_accepted: self.outcome == IdeaStatus::Accepted,
            is_rejected: self.outcome == IdeaStatus::Rejected,
            is_under_review: self.outcome == IdeaStatus::UnderReview,
            has_comment: self.has_comment(),
        }
    }
}

/// Latest decision with the flags a submitter-facing view renders from
#[derive(Debug, Clone, Serialize)]
pub struct DecisionSummary {
    pub decision: Decision,
    pub is_accepted: bool,
    pub is_rejected: bool,
    pub is_under_review: bool,
    pub has_comment: bool,
}

/// Immutable audit record of one status transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionHistoryEntry {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub from_status: Option<IdeaStatus>,
    pub to_status: IdeaStatus,
    pub comment: Option<String>,
    pub actor_id: String,
    pub created_at: DateTime<Utc>,
}

impl DecisionHistoryEntry {
    /// History entry mirroring `decision`, transitioning away from `from_status`
    pub fn for_decision(decision: &Decision, from_status: Option<IdeaStatus>) -> Self {
        Self {
            id: Uuid::new_v4(),
            idea_id: decision.idea_id,
            from_status,
            to_status: decision.outcome,
            comment: if decision.comment.is_empty() {
                None
            } else {
                Some(decision.comment.clone())
            },
            actor_id: decision.admin_id.clone(),
            created_at: decision.decided_at,
        }
    }
}
