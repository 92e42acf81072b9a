use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{IdeaflowError, Result};

/// Review lifecycle of an idea.
///
/// `Submitted` is the initial state, `UnderReview` the single intermediate gate,
/// `Accepted` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    #[default]
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
}

impl IdeaStatus {
    pub const ALL: [IdeaStatus; 4] = [
        IdeaStatus::Submitted,
        IdeaStatus::UnderReview,
        IdeaStatus::Accepted,
        IdeaStatus::Rejected,
    ];

    /// Stable key used in storage and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Submitted => "submitted",
            IdeaStatus::UnderReview => "under_review",
            IdeaStatus::Accepted => "accepted",
            IdeaStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, IdeaStatus::Accepted | IdeaStatus::Rejected)
    }
}

impl std::fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdeaStatus::Submitted => write!(f, "Submitted"),
            IdeaStatus::UnderReview => write!(f, "Under Review"),
            IdeaStatus::Accepted => write!(f, "Accepted"),
            IdeaStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl std::str::FromStr for IdeaStatus {
    type Err = IdeaflowError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "submitted" => Ok(IdeaStatus::Submitted),
            "under_review" | "underreview" | "review" => Ok(IdeaStatus::UnderReview),
            "accepted" | "accept" => Ok(IdeaStatus::Accepted),
            "rejected" | "reject" => Ok(IdeaStatus::Rejected),
            _ => Err(IdeaflowError::InvalidStatus(s.to_string())),
        }
    }
}

/// Form input for a new idea, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewIdea {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl NewIdea {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    /// Check every required field, reporting all missing ones at once
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title is required.".to_string());
        }
        if self.description.trim().is_empty() {
            errors.push("Description is required.".to_string());
        }
        if self.category.trim().is_empty() {
            errors.push("Category is required.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(IdeaflowError::Validation(errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: Uuid,
    pub sequence_number: u32,
    pub submitter_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    /// Build a validated idea in the `Submitted` state. Text fields are trimmed.
    pub fn submit(
        submitter_id: impl Into<String>,
        input: &NewIdea,
        sequence_number: u32,
    ) -> Result<Self> {
        input.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            sequence_number,
            submitter_id: submitter_id.into(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            category: input.category.trim().to_string(),
            status: IdeaStatus::Submitted,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn short_id(&self) -> String {
        self.id.to_string()[..7].to_string()
    }
}
