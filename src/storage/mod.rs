//! Persistence seams for ideas, attachments and decisions.
//!
//! The workflow and visibility layers only talk to these traits, so any keyed
//! store can back them. Two implementations ship with the crate: an
//! in-process [`InMemoryStore`] and a durable [`SqliteStore`].

mod memory;
mod project;
mod sqlite_store;

pub use memory::InMemoryStore;
pub use project::{find_project_root, Project, IDEAFLOW_DIR};
pub use sqlite_store::SqliteStore;

use uuid::Uuid;

use crate::entity::{Attachment, Decision, DecisionHistoryEntry, Idea, IdeaStatus};
use crate::error::Result;

/// Idea records, owned by the CRUD layer
pub trait IdeaRepository {
    /// Next human-facing sequence number (1-based, never reused)
    fn next_sequence_number(&self) -> Result<u32>;

    fn create_idea(&self, idea: &Idea) -> Result<()>;

    fn get_idea(&self, id: &Uuid) -> Result<Option<Idea>>;

    /// Set the status and bump `updated_at`. Fails with `NotFound` for unknown ids.
    fn update_idea_status(&self, id: &Uuid, status: IdeaStatus) -> Result<Idea>;

    /// Write back the status and `updated_at` of an earlier snapshot of the idea
    fn restore_idea(&self, snapshot: &Idea) -> Result<()>;

    /// Ideas owned by `submitter_id`, in creation order
    fn list_ideas_by_submitter(&self, submitter_id: &str) -> Result<Vec<Idea>>;

    /// Every idea, in creation order
    fn list_all_ideas(&self) -> Result<Vec<Idea>>;

    /// Fails with `NotFound` for unknown ids
    fn delete_idea(&self, id: &Uuid) -> Result<()>;
}

/// At most one attachment per idea
pub trait AttachmentRepository {
    /// Fails with `DuplicateAttachment` if the idea already has one
    fn add_attachment(&self, attachment: &Attachment) -> Result<()>;

    fn attachment_for(&self, idea_id: &Uuid) -> Result<Option<Attachment>>;

    /// Idempotent
    fn delete_attachment_for(&self, idea_id: &Uuid) -> Result<()>;
}

/// Decisions plus their append-only transition history
pub trait DecisionStore {
    /// Persist a decision together with its history entry. No validation happens here.
    fn append(&self, decision: &Decision, entry: &DecisionHistoryEntry) -> Result<()>;

    /// Decision with the greatest `decided_at`; on equal timestamps the later insertion wins
    fn latest_for(&self, idea_id: &Uuid) -> Result<Option<Decision>>;

    /// History entries ascending by `created_at`
    fn history_for(&self, idea_id: &Uuid) -> Result<Vec<DecisionHistoryEntry>>;

    /// Every decision, in no particular order
    fn all_decisions(&self) -> Result<Vec<Decision>>;

    /// Remove every decision and history entry for the idea. Idempotent.
    fn delete_for(&self, idea_id: &Uuid) -> Result<()>;
}
