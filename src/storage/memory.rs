use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use super::{AttachmentRepository, DecisionStore, IdeaRepository};
use crate::entity::{Attachment, Decision, DecisionHistoryEntry, Idea, IdeaStatus};
use crate::error::{IdeaflowError, Result};

#[derive(Default)]
struct Tables {
    ideas: Vec<Idea>,
    attachments: Vec<Attachment>,
    decisions: Vec<Decision>,
    history: Vec<DecisionHistoryEntry>,
    last_sequence: u32,
}

/// Process-local store. Vectors keep insertion order, which is what breaks
/// `decided_at` ties in `latest_for`.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| IdeaflowError::Storage("in-memory store lock poisoned".to_string()))
    }
}

impl IdeaRepository for InMemoryStore {
    fn next_sequence_number(&self) -> Result<u32> {
        Ok(self.lock()?.last_sequence + 1)
    }

    fn create_idea(&self, idea: &Idea) -> Result<()> {
        let mut tables = self.lock()?;
        tables.last_sequence = tables.last_sequence.max(idea.sequence_number);
        tables.ideas.push(idea.clone());
        Ok(())
    }

    fn get_idea(&self, id: &Uuid) -> Result<Option<Idea>> {
        Ok(self.lock()?.ideas.iter().find(|i| i.id == *id).cloned())
    }

    fn update_idea_status(&self, id: &Uuid, status: IdeaStatus) -> Result<Idea> {
        let mut tables = self.lock()?;
        let idea = tables
            .ideas
            .iter_mut()
            .find(|i| i.id == *id)
            .ok_or_else(|| IdeaflowError::NotFound(id.to_string()))?;

        idea.status = status;
        idea.updated_at = Utc::now();
        Ok(idea.clone())
    }

    fn restore_idea(&self, snapshot: &Idea) -> Result<()> {
        let mut tables = self.lock()?;
        let idea = tables
            .ideas
            .iter_mut()
            .find(|i| i.id == snapshot.id)
            .ok_or_else(|| IdeaflowError::NotFound(snapshot.id.to_string()))?;

        idea.status = snapshot.status;
        idea.updated_at = snapshot.updated_at;
        Ok(())
    }

    fn list_ideas_by_submitter(&self, submitter_id: &str) -> Result<Vec<Idea>> {
        Ok(self
            .lock()?
            .ideas
            .iter()
            .filter(|i| i.submitter_id == submitter_id)
            .cloned()
            .collect())
    }

    fn list_all_ideas(&self) -> Result<Vec<Idea>> {
        Ok(self.lock()?.ideas.clone())
    }

    fn delete_idea(&self, id: &Uuid) -> Result<()> {
        let mut tables = self.lock()?;
        let before = tables.ideas.len();
        tables.ideas.retain(|i| i.id != *id);
        if tables.ideas.len() == before {
            return Err(IdeaflowError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl AttachmentRepository for InMemoryStore {
    fn add_attachment(&self, attachment: &Attachment) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.attachments.iter().any(|a| a.idea_id == attachment.idea_id) {
            return Err(IdeaflowError::DuplicateAttachment(attachment.idea_id.to_string()));
        }
        tables.attachments.push(attachment.clone());
        Ok(())
    }

    fn attachment_for(&self, idea_id: &Uuid) -> Result<Option<Attachment>> {
        Ok(self
            .lock()?
            .attachments
            .iter()
            .find(|a| a.idea_id == *idea_id)
            .cloned())
    }

    fn delete_attachment_for(&self, idea_id: &Uuid) -> Result<()> {
        self.lock()?.attachments.retain(|a| a.idea_id != *idea_id);
        Ok(())
    }
}

impl DecisionStore for InMemoryStore {
    fn append(&self, decision: &Decision, entry: &DecisionHistoryEntry) -> Result<()> {
        // Both pushes happen under one guard, so readers never see one without the other.
        let mut tables = self.lock()?;
        tables.decisions.push(decision.clone());
        tables.history.push(entry.clone());
        Ok(())
    }

    fn latest_for(&self, idea_id: &Uuid) -> Result<Option<Decision>> {
        let tables = self.lock()?;
        let mut latest: Option<&Decision> = None;
        for decision in tables.decisions.iter().filter(|d| d.idea_id == *idea_id) {
            match latest {
                Some(current) if decision.decided_at < current.decided_at => {}
                _ => latest = Some(decision),
            }
        }
        Ok(latest.cloned())
    }

    fn history_for(&self, idea_id: &Uuid) -> Result<Vec<DecisionHistoryEntry>> {
        let mut entries: Vec<DecisionHistoryEntry> = self
            .lock()?
            .history
            .iter()
            .filter(|h| h.idea_id == *idea_id)
            .cloned()
            .collect();

        // Stable sort keeps insertion order among equal timestamps
        entries.sort_by_key(|h| h.created_at);
        Ok(entries)
    }

    fn all_decisions(&self) -> Result<Vec<Decision>> {
        Ok(self.lock()?.decisions.clone())
    }

    fn delete_for(&self, idea_id: &Uuid) -> Result<()> {
        let mut tables = self.lock()?;
        tables.decisions.retain(|d| d.idea_id != *idea_id);
        tables.history.retain(|h| h.idea_id != *idea_id);
        Ok(())
    }
}
