use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{check_transition, validate_comment};
use crate::entity::{Actor, Decision, DecisionHistoryEntry, IdeaStatus};
use crate::error::{IdeaflowError, Result};
use crate::storage::{DecisionStore, IdeaRepository};

/// The only path through which an idea's status changes.
///
/// Every call validates first (role, transition, comment) and only then
/// mutates: the idea's status is updated through the idea repository, and the
/// decision plus its history entry are appended to the decision store. A
/// failed call leaves both stores untouched. If the append fails after the
/// status update, the idea is rewound to the snapshot read before it.
pub struct DecisionWorkflow<'a> {
    ideas: &'a dyn IdeaRepository,
    decisions: &'a dyn DecisionStore,
}

impl<'a> DecisionWorkflow<'a> {
    pub fn new(ideas: &'a dyn IdeaRepository, decisions: &'a dyn DecisionStore) -> Self {
        Self { ideas, decisions }
    }

    /// Status implied by the decision log: the latest outcome, or `Submitted`
    pub fn current_status(&self, idea_id: &Uuid) -> Result<IdeaStatus> {
        Ok(self
            .decisions
            .latest_for(idea_id)?
            .map(|d| d.outcome)
            .unwrap_or(IdeaStatus::Submitted))
    }

    /// Record `outcome` for the idea on behalf of `actor`, who must be an admin.
    pub fn make_decision(
        &self,
        idea_id: &Uuid,
        actor: &Actor,
        outcome: IdeaStatus,
        comment: &str,
    ) -> Result<Decision> {
        self.decide_at(idea_id, actor, outcome, comment, Utc::now())
    }

    fn decide_at(
        &self,
        idea_id: &Uuid,
        actor: &Actor,
        outcome: IdeaStatus,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<Decision> {
        actor.require_admin("Recording a decision")?;

        let latest = self.decisions.latest_for(idea_id)?;
        let current = latest
            .as_ref()
            .map(|d| d.outcome)
            .unwrap_or(IdeaStatus::Submitted);

        let verdict =
            check_transition(current, outcome).and_then(|_| validate_comment(outcome, comment));
        if let Err(err) = verdict {
            tracing::warn!(
                idea = %idea_id,
                admin = %actor.id,
                from = %current,
                to = %outcome,
                error = %err,
                "decision rejected"
            );
            return Err(err);
        }

        let snapshot = self
            .ideas
            .get_idea(idea_id)?
            .ok_or_else(|| IdeaflowError::NotFound(idea_id.to_string()))?;

        // Never stamp a decision earlier than the one it supersedes, so a
        // backwards clock step cannot hide it behind its predecessor.
        let decided_at = latest
            .as_ref()
            .map_or(now, |prev| now.max(prev.decided_at));

        let decision = Decision::new(*idea_id, actor.id.clone(), outcome, comment, decided_at);
        let entry = DecisionHistoryEntry::for_decision(&decision, Some(current));

        self.ideas.update_idea_status(idea_id, outcome)?;
        if let Err(err) = self.decisions.append(&decision, &entry) {
            if let Err(restore_err) = self.ideas.restore_idea(&snapshot) {
                tracing::error!(
                    idea = %idea_id,
                    error = %restore_err,
                    "failed to rewind idea status"
                );
            }
            tracing::warn!(idea = %idea_id, error = %err, "decision not recorded");
            return Err(err);
        }

        tracing::info!(
            idea = %idea_id,
            admin = %actor.id,
            from = %current,
            to = %outcome,
            decision = %decision.id,
            "decision recorded"
        );

        Ok(decision)
    }
}
