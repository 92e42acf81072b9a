//! Read-side access rules.
//!
//! Submitters only ever see their own ideas and the decisions on them. An idea
//! that exists but belongs to someone else reads exactly like one that does not
//! exist, so callers cannot probe for foreign ids.

use uuid::Uuid;

use crate::entity::{Actor, Decision, DecisionHistoryEntry, DecisionSummary, Idea};
use crate::error::Result;
use crate::storage::{DecisionStore, IdeaRepository};

/// Owner check; status does not matter
pub fn is_idea_visible_to_submitter(idea: &Idea, submitter_id: &str) -> bool {
    idea.submitter_id == submitter_id
}

/// Keep only the submitter's own ideas, preserving order
pub fn submitter_visible_ideas(ideas: Vec<Idea>, submitter_id: &str) -> Vec<Idea> {
    ideas
        .into_iter()
        .filter(|idea| is_idea_visible_to_submitter(idea, submitter_id))
        .collect()
}

/// Latest decision on the idea if it is owned by `submitter_id`
pub fn decision_visible_to_submitter(
    ideas: &dyn IdeaRepository,
    decisions: &dyn DecisionStore,
    idea_id: &Uuid,
    submitter_id: &str,
) -> Result<Option<Decision>> {
    match ideas.get_idea(idea_id)? {
        Some(idea) if is_idea_visible_to_submitter(&idea, submitter_id) => {
            decisions.latest_for(idea_id)
        }
        _ => Ok(None),
    }
}

/// Role-aware reads for a single actor. Admins are unfiltered.
pub struct Visibility<'a> {
    ideas: &'a dyn IdeaRepository,
    decisions: &'a dyn DecisionStore,
    actor: &'a Actor,
}

impl<'a> Visibility<'a> {
    pub fn new(
        ideas: &'a dyn IdeaRepository,
        decisions: &'a dyn DecisionStore,
        actor: &'a Actor,
    ) -> Self {
        Self {
            ideas,
            decisions,
            actor,
        }
    }

    pub fn visible_ideas(&self) -> Result<Vec<Idea>> {
        if self.actor.is_admin() {
            self.ideas.list_all_ideas()
        } else {
            self.ideas.list_ideas_by_submitter(&self.actor.id)
        }
    }

    pub fn visible_idea(&self, idea_id: &Uuid) -> Result<Option<Idea>> {
        let idea = self.ideas.get_idea(idea_id)?;
        if self.actor.is_admin() {
            return Ok(idea);
        }
        Ok(idea.filter(|i| is_idea_visible_to_submitter(i, &self.actor.id)))
    }

    pub fn visible_decision(&self, idea_id: &Uuid) -> Result<Option<Decision>> {
        if self.actor.is_admin() {
            return self.decisions.latest_for(idea_id);
        }
        decision_visible_to_submitter(self.ideas, self.decisions, idea_id, &self.actor.id)
    }

    pub fn visible_history(&self, idea_id: &Uuid) -> Result<Vec<DecisionHistoryEntry>> {
        if self.visible_idea(idea_id)?.is_none() {
            return Ok(Vec::new());
        }
        self.decisions.history_for(idea_id)
    }

    pub fn summary(&self, idea_id: &Uuid) -> Result<Option<DecisionSummary>> {
        Ok(self.visible_decision(idea_id)?.map(|d| d.summary()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{IdeaStatus, NewIdea};
    use crate::storage::InMemoryStore;
    use crate::workflow::DecisionWorkflow;

    fn submit(store: &InMemoryStore, owner: &str, title: &str) -> Idea {
        let seq = store.next_sequence_number().unwrap();
        let idea = Idea::submit(owner, &NewIdea::new(title, "d", "c"), seq).unwrap();
        store.create_idea(&idea).unwrap();
        idea
    }

    #[test]
    fn test_owner_check_ignores_status() {
        let store = InMemoryStore::new();
        let idea = submit(&store, "u1", "mine");
        assert!(is_idea_visible_to_submitter(&idea, "u1"));
        assert!(!is_idea_visible_to_submitter(&idea, "u2"));

        let reviewed = store.update_idea_status(&idea.id, IdeaStatus::UnderReview).unwrap();
        assert!(is_idea_visible_to_submitter(&reviewed, "u1"));
    }

    #[test]
    fn test_filter_preserves_order() {
        let store = InMemoryStore::new();
        let a = submit(&store, "u1", "a");
        submit(&store, "u2", "b");
        let c = submit(&store, "u1", "c");

        let visible = submitter_visible_ideas(store.list_all_ideas().unwrap(), "u1");
        assert_eq!(visible, vec![a, c]);
    }

    #[test]
    fn test_decision_hidden_from_other_submitters() {
        let store = InMemoryStore::new();
        let idea = submit(&store, "u1", "mine");
        DecisionWorkflow::new(&store, &store)
            .make_decision(&idea.id, &Actor::admin("a"), IdeaStatus::UnderReview, "")
            .unwrap();

        let own = decision_visible_to_submitter(&store, &store, &idea.id, "u1").unwrap();
        assert_eq!(own.unwrap().outcome, IdeaStatus::UnderReview);
        assert!(decision_visible_to_submitter(&store, &store, &idea.id, "u2")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_and_foreign_ideas_look_the_same() {
        let store = InMemoryStore::new();
        let idea = submit(&store, "u1", "mine");
        let missing = Uuid::new_v4();

        let foreign = decision_visible_to_submitter(&store, &store, &idea.id, "u2").unwrap();
        let absent = decision_visible_to_submitter(&store, &store, &missing, "u2").unwrap();
        assert_eq!(foreign, absent);
    }

    #[test]
    fn test_undecided_idea_has_no_decision() {
        let store = InMemoryStore::new();
        let idea = submit(&store, "u1", "mine");
        assert!(decision_visible_to_submitter(&store, &store, &idea.id, "u1")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_visibility_by_role() {
        let store = InMemoryStore::new();
        let mine = submit(&store, "u1", "mine");
        let theirs = submit(&store, "u2", "theirs");
        let admin = Actor::admin("a");
        DecisionWorkflow::new(&store, &store)
            .make_decision(&theirs.id, &admin, IdeaStatus::UnderReview, "looking")
            .unwrap();

        let u1 = Actor::submitter("u1");
        let view = Visibility::new(&store, &store, &u1);
        assert_eq!(view.visible_ideas().unwrap(), vec![mine.clone()]);
        assert!(view.visible_idea(&mine.id).unwrap().is_some());
        assert!(view.visible_idea(&theirs.id).unwrap().is_none());
        assert!(view.visible_decision(&theirs.id).unwrap().is_none());
        assert!(view.visible_history(&theirs.id).unwrap().is_empty());
        assert!(view.summary(&theirs.id).unwrap().is_none());

        let view = Visibility::new(&store, &store, &admin);
        assert_eq!(view.visible_ideas().unwrap().len(), 2);
        assert!(view.visible_idea(&theirs.id).unwrap().is_some());
        assert_eq!(view.visible_history(&theirs.id).unwrap().len(), 1);

        let summary = view.summary(&theirs.id).unwrap().unwrap();
        assert!(summary.is_under_review);
        assert!(!summary.is_accepted);
        assert!(summary.has_comment);
    }
}
