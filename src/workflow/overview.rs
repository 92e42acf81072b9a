use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::entity::{Actor, Attachment, Decision, Idea, IdeaStatus};
use crate::error::Result;
use crate::storage::{AttachmentRepository, DecisionStore, IdeaRepository};

/// One row of the admin dashboard
#[derive(Debug, Clone, Serialize)]
pub struct IdeaOverview {
    pub idea: Idea,
    pub latest_decision: Option<Decision>,
    pub attachment: Option<Attachment>,
    pub decision_count: usize,
}

/// Every idea, newest first, with its latest decision and attachment.
pub fn admin_overview(
    actor: &Actor,
    ideas: &dyn IdeaRepository,
    attachments: &dyn AttachmentRepository,
    decisions: &dyn DecisionStore,
) -> Result<Vec<IdeaOverview>> {
    actor.require_admin("The admin overview")?;

    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for decision in decisions.all_decisions()? {
        *counts.entry(decision.idea_id).or_default() += 1;
    }

    let mut all = ideas.list_all_ideas()?;
    // Reverse before the stable sort so equal timestamps list the later insertion first
    all.reverse();
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    all.into_iter()
        .map(|idea| {
            Ok(IdeaOverview {
                latest_decision: decisions.latest_for(&idea.id)?,
                attachment: attachments.attachment_for(&idea.id)?,
                decision_count: counts.get(&idea.id).copied().unwrap_or(0),
                idea,
            })
        })
        .collect()
}

/// Idea counts per status, in workflow order
pub fn status_counts(ideas: &[Idea]) -> Vec<(IdeaStatus, usize)> {
    IdeaStatus::ALL
        .iter()
        .map(|status| {
            (
                *status,
                ideas.iter().filter(|i| i.status == *status).count(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::NewIdea;
    use crate::error::IdeaflowError;
    use crate::storage::InMemoryStore;
    use crate::workflow::DecisionWorkflow;

    fn submit(store: &InMemoryStore, title: &str) -> Idea {
        let seq = store.next_sequence_number().unwrap();
        let idea = Idea::submit("u1", &NewIdea::new(title, "d", "c"), seq).unwrap();
        store.create_idea(&idea).unwrap();
        idea
    }

    #[test]
    fn test_overview_is_admin_only() {
        let store = InMemoryStore::new();
        let err = admin_overview(&Actor::submitter("u1"), &store, &store, &store).unwrap_err();
        assert!(matches!(err, IdeaflowError::Forbidden(_)));
    }

    #[test]
    fn test_overview_newest_first_with_details() {
        let store = InMemoryStore::new();
        let first = submit(&store, "first");
        let second = submit(&store, "second");
        let admin = Actor::admin("a");

        let workflow = DecisionWorkflow::new(&store, &store);
        workflow.make_decision(&first.id, &admin, IdeaStatus::UnderReview, "").unwrap();
        workflow.make_decision(&first.id, &admin, IdeaStatus::Accepted, "yes").unwrap();
        store.add_attachment(&Attachment::new(second.id, "deck.pdf", 10)).unwrap();

        let rows = admin_overview(&admin, &store, &store, &store).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].idea.id, second.id);
        assert_eq!(rows[0].decision_count, 0);
        assert!(rows[0].latest_decision.is_none());
        assert_eq!(rows[0].attachment.as_ref().unwrap().file_name, "deck.pdf");

        assert_eq!(rows[1].idea.id, first.id);
        assert_eq!(rows[1].decision_count, 2);
        assert_eq!(rows[1].latest_decision.as_ref().unwrap().outcome, IdeaStatus::Accepted);
        assert!(rows[1].attachment.is_none());
    }

    #[test]
    fn test_status_counts_cover_every_status() {
        let store = InMemoryStore::new();
        let a = submit(&store, "a");
        submit(&store, "b");
        store.update_idea_status(&a.id, IdeaStatus::UnderReview).unwrap();

        let counts = status_counts(&store.list_all_ideas().unwrap());
        assert_eq!(
            counts,
            vec![
                (IdeaStatus::Submitted, 1),
                (IdeaStatus::UnderReview, 1),
                (IdeaStatus::Accepted, 0),
                (IdeaStatus::Rejected, 0),
            ]
        );
    }
}
