mod actor;
mod attachment;
mod decision;
mod idea;

pub use actor::{Actor, Role};
pub use attachment::Attachment;
pub use decision::{Decision, DecisionHistoryEntry, DecisionSummary};
pub use idea::{Idea, IdeaStatus, NewIdea};
