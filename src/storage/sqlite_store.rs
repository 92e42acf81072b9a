use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{AttachmentRepository, DecisionStore, IdeaRepository};
use crate::entity::{Attachment, Decision, DecisionHistoryEntry, Idea, IdeaStatus};
use crate::error::{IdeaflowError, Result};

/// Durable store backed by a single SQLite file.
///
/// Every table carries an autoincrement `seq` column recording insertion
/// order. Timestamps are written as fixed-width RFC 3339 strings so that
/// lexical ordering in SQL matches chronological ordering.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS ideas (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                sequence_number INTEGER NOT NULL,
                submitter_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_ideas_submitter ON ideas(submitter_id);

            CREATE TABLE IF NOT EXISTS attachments (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                idea_id TEXT NOT NULL UNIQUE,
                file_name TEXT NOT NULL,
                file_path TEXT NOT NULL,
                file_size INTEGER NOT NULL,
                content_type TEXT,
                uploaded_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS decisions (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                idea_id TEXT NOT NULL,
                admin_id TEXT NOT NULL,
                outcome TEXT NOT NULL,
                comment TEXT NOT NULL,
                decided_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_decisions_idea ON decisions(idea_id);

            CREATE TABLE IF NOT EXISTS decision_history (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                idea_id TEXT NOT NULL,
                from_status TEXT,
                to_status TEXT NOT NULL,
                comment TEXT,
                actor_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_history_idea ON decision_history(idea_id);
            ",
        )?;
        Ok(())
    }

    fn last_sequence_number(&self) -> Result<u32> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'idea_sequence'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(v) => v
                .parse()
                .map_err(|_| IdeaflowError::Storage(format!("corrupt idea sequence: {}", v))),
            None => Ok(0),
        }
    }
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn ts_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, format!("invalid timestamp '{}': {}", raw, e)))
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|_| conversion_error(idx, format!("invalid uuid '{}'", raw)))
}

fn status_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<IdeaStatus> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|_| conversion_error(idx, format!("invalid status '{}'", raw)))
}

const IDEA_COLUMNS: &str = "id, sequence_number, submitter_id, title, description, category, \
     status, created_at, updated_at";

fn idea_from_row(row: &Row<'_>) -> rusqlite::Result<Idea> {
    Ok(Idea {
        id: uuid_column(row, 0)?,
        sequence_number: row.get(1)?,
        submitter_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        category: row.get(5)?,
        status: status_column(row, 6)?,
        created_at: ts_column(row, 7)?,
        updated_at: ts_column(row, 8)?,
    })
}

const DECISION_COLUMNS: &str = "id, idea_id, admin_id, outcome, comment, decided_at";

fn decision_from_row(row: &Row<'_>) -> rusqlite::Result<Decision> {
    Ok(Decision {
        id: uuid_column(row, 0)?,
        idea_id: uuid_column(row, 1)?,
        admin_id: row.get(2)?,
        outcome: status_column(row, 3)?,
        comment: row.get(4)?,
        decided_at: ts_column(row, 5)?,
    })
}

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<DecisionHistoryEntry> {
    let from_status = match row.get::<_, Option<String>>(2)? {
        Some(raw) => Some(
            raw.parse::<IdeaStatus>()
                .map_err(|_| conversion_error(2, format!("invalid status '{}'", raw)))?,
        ),
        None => None,
    };

    Ok(DecisionHistoryEntry {
        id: uuid_column(row, 0)?,
        idea_id: uuid_column(row, 1)?,
        from_status,
        to_status: status_column(row, 3)?,
        comment: row.get(4)?,
        actor_id: row.get(5)?,
        created_at: ts_column(row, 6)?,
    })
}

fn attachment_from_row(row: &Row<'_>) -> rusqlite::Result<Attachment> {
    let file_size: i64 = row.get(4)?;
    Ok(Attachment {
        id: uuid_column(row, 0)?,
        idea_id: uuid_column(row, 1)?,
        file_name: row.get(2)?,
        file_path: row.get(3)?,
        file_size: file_size.max(0) as u64,
        content_type: row.get(5)?,
        uploaded_at: ts_column(row, 6)?,
    })
}

impl IdeaRepository for SqliteStore {
    fn next_sequence_number(&self) -> Result<u32> {
        Ok(self.last_sequence_number()? + 1)
    }

    fn create_idea(&self, idea: &Idea) -> Result<()> {
        let last = self.last_sequence_number()?;
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            &format!(
                "INSERT INTO ideas ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                IDEA_COLUMNS
            ),
            params![
                idea.id.to_string(),
                idea.sequence_number,
                idea.submitter_id,
                idea.title,
                idea.description,
                idea.category,
                idea.status.as_str(),
                format_ts(&idea.created_at),
                format_ts(&idea.updated_at),
            ],
        )?;

        tx.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('idea_sequence', ?1)",
            [last.max(idea.sequence_number).to_string()],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn get_idea(&self, id: &Uuid) -> Result<Option<Idea>> {
        let idea = self
            .conn
            .query_row(
                &format!("SELECT {} FROM ideas WHERE id = ?1", IDEA_COLUMNS),
                [id.to_string()],
                idea_from_row,
            )
            .optional()?;
        Ok(idea)
    }

    fn update_idea_status(&self, id: &Uuid, status: IdeaStatus) -> Result<Idea> {
        let changed = self.conn.execute(
            "UPDATE ideas SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), format_ts(&Utc::now()), id.to_string()],
        )?;

        if changed == 0 {
            return Err(IdeaflowError::NotFound(id.to_string()));
        }

        self.get_idea(id)?
            .ok_or_else(|| IdeaflowError::NotFound(id.to_string()))
    }

    fn restore_idea(&self, snapshot: &Idea) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE ideas SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                snapshot.status.as_str(),
                format_ts(&snapshot.updated_at),
                snapshot.id.to_string()
            ],
        )?;

        if changed == 0 {
            return Err(IdeaflowError::NotFound(snapshot.id.to_string()));
        }
        Ok(())
    }

    fn list_ideas_by_submitter(&self, submitter_id: &str) -> Result<Vec<Idea>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM ideas WHERE submitter_id = ?1 ORDER BY seq",
            IDEA_COLUMNS
        ))?;
        let ideas = stmt
            .query_map([submitter_id], idea_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ideas)
    }

    fn list_all_ideas(&self) -> Result<Vec<Idea>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM ideas ORDER BY seq", IDEA_COLUMNS))?;
        let ideas = stmt
            .query_map([], idea_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ideas)
    }

    fn delete_idea(&self, id: &Uuid) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM ideas WHERE id = ?1", [id.to_string()])?;
        if removed == 0 {
            return Err(IdeaflowError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl AttachmentRepository for SqliteStore {
    fn add_attachment(&self, attachment: &Attachment) -> Result<()> {
        if self.attachment_for(&attachment.idea_id)?.is_some() {
            return Err(IdeaflowError::DuplicateAttachment(attachment.idea_id.to_string()));
        }

        self.conn.execute(
            "INSERT INTO attachments
             (id, idea_id, file_name, file_path, file_size, content_type, uploaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                attachment.id.to_string(),
                attachment.idea_id.to_string(),
                attachment.file_name,
                attachment.file_path,
                attachment.file_size as i64,
                attachment.content_type,
                format_ts(&attachment.uploaded_at),
            ],
        )?;
        Ok(())
    }

    fn attachment_for(&self, idea_id: &Uuid) -> Result<Option<Attachment>> {
        let attachment = self
            .conn
            .query_row(
                "SELECT id, idea_id, file_name, file_path, file_size, content_type, uploaded_at
                 FROM attachments WHERE idea_id = ?1",
                [idea_id.to_string()],
                attachment_from_row,
            )
            .optional()?;
        Ok(attachment)
    }

    fn delete_attachment_for(&self, idea_id: &Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM attachments WHERE idea_id = ?1", [idea_id.to_string()])?;
        Ok(())
    }
}

impl DecisionStore for SqliteStore {
    fn append(&self, decision: &Decision, entry: &DecisionHistoryEntry) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            &format!(
                "INSERT INTO decisions ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                DECISION_COLUMNS
            ),
            params![
                decision.id.to_string(),
                decision.idea_id.to_string(),
                decision.admin_id,
                decision.outcome.as_str(),
                decision.comment,
                format_ts(&decision.decided_at),
            ],
        )?;

        tx.execute(
            "INSERT INTO decision_history
             (id, idea_id, from_status, to_status, comment, actor_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id.to_string(),
                entry.idea_id.to_string(),
                entry.from_status.map(|s| s.as_str()),
                entry.to_status.as_str(),
                entry.comment,
                entry.actor_id,
                format_ts(&entry.created_at),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn latest_for(&self, idea_id: &Uuid) -> Result<Option<Decision>> {
        let decision = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM decisions WHERE idea_id = ?1
                     ORDER BY decided_at DESC, seq DESC LIMIT 1",
                    DECISION_COLUMNS
                ),
                [idea_id.to_string()],
                decision_from_row,
            )
            .optional()?;
        Ok(decision)
    }

    fn history_for(&self, idea_id: &Uuid) -> Result<Vec<DecisionHistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, idea_id, from_status, to_status, comment, actor_id, created_at
             FROM decision_history WHERE idea_id = ?1
             ORDER BY created_at ASC, seq ASC",
        )?;
        let entries = stmt
            .query_map([idea_id.to_string()], history_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn all_decisions(&self) -> Result<Vec<Decision>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM decisions", DECISION_COLUMNS))?;
        let decisions = stmt
            .query_map([], decision_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(decisions)
    }

    fn delete_for(&self, idea_id: &Uuid) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM decisions WHERE idea_id = ?1", [idea_id.to_string()])?;
        tx.execute(
            "DELETE FROM decision_history WHERE idea_id = ?1",
            [idea_id.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::NewIdea;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn submit(store: &SqliteStore, submitter: &str, title: &str) -> Idea {
        let seq = store.next_sequence_number().unwrap();
        let input = NewIdea::new(title, "Description", "General");
        let idea = Idea::submit(submitter, &input, seq).unwrap();
        store.create_idea(&idea).unwrap();
        idea
    }

    fn record(store: &SqliteStore, decision: &Decision, from: IdeaStatus) {
        let entry = DecisionHistoryEntry::for_decision(decision, Some(from));
        store.append(decision, &entry).unwrap();
    }

    #[test]
    fn test_idea_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let idea = submit(&store, "alice", "Bike racks");

        let loaded = store.get_idea(&idea.id).unwrap().unwrap();
        assert_eq!(loaded, idea);
        assert!(store.get_idea(&Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_sequence_is_not_reused_after_delete() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = submit(&store, "alice", "One");
        let second = submit(&store, "alice", "Two");
        store.delete_idea(&second.id).unwrap();

        let third = submit(&store, "alice", "Three");
        assert_eq!(first.sequence_number, 1);
        assert_eq!(third.sequence_number, 3);
    }

    #[test]
    fn test_update_status_persists() {
        let store = SqliteStore::open_in_memory().unwrap();
        let idea = submit(&store, "alice", "Bike racks");

        let updated = store.update_idea_status(&idea.id, IdeaStatus::UnderReview).unwrap();
        assert_eq!(updated.status, IdeaStatus::UnderReview);
        assert_eq!(
            store.get_idea(&idea.id).unwrap().unwrap().status,
            IdeaStatus::UnderReview
        );

        let err = store
            .update_idea_status(&Uuid::new_v4(), IdeaStatus::UnderReview)
            .unwrap_err();
        assert!(matches!(err, IdeaflowError::NotFound(_)));
    }

    #[test]
    fn test_restore_idea_rewinds_status_and_timestamp() {
        let store = SqliteStore::open_in_memory().unwrap();
        let idea = submit(&store, "alice", "Bike racks");

        store.update_idea_status(&idea.id, IdeaStatus::UnderReview).unwrap();
        store.restore_idea(&idea).unwrap();
        assert_eq!(store.get_idea(&idea.id).unwrap().unwrap(), idea);

        let mut missing = idea.clone();
        missing.id = Uuid::new_v4();
        assert!(matches!(
            store.restore_idea(&missing),
            Err(IdeaflowError::NotFound(_))
        ));
    }

    #[test]
    fn test_listing_filters_by_submitter() {
        let store = SqliteStore::open_in_memory().unwrap();
        submit(&store, "alice", "A1");
        submit(&store, "bob", "B1");
        submit(&store, "alice", "A2");

        let titles: Vec<String> = store
            .list_ideas_by_submitter("alice")
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["A1", "A2"]);
        assert_eq!(store.list_all_ideas().unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_attachment() {
        let store = SqliteStore::open_in_memory().unwrap();
        let idea = submit(&store, "alice", "Bike racks");

        let attachment = Attachment::new(idea.id, "plan.pdf", 4096);
        store.add_attachment(&attachment).unwrap();
        assert_eq!(store.attachment_for(&idea.id).unwrap(), Some(attachment));

        let err = store
            .add_attachment(&Attachment::new(idea.id, "other.pdf", 1))
            .unwrap_err();
        assert!(matches!(err, IdeaflowError::DuplicateAttachment(_)));
    }

    #[test]
    fn test_latest_for_prefers_newest_timestamp() {
        let store = SqliteStore::open_in_memory().unwrap();
        let idea_id = Uuid::new_v4();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let t2 = t1 + Duration::milliseconds(1);

        let newer = Decision::new(idea_id, "admin", IdeaStatus::Rejected, "no", t2);
        let older = Decision::new(idea_id, "admin", IdeaStatus::UnderReview, "", t1);
        record(&store, &newer, IdeaStatus::UnderReview);
        record(&store, &older, IdeaStatus::Submitted);

        assert_eq!(store.latest_for(&idea_id).unwrap(), Some(newer));
    }

    #[test]
    fn test_latest_for_tie_goes_to_later_insertion() {
        let store = SqliteStore::open_in_memory().unwrap();
        let idea_id = Uuid::new_v4();
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();

        let first = Decision::new(idea_id, "admin", IdeaStatus::UnderReview, "", t);
        let second = Decision::new(idea_id, "admin", IdeaStatus::Accepted, "ok", t);
        record(&store, &first, IdeaStatus::Submitted);
        record(&store, &second, IdeaStatus::UnderReview);

        assert_eq!(store.latest_for(&idea_id).unwrap().unwrap().id, second.id);
    }

    #[test]
    fn test_history_round_trip_and_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let idea_id = Uuid::new_v4();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let t2 = t1 + Duration::seconds(30);

        let review = Decision::new(idea_id, "admin", IdeaStatus::UnderReview, "", t1);
        let accept = Decision::new(idea_id, "admin", IdeaStatus::Accepted, "great", t2);
        record(&store, &accept, IdeaStatus::UnderReview);
        record(&store, &review, IdeaStatus::Submitted);

        let history = store.history_for(&idea_id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].to_status, IdeaStatus::UnderReview);
        assert_eq!(history[0].from_status, Some(IdeaStatus::Submitted));
        assert!(history[0].comment.is_none());
        assert_eq!(history[1].to_status, IdeaStatus::Accepted);
        assert_eq!(history[1].comment.as_deref(), Some("great"));
    }

    #[test]
    fn test_delete_for_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let idea_id = Uuid::new_v4();
        record(
            &store,
            &Decision::new(idea_id, "admin", IdeaStatus::UnderReview, "", Utc::now()),
            IdeaStatus::Submitted,
        );

        store.delete_for(&idea_id).unwrap();
        store.delete_for(&idea_id).unwrap();

        assert!(store.latest_for(&idea_id).unwrap().is_none());
        assert!(store.history_for(&idea_id).unwrap().is_empty());
        assert!(store.all_decisions().unwrap().is_empty());
    }

    #[test]
    fn test_data_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ideaflow.db");

        let idea = {
            let store = SqliteStore::open(&path).unwrap();
            let idea = submit(&store, "alice", "Persisted");
            record(
                &store,
                &Decision::new(idea.id, "admin", IdeaStatus::UnderReview, "looking", Utc::now()),
                IdeaStatus::Submitted,
            );
            idea
        };

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_idea(&idea.id).unwrap().unwrap().title, "Persisted");
        assert_eq!(
            store.latest_for(&idea.id).unwrap().unwrap().comment,
            "looking"
        );
        assert_eq!(store.next_sequence_number().unwrap(), 2);
    }
}
