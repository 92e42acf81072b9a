use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::IdentityArgs;
use crate::entity::{Actor, Attachment, Idea, IdeaStatus, NewIdea, Role};
use crate::error::{IdeaflowError, Result};
use crate::storage::{
    find_project_root, AttachmentRepository, DecisionStore, IdeaRepository, Project, SqliteStore,
};
use crate::workflow::{admin_overview, status_counts, DecisionWorkflow, Visibility};

/// An opened project plus the identity acting on it
struct Session {
    store: SqliteStore,
    actor: Actor,
}

impl Session {
    fn open(identity: &IdentityArgs) -> Result<Self> {
        let project = Project::open(&find_project_root())?;
        let role = identity
            .role
            .as_deref()
            .map(|r| r.parse::<Role>())
            .transpose()?;
        let actor = project.config.resolve_actor(identity.user.clone(), role)?;
        let store = project.store()?;
        tracing::debug!(user = %actor.id, role = %actor.role, "session opened");
        Ok(Self { store, actor })
    }

    fn view(&self) -> Visibility<'_> {
        Visibility::new(&self.store, &self.store, &self.actor)
    }

    /// Find an idea the actor may see by sequence number ("3") or UUID prefix ("a1b2c")
    fn resolve_idea(&self, id: &str) -> Result<Idea> {
        let ideas = self.view().visible_ideas()?;
        let found = if let Ok(seq) = id.parse::<u32>() {
            ideas.into_iter().find(|i| i.sequence_number == seq)
        } else {
            ideas
                .into_iter()
                .find(|i| i.id.to_string().starts_with(id))
        };
        found.ok_or_else(|| IdeaflowError::NotFound(id.to_string()))
    }
}

fn label(idea: &Idea) -> String {
    format!("{:03} ({}) - {}", idea.sequence_number, idea.short_id(), idea.title)
}

/// File name and size of an attachment candidate
fn file_metadata(path: &Path) -> Result<(String, u64)> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Err(IdeaflowError::Validation(vec![format!(
            "{} is not a file.",
            path.display()
        )]));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            IdeaflowError::Validation(vec![format!("{} has no file name.", path.display())])
        })?;
    Ok((name, meta.len()))
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;
    Project::init(&root)?;
    println!("Initialized ideaflow project in {}", root.display());
    Ok(())
}

pub fn handle_submit(
    identity: &IdentityArgs,
    title: String,
    description: String,
    category: String,
    attach: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let session = Session::open(identity)?;
    if !session.actor.can_access_submitter_area() {
        return Err(IdeaflowError::Forbidden(format!(
            "{} cannot submit ideas",
            session.actor.id
        )));
    }

    // Stat the file up front so a bad path does not leave a half-submitted idea
    let file = attach.as_deref().map(file_metadata).transpose()?;

    let input = NewIdea::new(title, description, category);
    let seq = session.store.next_sequence_number()?;
    let idea = Idea::submit(session.actor.id.clone(), &input, seq)?;
    session.store.create_idea(&idea)?;

    let attachment = match file {
        Some((name, size)) => {
            let attachment = Attachment::new(idea.id, name, size);
            session.store.add_attachment(&attachment)?;
            Some(attachment)
        }
        None => None,
    };

    if json {
        let out = serde_json::json!({ "idea": idea, "attachment": attachment });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Submitted idea {}", label(&idea));
        if let Some(a) = attachment {
            println!("  attached {} ({} bytes)", a.file_name, a.file_size);
        }
    }

    Ok(())
}

pub fn handle_list(identity: &IdentityArgs, status: Option<String>, json: bool) -> Result<()> {
    let session = Session::open(identity)?;
    let status = status.map(|s| s.parse::<IdeaStatus>()).transpose()?;

    let ideas: Vec<Idea> = session
        .view()
        .visible_ideas()?
        .into_iter()
        .filter(|i| status.map_or(true, |s| i.status == s))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&ideas)?);
    } else if ideas.is_empty() {
        println!("No ideas found.");
    } else {
        println!("Ideas:\n");
        for idea in ideas {
            println!(
                "  {:03} ({}) [{}] {}",
                idea.sequence_number,
                idea.short_id(),
                idea.status,
                idea.title
            );
            if session.actor.is_admin() {
                println!("      by {} in {}", idea.submitter_id, idea.category);
            }
        }
    }

    Ok(())
}

pub fn handle_show(identity: &IdentityArgs, id: String, json: bool) -> Result<()> {
    let session = Session::open(identity)?;
    let idea = session.resolve_idea(&id)?;
    let summary = session.view().summary(&idea.id)?;
    let attachment = session.store.attachment_for(&idea.id)?;

    if json {
        let out = serde_json::json!({
            "idea": idea,
            "decision": summary,
            "attachment": attachment,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Idea {}", label(&idea));
    println!("  Status:    {}", idea.status);
    println!("  Category:  {}", idea.category);
    println!("  Submitter: {}", idea.submitter_id);
    println!("  Created:   {}", idea.created_at.format("%Y-%m-%d %H:%M"));
    println!();
    println!("{}", idea.description);

    if let Some(a) = attachment {
        println!();
        println!("Attachment: {} ({} bytes)", a.file_name, a.file_size);
    }

    if let Some(summary) = summary {
        let d = &summary.decision;
        println!();
        println!(
            "Latest decision: {} by {} on {}",
            d.outcome,
            d.admin_id,
            d.decided_at.format("%Y-%m-%d %H:%M")
        );
        if summary.has_comment {
            println!("  {}", d.comment);
        }
    }

    Ok(())
}

pub fn handle_decide(
    identity: &IdentityArgs,
    id: String,
    outcome: String,
    comment: String,
    json: bool,
) -> Result<()> {
    let session = Session::open(identity)?;
    let outcome: IdeaStatus = outcome.parse()?;
    let idea = session.resolve_idea(&id)?;

    let workflow = DecisionWorkflow::new(&session.store, &session.store);
    let decision = workflow.make_decision(&idea.id, &session.actor, outcome, &comment)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!("Marked idea {} as {}", label(&idea), decision.outcome);
    }

    Ok(())
}

pub fn handle_history(identity: &IdentityArgs, id: String, json: bool) -> Result<()> {
    let session = Session::open(identity)?;
    let idea = session.resolve_idea(&id)?;
    let history = session.view().visible_history(&idea.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    println!("History for idea {}\n", label(&idea));
    if history.is_empty() {
        println!("  No decisions yet.");
    }
    for entry in history {
        let from = entry
            .from_status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {}  {} -> {}  by {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            from,
            entry.to_status,
            entry.actor_id
        );
        if let Some(comment) = entry.comment {
            println!("      {}", comment);
        }
    }

    Ok(())
}

pub fn handle_attach(identity: &IdentityArgs, id: String, path: PathBuf) -> Result<()> {
    let session = Session::open(identity)?;
    // Visible means owned by the actor, or the actor is an admin
    let idea = session.resolve_idea(&id)?;
    let (name, size) = file_metadata(&path)?;

    let attachment = Attachment::new(idea.id, name, size);
    session.store.add_attachment(&attachment)?;

    println!(
        "Attached {} ({} bytes) to idea {}",
        attachment.file_name,
        attachment.file_size,
        label(&idea)
    );

    Ok(())
}

pub fn handle_delete(identity: &IdentityArgs, id: String, force: bool) -> Result<()> {
    let session = Session::open(identity)?;
    session.actor.require_admin("Deleting an idea")?;
    let idea = session.resolve_idea(&id)?;

    if !force {
        eprintln!("Delete idea {} and its review history? [y/N] ", label(&idea));

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(IdeaflowError::Validation(vec![
                "Use --force to delete in non-interactive mode.".to_string(),
            ]));
        }
    }

    session.store.delete_attachment_for(&idea.id)?;
    session.store.delete_for(&idea.id)?;
    session.store.delete_idea(&idea.id)?;
    tracing::info!(idea = %idea.id, admin = %session.actor.id, "idea deleted");

    println!("Deleted idea {}", label(&idea));

    Ok(())
}

pub fn handle_overview(identity: &IdentityArgs, json: bool) -> Result<()> {
    let session = Session::open(identity)?;
    let rows = admin_overview(&session.actor, &session.store, &session.store, &session.store)?;
    let ideas: Vec<Idea> = rows.iter().map(|r| r.idea.clone()).collect();
    let counts = status_counts(&ideas);

    if json {
        let counts: BTreeMap<&str, usize> =
            counts.iter().map(|(s, n)| (s.as_str(), *n)).collect();
        let out = serde_json::json!({ "counts": counts, "ideas": rows });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let totals: Vec<String> = counts
        .iter()
        .map(|(status, n)| format!("{}: {}", status, n))
        .collect();
    println!("{} ideas ({})\n", ideas.len(), totals.join(", "));

    for row in rows {
        println!(
            "  {:03} ({}) [{}] {}",
            row.idea.sequence_number,
            row.idea.short_id(),
            row.idea.status,
            row.idea.title
        );
        let mut details = vec![
            format!("by {}", row.idea.submitter_id),
            format!("{} decision(s)", row.decision_count),
        ];
        if let Some(d) = &row.latest_decision {
            details.push(format!("last by {}", d.admin_id));
        }
        if let Some(a) = &row.attachment {
            details.push(format!("attachment: {}", a.file_name));
        }
        println!("      {}", details.join(", "));
    }

    Ok(())
}
