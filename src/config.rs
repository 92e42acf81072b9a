use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::{Actor, Role};
use crate::error::{IdeaflowError, Result};

pub const CONFIG_FILE: &str = "config.json";

/// Project configuration stored in `.ideaflow/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file name, relative to the `.ideaflow/` directory
    pub database: String,
    /// Default tracing filter when `IDEAFLOW_LOG` is unset
    pub log_filter: String,
    /// Default identity for commands run without `--user`
    pub user: Option<String>,
    pub role: Option<Role>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: "ideaflow.db".to_string(),
            log_filter: "warn".to_string(),
            user: None,
            role: None,
        }
    }
}

impl Config {
    /// Load from `dir/config.json`, falling back to defaults when the file is absent
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(CONFIG_FILE), raw)?;
        Ok(())
    }

    /// Resolve who is acting. Explicit values win over the configured defaults;
    /// a user without a role is treated as a submitter.
    pub fn resolve_actor(&self, user: Option<String>, role: Option<Role>) -> Result<Actor> {
        let id = user
            .or_else(|| self.user.clone())
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                IdeaflowError::Forbidden(
                    "no identity; pass --user or set IDEAFLOW_USER".to_string(),
                )
            })?;
        let role = role.or(self.role).unwrap_or_default();
        Ok(Actor::new(id.trim(), role))
    }
}
