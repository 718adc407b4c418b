//! Runtime configuration for the roster server.

use crate::error::ConfigError;
use crate::model::{Course, Filters};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/roster";
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Which gateway backs the state container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Remote PostgreSQL store.
    Postgres,
    /// In-process store; nothing survives a restart.
    Memory,
}

impl std::str::FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "memory" => Ok(Backend::Memory),
            _ => Err(ConfigError::Invalid {
                key: "ROSTER_BACKEND",
                reason: format!("{} (expected postgres or memory)", s),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    pub database_url: String,
    /// Schema holding students, courses and student_courses.
    pub schema: String,
    pub max_connections: u32,
    pub bind_addr: String,
    pub backend: Backend,
    pub default_filters: Filters,
    /// Courses inserted (or refreshed) at startup.
    #[serde(default)]
    pub seed_courses: Vec<Course>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        RosterConfig {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            schema: DEFAULT_SCHEMA.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            bind_addr: DEFAULT_BIND.to_string(),
            backend: Backend::Postgres,
            default_filters: Filters::default(),
            seed_courses: Vec::new(),
        }
    }
}
