//! Load config from environment variables (after `.env`, when the binary loads one).

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use crate::model::Course;

impl RosterConfig {
    /// Read from the process environment and validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = RosterConfig::default();
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(schema) = lookup("ROSTER_SCHEMA") {
            config.schema = schema;
        }
        if let Some(n) = lookup("ROSTER_MAX_CONNECTIONS") {
            config.max_connections = n.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "ROSTER_MAX_CONNECTIONS",
                reason: format!("not a number: {}", n),
            })?;
        }
        if let Some(bind) = lookup("ROSTER_BIND") {
            config.bind_addr = bind;
        }
        if let Some(backend) = lookup("ROSTER_BACKEND") {
            config.backend = backend.parse()?;
        }
        if let Some(year) = lookup("ROSTER_DEFAULT_YEAR") {
            config.default_filters.year = year;
        }
        if let Some(class) = lookup("ROSTER_DEFAULT_CLASS") {
            config.default_filters.class = class;
        }
        if let Some(raw) = lookup("ROSTER_SEED_COURSES") {
            config.seed_courses = parse_seed_courses(&raw)?;
        }
        validate(&config)?;
        Ok(config)
    }
}

/// JSON array of `{ "id", "name", "code"? }`.
fn parse_seed_courses(raw: &str) -> Result<Vec<Course>, ConfigError> {
    serde_json::from_str(raw).map_err(|e| ConfigError::Load(format!("ROSTER_SEED_COURSES: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<RosterConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RosterConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(load(&[]).unwrap(), RosterConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("ROSTER_SCHEMA", "school"),
            ("ROSTER_MAX_CONNECTIONS", "8"),
            ("ROSTER_BACKEND", "memory"),
            ("ROSTER_DEFAULT_CLASS", ""),
            ("ROSTER_SEED_COURSES", r#"[{"id":"c1","name":"CBSE 9 Math","code":"M9"}]"#),
        ])
        .unwrap();
        assert_eq!(config.schema, "school");
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.default_filters.class, "");
        assert_eq!(config.default_filters.year, "AY 2024-25");
        assert_eq!(config.seed_courses[0].code.as_deref(), Some("M9"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(load(&[("ROSTER_MAX_CONNECTIONS", "many")]).is_err());
        assert!(load(&[("ROSTER_BACKEND", "sqlite")]).is_err());
        assert!(load(&[("ROSTER_SEED_COURSES", "{")]).is_err());
        assert!(load(&[("ROSTER_SCHEMA", "drop table;")]).is_err());
    }
}
