//! Config validation.

use crate::config::RosterConfig;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;

/// Unquoted PostgreSQL identifier, at most 63 bytes.
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]{0,62}$";

pub fn validate(config: &RosterConfig) -> Result<(), ConfigError> {
    let ident = Regex::new(IDENTIFIER_PATTERN).map_err(|e| ConfigError::Load(e.to_string()))?;
    if !ident.is_match(&config.schema) {
        return Err(ConfigError::Invalid {
            key: "ROSTER_SCHEMA",
            reason: format!("not a valid identifier: {}", config.schema),
        });
    }
    if config.max_connections == 0 {
        return Err(ConfigError::Invalid {
            key: "ROSTER_MAX_CONNECTIONS",
            reason: "must be at least 1".into(),
        });
    }
    let mut seen = HashSet::new();
    for c in &config.seed_courses {
        if c.id.trim().is_empty() || c.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "ROSTER_SEED_COURSES",
                reason: "each course needs an id and a name".into(),
            });
        }
        if !seen.insert(c.id.as_str()) {
            return Err(ConfigError::Invalid {
                key: "ROSTER_SEED_COURSES",
                reason: format!("duplicate course id: {}", c.id),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Course;

    #[test]
    fn schema_must_be_identifier() {
        let mut config = RosterConfig::default();
        assert!(validate(&config).is_ok());
        config.schema = "school_2024".into();
        assert!(validate(&config).is_ok());
        config.schema = "9school".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn seed_course_ids_are_unique() {
        let course = Course {
            id: "c1".into(),
            name: "Math".into(),
            code: None,
        };
        let config = RosterConfig {
            seed_courses: vec![course.clone(), course],
            ..RosterConfig::default()
        };
        assert!(validate(&config).is_err());
    }
}
