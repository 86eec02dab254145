//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::{AutoClaimRule, Config};
use std::path::Path;
use thiserror::Error;
use ticket_proto::CategoryId;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("roles.staff must list at least one role")]
    NoStaffRoles,
    #[error("tickets.name_prefix must not be empty")]
    EmptyNamePrefix,
    #[error("tickets.mailbox_capacity must be greater than zero")]
    ZeroMailboxCapacity,
    #[error("tickets.start_number must be at least 1")]
    ZeroStartNumber,
    #[error("tickets.archive_category must differ from tickets.category")]
    ArchiveIsTicketCategory,
    #[error("tickets.counter_path parent directory does not exist: {0}")]
    CounterPathInvalid(String),
    #[error("autoclaim.{0}: keyword must not be empty")]
    EmptyAutoClaimKeyword(CategoryId),
    #[error("autoclaim.{category}: invalid pattern: {error}")]
    InvalidAutoClaimPattern {
        category: CategoryId,
        error: regex::Error,
    },
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.roles.staff.is_empty() && config.roles.override_roles.is_empty() {
        errors.push(ValidationError::NoStaffRoles);
    }

    let tickets = &config.tickets;
    if tickets.name_prefix.is_empty() {
        errors.push(ValidationError::EmptyNamePrefix);
    }
    if tickets.mailbox_capacity == 0 {
        errors.push(ValidationError::ZeroMailboxCapacity);
    }
    if tickets.start_number == 0 {
        errors.push(ValidationError::ZeroStartNumber);
    }
    if let (Some(category), Some(archive)) = (&tickets.category, &tickets.archive_category)
        && category == archive
    {
        errors.push(ValidationError::ArchiveIsTicketCategory);
    }

    let counter_path = Path::new(&tickets.counter_path);
    if let Some(parent) = counter_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        errors.push(ValidationError::CounterPathInvalid(
            tickets.counter_path.clone(),
        ));
    }

    for (category, rule) in &config.autoclaim {
        match rule {
            AutoClaimRule::Keyword { value } if value.trim().is_empty() => {
                errors.push(ValidationError::EmptyAutoClaimKeyword(category.clone()));
            }
            AutoClaimRule::Pattern { regex } => {
                if let Err(error) = regex::Regex::new(regex) {
                    errors.push(ValidationError::InvalidAutoClaimPattern {
                        category: category.clone(),
                        error,
                    });
                }
            }
            AutoClaimRule::Keyword { .. } => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &str) -> Config {
        Config::parse(&format!("[roles]\nstaff = [\"1\"]\n{extra}")).unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&parse("")).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let config = Config::parse(
            r#"
[roles]
staff = []

[tickets]
name_prefix = ""
category = "5"
archive_category = "5"
counter_path = "/definitely/not/a/real/dir/counter.json"

[autoclaim."9"]
kind = "pattern"
regex = "(unclosed"

[autoclaim."10"]
kind = "keyword"
value = "   "
"#,
        )
        .unwrap();

        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::NoStaffRoles)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::EmptyNamePrefix)));
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ValidationError::ArchiveIsTicketCategory))
        );
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ValidationError::CounterPathInvalid(_)))
        );
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ValidationError::InvalidAutoClaimPattern { .. }))
        );
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ValidationError::EmptyAutoClaimKeyword(_)))
        );
    }

    #[test]
    fn test_zero_start_number_is_rejected() {
        let errors = validate(&parse("[tickets]\nstart_number = 0\n")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::ZeroStartNumber));
        assert!(validate(&parse("[tickets]\nstart_number = 1\n")).is_ok());
    }

    #[test]
    fn test_override_roles_alone_satisfy_staff_requirement() {
        let config = Config::parse("[roles]\noverride = [\"2\"]\n").unwrap();
        assert!(validate(&config).is_ok());
    }
}
