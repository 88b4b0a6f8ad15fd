// ABOUTME: Input validation for project create/update payloads
// ABOUTME: Length limits and required-field checks applied before storage

use thiserror::Error;

use crate::types::{ProjectCreateInput, ProjectUpdateInput};

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    Required(&'static str),

    #[error("Field '{field}' exceeds maximum length of {max}")]
    TooLong { field: &'static str, max: usize },
}

/// Truncate a string to a maximum number of characters
pub fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Validate a project create payload
pub fn validate_project_create(input: &ProjectCreateInput) -> Result<(), ValidationError> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::Required("name"));
    }
    if input.name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name",
            max: MAX_NAME_LENGTH,
        });
    }
    if input.description.trim().is_empty() {
        return Err(ValidationError::Required("description"));
    }
    if input.description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong {
            field: "description",
            max: MAX_DESCRIPTION_LENGTH,
        });
    }
    Ok(())
}

/// Validate a project update payload
pub fn validate_project_update(input: &ProjectUpdateInput) -> Result<(), ValidationError> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LENGTH,
            });
        }
    }
    if let Some(description) = &input.description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::TooLong {
                field: "description",
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ProjectCreateInput {
        ProjectCreateInput {
            name: "Checkout revamp".to_string(),
            description: "Rebuild the checkout flow".to_string(),
            objective: None,
        }
    }

    #[test]
    fn test_valid_create_passes() {
        assert!(validate_project_create(&valid_input()).is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut input = valid_input();
        input.name = "   ".to_string();
        assert_eq!(
            validate_project_create(&input),
            Err(ValidationError::Required("name"))
        );
    }

    #[test]
    fn test_oversized_name_rejected() {
        let mut input = valid_input();
        input.name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            validate_project_create(&input),
            Err(ValidationError::TooLong { field: "name", .. })
        ));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
