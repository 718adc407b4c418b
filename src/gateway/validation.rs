//! Input checks run by every gateway before its first write.

use crate::error::StoreError;
use crate::model::{NewStudent, StudentPatch};

const NAME_MAX_LENGTH: usize = 200;

pub struct StudentValidator;

impl StudentValidator {
    /// Name is required and non-blank.
    pub fn validate_new(input: &NewStudent) -> Result<(), StoreError> {
        validate_name(&input.name)?;
        validate_course_ids(&input.course_ids)
    }

    /// Only the fields present in the patch are checked.
    pub fn validate_patch(patch: &StudentPatch) -> Result<(), StoreError> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(ids) = &patch.course_ids {
            validate_course_ids(ids)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Validation("name is required".into()));
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(StoreError::Validation(format!(
            "name must be at most {} characters",
            NAME_MAX_LENGTH
        )));
    }
    Ok(())
}

fn validate_course_ids(ids: &[String]) -> Result<(), StoreError> {
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(StoreError::Validation("course ids must not be empty".into()));
    }
    for (i, id) in ids.iter().enumerate() {
        if ids[..i].contains(id) {
            return Err(StoreError::Validation(format!("duplicate course id: {}", id)));
        }
    }
    Ok(())
}
