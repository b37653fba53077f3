use serde::Deserialize;
use std::collections::HashMap;

use super::ValidationError;

const TITLE_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Body of POST /{user_id}/tasks
#[derive(Debug, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of PUT /{user_id}/tasks/{task_id}. A field sent as `null` is treated
/// the same as an omitted one: left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Validated, normalized create payload
#[derive(Debug, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

/// Validated, normalized update payload. `None` means "leave unchanged"; a
/// whitespace-only description normalizes to `None`, so an update can never
/// clear a stored description.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskCreate {
    pub fn validate(self) -> Result<NewTask, ValidationError> {
        let mut field_errors = HashMap::new();

        let title = match validate_title(&self.title) {
            Ok(title) => Some(title),
            Err(msg) => {
                field_errors.insert("title".to_string(), msg);
                None
            }
        };

        let description = match self.description.as_deref().map(normalize_description) {
            Some(Ok(normalized)) => normalized,
            Some(Err(msg)) => {
                field_errors.insert("description".to_string(), msg);
                None
            }
            None => None,
        };

        match title {
            Some(title) if field_errors.is_empty() => Ok(NewTask { title, description }),
            _ => Err(ValidationError::new(field_errors)),
        }
    }
}

impl TaskUpdate {
    pub fn validate(self) -> Result<TaskPatch, ValidationError> {
        let mut field_errors = HashMap::new();

        let title = match self.title.as_deref() {
            Some(raw) => match validate_title(raw) {
                Ok(title) => Some(title),
                Err(msg) => {
                    field_errors.insert("title".to_string(), msg);
                    None
                }
            },
            None => None,
        };

        let description = match self.description.as_deref().map(normalize_description) {
            Some(Ok(normalized)) => normalized,
            Some(Err(msg)) => {
                field_errors.insert("description".to_string(), msg);
                None
            }
            None => None,
        };

        if !field_errors.is_empty() {
            return Err(ValidationError::new(field_errors));
        }

        Ok(TaskPatch { title, description })
    }
}

/// Trim the title and enforce the 1..=200 character bound
fn validate_title(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Title cannot be empty or whitespace only".to_string());
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(format!("Title must be at most {TITLE_MAX_CHARS} characters"));
    }
    Ok(trimmed.to_string())
}

/// Trim the description; an empty result is stored as absent, never as an
/// empty string
fn normalize_description(raw: &str) -> Result<Option<String>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(format!(
            "Description must be at most {DESCRIPTION_MAX_CHARS} characters"
        ));
    }
    Ok(Some(trimmed.to_string()))
}
