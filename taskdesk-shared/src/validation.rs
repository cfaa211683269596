/// Task field and status rules
///
/// Two checks guard every write:
///
/// - [`validate_task_data`] runs before a task is created.
/// - [`validate_task_update`] runs against the stored task before an update.
///   `title` and `description` are frozen once created, so an update may
///   only repeat their current values; `status` must be one of the five
///   lifecycle values.
///
/// Statuses arrive as raw strings so that a bad value is reported as a
/// validation failure with the allowed values, not as a malformed body.
///
/// # Example
///
/// ```
/// use taskdesk_shared::validation::{validate_task_data, NewTask, TaskValidationError};
///
/// let task = NewTask { title: "   ".into(), description: None, status: None };
/// assert_eq!(validate_task_data(&task), Err(TaskValidationError::EmptyTitle));
/// ```

use crate::models::task::{Task, TaskStatus, UpdateTask};
use serde::{Deserialize, Serialize};

/// Longest accepted description, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Why a task payload was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskValidationError {
    #[error("Title should not be empty")]
    EmptyTitle,

    #[error("Description must be at most {max} characters (got {actual})")]
    DescriptionTooLong { max: usize, actual: usize },

    /// PostgreSQL text columns cannot store U+0000
    #[error("{field} must not contain NUL characters")]
    NulCharacter { field: &'static str },

    #[error("Invalid status '{value}'. Allowed values are: {allowed}")]
    InvalidStatus { value: String, allowed: String },

    #[error("Title cannot be updated")]
    TitleImmutable,

    #[error("Description cannot be updated")]
    DescriptionImmutable,
}

/// Create payload as received on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Defaults to `pending` when absent
    #[serde(default)]
    pub status: Option<String>,
}

/// Update payload as received on the wire; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskChanges {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

/// Parses a wire status
pub fn parse_status(value: &str) -> Result<TaskStatus, TaskValidationError> {
    value
        .parse()
        .map_err(|_| TaskValidationError::InvalidStatus {
            value: value.to_string(),
            allowed: TaskStatus::allowed_values(),
        })
}

fn check_description(description: Option<&str>) -> Result<(), TaskValidationError> {
    let Some(description) = description else {
        return Ok(());
    };

    if description.contains('\0') {
        return Err(TaskValidationError::NulCharacter {
            field: "Description",
        });
    }

    let actual = description.chars().count();
    if actual > MAX_DESCRIPTION_CHARS {
        return Err(TaskValidationError::DescriptionTooLong {
            max: MAX_DESCRIPTION_CHARS,
            actual,
        });
    }

    Ok(())
}

/// Checks a create payload and returns the starting status
///
/// Fails if the title is empty or whitespace-only, if either text field
/// contains a NUL character, if the description is longer than
/// [`MAX_DESCRIPTION_CHARS`], or if a status is given that is not one of the
/// five allowed values. The title has no length limit.
pub fn validate_task_data(task: &NewTask) -> Result<Option<TaskStatus>, TaskValidationError> {
    if task.title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    if task.title.contains('\0') {
        return Err(TaskValidationError::NulCharacter { field: "Title" });
    }

    check_description(task.description.as_deref())?;

    task.status.as_deref().map(parse_status).transpose()
}

/// Checks an update against the stored task and returns the fields to write
///
/// A `title` or `description` equal to the stored value is accepted and
/// written back unchanged; any other value is rejected.
pub fn validate_task_update(
    existing: &Task,
    update: &TaskChanges,
) -> Result<UpdateTask, TaskValidationError> {
    if let Some(title) = &update.title {
        if *title != existing.title {
            return Err(TaskValidationError::TitleImmutable);
        }
    }

    if let Some(description) = &update.description {
        if existing.description.as_deref() != Some(description.as_str()) {
            return Err(TaskValidationError::DescriptionImmutable);
        }
    }

    let status = update.status.as_deref().map(parse_status).transpose()?;

    Ok(UpdateTask {
        title: update.title.clone(),
        description: update.description.clone(),
        status,
    })
}
