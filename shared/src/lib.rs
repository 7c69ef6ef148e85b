use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod validation;

pub use validation::{validate_new_task, TaskValidationError};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Number of tasks returned by the incomplete-list view.
pub const INCOMPLETE_LIST_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload that has already passed [`validate_new_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: String,
}

impl NewTask {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl CreateTaskRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    /// Presence check performed by the API before anything reaches storage.
    ///
    /// Only emptiness is checked here; length bounds belong to the write
    /// boundary (see [`validate_new_task`]).
    pub fn require_fields(self) -> Result<(String, String), TaskValidationError> {
        let title = self
            .title
            .filter(|t| !t.is_empty())
            .ok_or(TaskValidationError::MissingTitle)?;
        let description = self
            .description
            .filter(|d| !d.is_empty())
            .ok_or(TaskValidationError::MissingDescription)?;
        Ok((title, description))
    }
}

impl Task {
    pub fn new(task: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Completion is one-way; calling this on a finished task only bumps `updated_at`.
    pub fn mark_done(&mut self, now: DateTime<Utc>) {
        self.completed = true;
        self.updated_at = now;
    }
}
