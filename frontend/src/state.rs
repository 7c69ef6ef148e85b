//! Client-side view state, kept free of web APIs so transitions can be tested natively.

use shared::{CreateTaskRequest, Task};

pub const LOAD_FAILED: &str = "Failed to load tasks. Please try again.";
pub const CREATE_FAILED: &str = "Failed to add task. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update task. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Loading,
    Empty,
    List,
}

#[derive(Debug, Clone, Default)]
pub struct TodoState {
    /// Incomplete tasks as last fetched, newest first.
    pub tasks: Vec<Task>,
    pub title: String,
    pub description: String,
    /// True while a request is in flight; disables the form and buttons.
    pub loading: bool,
    pub error: Option<String>,
}

impl TodoState {
    pub fn begin_request(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn tasks_loaded(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.loading = false;
    }

    /// The create request for the current form, or `None` when the title is blank.
    pub fn submission(&self) -> Option<CreateTaskRequest> {
        if self.loading || self.title.trim().is_empty() {
            return None;
        }
        Some(CreateTaskRequest::new(
            self.title.clone(),
            self.description.clone(),
        ))
    }

    /// Clears the form. `loading` stays set because a list refresh follows.
    pub fn task_created(&mut self) {
        self.title.clear();
        self.description.clear();
    }

    /// Records a failure. Form fields are left as typed so the user can retry.
    pub fn request_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn view_mode(&self) -> ViewMode {
        match (self.loading, self.tasks.is_empty()) {
            (true, true) => ViewMode::Loading,
            (false, true) => ViewMode::Empty,
            (_, false) => ViewMode::List,
        }
    }
}

pub fn created_label(task: &Task) -> String {
    format!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M:%S UTC"))
}
