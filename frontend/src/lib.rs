use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::Task;
use uuid::Uuid;
use web_sys::console;

mod api;
pub mod state;

use state::{created_label, TodoState, ViewMode, CREATE_FAILED, LOAD_FAILED, UPDATE_FAILED};

#[derive(Debug, Clone)]
pub enum Msg {
    LoadTasks,
    TasksLoaded(Vec<Task>),
    SetTitle(String),
    SetDescription(String),
    Submit,
    TaskCreated(Task),
    MarkDone(Uuid),
    MarkedDone(Uuid),
    /// A request failed; `message` is shown to the user, `detail` goes to the console.
    Failed { message: &'static str, detail: String },
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    state: TodoState,
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::LoadTasks })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::LoadTasks => {
                self.state.begin_request();
                Cmd::new(async {
                    match api::fetch_incomplete_tasks().await {
                        Ok(tasks) => Msg::TasksLoaded(tasks),
                        Err(detail) => Msg::Failed {
                            message: LOAD_FAILED,
                            detail,
                        },
                    }
                })
            }
            Msg::TasksLoaded(tasks) => {
                self.state.tasks_loaded(tasks);
                Cmd::none()
            }
            Msg::SetTitle(title) => {
                self.state.title = title;
                Cmd::none()
            }
            Msg::SetDescription(description) => {
                self.state.description = description;
                Cmd::none()
            }
            Msg::Submit => {
                let Some(request) = self.state.submission() else {
                    return Cmd::none();
                };
                self.state.begin_request();
                Cmd::new(async move {
                    match api::create_task(request).await {
                        Ok(task) => Msg::TaskCreated(task),
                        Err(detail) => Msg::Failed {
                            message: CREATE_FAILED,
                            detail,
                        },
                    }
                })
            }
            Msg::TaskCreated(task) => {
                console::log_1(&format!("Task created: {}", task.id).into());
                self.state.task_created();
                Cmd::new(async { Msg::LoadTasks })
            }
            Msg::MarkDone(id) => {
                self.state.begin_request();
                Cmd::new(async move {
                    match api::mark_task_done(id).await {
                        Ok(_) => Msg::MarkedDone(id),
                        Err(detail) => Msg::Failed {
                            message: UPDATE_FAILED,
                            detail,
                        },
                    }
                })
            }
            Msg::MarkedDone(id) => {
                console::log_1(&format!("Task marked done: {}", id).into());
                Cmd::new(async { Msg::LoadTasks })
            }
            Msg::Failed { message, detail } => {
                console::error_1(&format!("{}: {}", message, detail).into());
                self.state.request_failed(message);
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text")],
            [div(
                [class("max-w-xl mx-auto my-10 p-8 bg-ctp-mantle rounded-lg shadow-lg")],
                [
                    h1(
                        [class("text-3xl font-bold text-center text-ctp-text mb-6")],
                        [text("To-Do List")],
                    ),
                    self.view_error(),
                    self.view_create_form(),
                    self.view_tasks(),
                ],
            )],
        )
    }
}

impl Model {
    fn view_error(&self) -> Node<Msg> {
        match &self.state.error {
            Some(message) => div(
                [class("mb-6 px-4 py-3 rounded-md text-center bg-ctp-red/20 text-ctp-red")],
                [text(message)],
            ),
            None => span([], []),
        }
    }

    fn view_create_form(&self) -> Node<Msg> {
        let loading = self.state.loading;
        div(
            [class("mb-8 p-6 bg-ctp-surface0 rounded-lg border border-ctp-surface1 space-y-4")],
            [
                input(
                    [
                        r#type("text"),
                        placeholder("Title"),
                        value(&self.state.title),
                        on_input(|event| Msg::SetTitle(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue"),
                    ],
                    [],
                ),
                textarea(
                    [
                        placeholder("Description"),
                        value(&self.state.description),
                        on_input(|event| Msg::SetDescription(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue h-24 resize-y"),
                    ],
                    [],
                ),
                button(
                    [
                        on_click(|_| Msg::Submit),
                        disabled(loading),
                        class("w-full bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-bold px-6 py-3 rounded-md transition-colors duration-200"),
                    ],
                    [text(if loading { "Adding..." } else { "Add Task" })],
                ),
            ],
        )
    }

    fn view_tasks(&self) -> Node<Msg> {
        match self.state.view_mode() {
            ViewMode::Loading => p(
                [class("text-center text-ctp-subtext0")],
                [text("Loading tasks...")],
            ),
            ViewMode::Empty => p(
                [class("text-center italic text-ctp-overlay0 my-8")],
                [text("No tasks yet. Add one above!")],
            ),
            ViewMode::List => ul(
                [class("flex flex-col gap-4")],
                self.state
                    .tasks
                    .iter()
                    .map(|task| self.view_task(task))
                    .collect::<Vec<_>>(),
            ),
        }
    }

    fn view_task(&self, task: &Task) -> Node<Msg> {
        let task_id = task.id;
        li(
            [
                key(task.id.to_string()),
                class("flex items-start justify-between p-4 bg-ctp-surface0 rounded-lg border border-ctp-surface1"),
            ],
            [
                div(
                    [class("flex-1 min-w-0")],
                    [
                        h3([class("text-lg font-semibold text-ctp-text mb-2")], [text(&task.title)]),
                        p(
                            [class("text-sm leading-relaxed break-words text-ctp-subtext1 mb-2")],
                            [text(&task.description)],
                        ),
                        p([class("text-xs text-ctp-overlay1")], [text(created_label(task))]),
                    ],
                ),
                button(
                    [
                        on_click(move |_| Msg::MarkDone(task_id)),
                        disabled(self.state.loading),
                        r#type("button"),
                        class("ml-4 self-center bg-ctp-green hover:bg-ctp-teal text-ctp-base font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                    ],
                    [text("Done")],
                ),
            ],
        )
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::default());
}
