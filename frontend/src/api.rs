use shared::{CreateTaskRequest, MessageResponse, Task};
use uuid::Uuid;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Request, RequestInit, Response};

/// Prefix for API requests; empty means same origin as the page.
const API_BASE: &str = match option_env!("TASKS_API_BASE") {
    Some(base) => base,
    None => "",
};

pub async fn fetch_incomplete_tasks() -> Result<Vec<Task>, String> {
    let text = send("GET", "/tasks", None).await?;
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse JSON: {}", e))
}

pub async fn create_task(request: CreateTaskRequest) -> Result<Task, String> {
    let body = serde_json::to_string(&request).map_err(|_| "Failed to serialize request")?;
    let text = send("POST", "/tasks", Some(body)).await?;
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse JSON: {}", e))
}

pub async fn mark_task_done(id: Uuid) -> Result<MessageResponse, String> {
    let text = send("PUT", &format!("/tasks/{}/done", id), None).await?;
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse JSON: {}", e))
}

/// Issues a request and returns the body text. Non-2xx statuses are errors.
async fn send(method: &str, path: &str, body: Option<String>) -> Result<String, String> {
    let window = window().ok_or("No window available")?;

    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let url = format!("{}{}", API_BASE, path);
    let request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|_| "Failed to create request")?;

    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|_| "Failed to set header")?;
    }

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| "Failed to send request")?
        .into();

    let text_promise = response.text().map_err(|_| "Failed to read response")?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|_| "Failed to get text")?
        .as_string()
        .ok_or("Failed to convert to string")?;

    if !response.ok() {
        return Err(error_message(response.status(), &text));
    }
    Ok(text)
}

fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<MessageResponse>(body) {
        Ok(parsed) => format!("{} ({})", parsed.message, status),
        Err(_) => format!("Request failed with status {}", status),
    }
}
