pub use masterror::{AppError, AppResult};

/// Human-readable text carried by an error, or its kind when it has none
pub fn error_message(err: &AppError) -> String {
    err.render_message().into_owned()
}

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create error for an empty or otherwise unusable question
pub fn question_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create storage error from a SQLite failure
pub fn storage_error(err: rusqlite::Error) -> AppError {
    let msg = match &err {
        rusqlite::Error::SqliteFailure(_, Some(detail)) => detail.clone(),
        rusqlite::Error::MultipleStatement => {
            String::from("Multiple statements provided, only one is allowed")
        }
        _ => err.to_string()
    };
    AppError::internal(msg)
}

/// Create model loading error
pub fn model_load_error(message: impl Into<String>) -> AppError {
    AppError::service(format!("Failed to load model: {}", message.into()))
}

/// Create LLM API error
pub fn llm_api_error(message: impl Into<String>) -> AppError {
    AppError::service(message.into())
}

/// Create HTTP error
pub fn http_error(err: reqwest::Error) -> AppError {
    let msg = if err.is_timeout() {
        format!("Request timeout: {}", err)
    } else if err.is_connect() {
        format!("Connection failed: {}", err)
    } else if err.is_status() {
        format!("HTTP error {}: {}", err.status().unwrap_or_default(), err)
    } else {
        err.to_string()
    };
    AppError::service(msg)
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}
