use thiserror::Error;

pub type Result<T> = std::result::Result<T, WirefrontError>;

#[derive(Debug, Error)]
pub enum WirefrontError {
    #[error("Scan target not resolvable: {location}")]
    ResourceNotFound { location: String },

    #[error("Failed to load component type: {type_name}")]
    TypeLoadFailure { type_name: String },

    #[error("Failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("Dependency not found: {key}")]
    DependencyNotFound { key: String },

    #[error("Missing required property: {key}")]
    MissingProperty { key: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for WirefrontError {
    fn into_response(self) -> axum::response::Response {
        // Startup-phase errors never reach a live request path; the mapping
        // exists so bootstrap helpers can be called from axum handlers.
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            self.to_string(),
        )
            .into_response()
    }
}
