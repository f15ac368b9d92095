use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

#[derive(thiserror::Error, Debug)]
pub enum ArticleError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Constraint(String),

    #[error("an error occurred with the database: {0}")]
    Database(#[from] sqlx::Error),
}

impl ArticleError {
    pub fn not_found(url: &str) -> Self {
        Self::NotFound(format!("article `{url}` not found"))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    #[error(transparent)]
    Article(#[from] ArticleError),

    #[error("failed to render template: {0}")]
    Render(#[from] askama::Error),

    #[error("an internal server error occurred: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl RequestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Article(ArticleError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Article(ArticleError::Database(e)) => {
                error!("Database error: {:?}", e);
                "Internal Server Error".to_string()
            }
            Self::Anyhow(e) => {
                error!("Generic error: {:?}", e);
                "Internal Server Error".to_string()
            }
            Self::Render(e) => {
                error!("Template error: {:?}", e);
                self.to_string()
            }
            _ => self.to_string(),
        };
        (status, message).into_response()
    }
}
