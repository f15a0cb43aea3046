//! HTML error pages
//!
//! Handlers return `PageError`; its response carries an `ErrorPage`
//! extension that `render_error_pages` turns into the theme's `error.html`.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use tera::Context as TeraContext;

use crate::api::middleware::AppState;
use crate::models::ValidationError;
use crate::services::{InquiryServiceError, ListingServiceError, RealtorServiceError};
use crate::theme::ThemeEngine;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Page not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Marker left on an error response for the rendering layer
#[derive(Debug, Clone)]
struct ErrorPage {
    title: &'static str,
    message: String,
}

impl PageError {
    fn status(&self) -> StatusCode {
        match self {
            PageError::NotFound => StatusCode::NOT_FOUND,
            PageError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status();
        let page = match self {
            PageError::NotFound => ErrorPage {
                title: "Page Not Found",
                message: "The page you are looking for does not exist.".to_string(),
            },
            PageError::BadRequest(message) => ErrorPage {
                title: "Bad Request",
                message,
            },
            PageError::Internal(e) => {
                tracing::error!("Page request failed: {:#}", e);
                ErrorPage {
                    title: "Something went wrong",
                    message: "The page could not be displayed.".to_string(),
                }
            }
        };

        let mut response = status.into_response();
        response.extensions_mut().insert(page);
        response
    }
}

impl From<ValidationError> for PageError {
    fn from(err: ValidationError) -> Self {
        PageError::BadRequest(err.to_string())
    }
}

impl From<ListingServiceError> for PageError {
    fn from(err: ListingServiceError) -> Self {
        match err {
            ListingServiceError::NotFound(_) => PageError::NotFound,
            ListingServiceError::InternalError(e) => PageError::Internal(e),
        }
    }
}

impl From<RealtorServiceError> for PageError {
    fn from(err: RealtorServiceError) -> Self {
        match err {
            RealtorServiceError::NotFound(_) => PageError::NotFound,
            RealtorServiceError::InternalError(e) => PageError::Internal(e),
        }
    }
}

impl From<InquiryServiceError> for PageError {
    fn from(err: InquiryServiceError) -> Self {
        match err {
            InquiryServiceError::NotFound(_) => PageError::NotFound,
            InquiryServiceError::ValidationError(e) => e.into(),
            InquiryServiceError::DuplicateInquiry { .. } => {
                PageError::BadRequest(err.to_string())
            }
            InquiryServiceError::InternalError(e) => PageError::Internal(e),
        }
    }
}

/// Render `error.html` for responses produced by `PageError`
pub async fn render_error_pages(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(page) = response.extensions_mut().remove::<ErrorPage>() else {
        return response;
    };

    let status = response.status();
    let html = render_error(&state.theme_engine, status, page.title, &page.message);
    (status, Html(html)).into_response()
}

fn render_error(theme: &ThemeEngine, status: StatusCode, title: &str, message: &str) -> String {
    let mut context = TeraContext::new();
    context.insert("status", &status.as_u16());
    context.insert("title", title);
    context.insert("message", message);

    theme.render("error.html", &context).unwrap_or_else(|e| {
        tracing::warn!("Failed to render error template: {}, returning plain error page", e);
        ThemeEngine::simple_error_page(title, message)
    })
}

/// Fallback for unknown paths
pub async fn not_found() -> PageError {
    PageError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_error_status() {
        assert_eq!(PageError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            PageError::BadRequest("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        let internal: PageError = anyhow::anyhow!("boom").into();
        assert_eq!(internal.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_page_error_marks_response() {
        let response = PageError::BadRequest("price is not a whole number".into()).into_response();
        let page = response.extensions().get::<ErrorPage>().unwrap();
        assert_eq!(page.title, "Bad Request");
        assert_eq!(page.message, "price is not a whole number");
    }

    #[test]
    fn test_service_errors_map_to_pages() {
        assert!(matches!(
            PageError::from(ListingServiceError::NotFound(9)),
            PageError::NotFound
        ));
        assert!(matches!(
            PageError::from(InquiryServiceError::NotFound(9)),
            PageError::NotFound
        ));
        assert!(matches!(
            PageError::from(ValidationError::new("bedrooms", "bad")),
            PageError::BadRequest(_)
        ));
    }
}
