//! Inquiry form submission

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use crate::api::middleware::AppState;
use crate::models::{ContactForm, CreateInquiryInput};
use crate::services::InquiryServiceError;
use crate::web::{Flash, PageError};

const SUBMITTED: &str = "Your request has been submitted, a realtor will get back to you soon.";
const ALREADY_INQUIRED: &str = "You have already made an inquiry for this listing";

/// POST /contact - store an inquiry and go back to the listing page.
///
/// The outcome is reported on the listing page through a flash message.
pub async fn contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<Response, PageError> {
    let input = CreateInquiryInput::try_from(form)?;
    let listing_id = input.listing_id;

    let flash = match state.inquiry_service.submit(input).await {
        Ok(_) => Flash::success(SUBMITTED),
        Err(InquiryServiceError::DuplicateInquiry { .. }) => Flash::error(ALREADY_INQUIRED),
        Err(InquiryServiceError::ValidationError(e)) => Flash::error(e.to_string()),
        Err(e) => return Err(e.into()),
    };

    Ok(redirect_with_flash(&format!("/listings/{}", listing_id), &flash))
}

fn redirect_with_flash(to: &str, flash: &Flash) -> Response {
    let redirect = Redirect::to(to);
    match flash.to_cookie() {
        Some(cookie) => ([(header::SET_COOKIE, cookie)], redirect).into_response(),
        None => redirect.into_response(),
    }
}
