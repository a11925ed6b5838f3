use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejection is reported in the API's error format.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
