use std::backtrace::Backtrace;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde::{Deserialize, Serialize};
use crate::store::StoreError;
use crate::validate::{BookingCheckError, ValidationError};

pub const GENERIC_ERROR: &str = "Something went wrong";

/// Envelope of every non-record response body.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct Message {
    pub message: String,
}
impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidBody(&'static str),
    #[error("{0}")]
    InvalidId(&'static str),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Store(StoreError),
}
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::InvalidBody(_) | ApiError::InvalidId(_) | ApiError::Validation(_) => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Store(_) => Status::InternalServerError,
        }
    }
    /// Maps a store lookup failure, `NotFound` becomes `not_found_message`.
    pub fn from_lookup(err: StoreError, not_found_message: &'static str) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound(not_found_message),
            err => ApiError::Store(err),
        }
    }
}
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}
impl From<BookingCheckError> for ApiError {
    fn from(err: BookingCheckError) -> Self {
        match err {
            BookingCheckError::Invalid(e) => ApiError::Validation(e),
            BookingCheckError::Store(e) => ApiError::Store(e),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let message = match &self {
            ApiError::Store(err) => {
                error!("{} {}: {err}\nbacktrace: {}", req.method(), req.uri(), Backtrace::capture());
                GENERIC_ERROR.to_string()
            }
            err => {
                warn!("{} {}: {err}", req.method(), req.uri());
                err.to_string()
            }
        };
        Custom(status, Json(Message::new(message))).respond_to(req)
    }
}
