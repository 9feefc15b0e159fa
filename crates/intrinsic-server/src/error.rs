//! HTTP error mapping.
//!
//! Status codes depend on the endpoint: a lookup failure (unknown ticker,
//! absent line item) is a 404 on the price and cash flow history endpoints
//! but a 400 on the calculation endpoints. Every error body is
//! `{"detail": "<message>"}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use intrinsic_traits::ValuationError;
use serde::{Deserialize, Serialize};

/// How an endpoint reports data that could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    /// `404 Not Found`.
    NotFound,
    /// `400 Bad Request`.
    BadRequest,
}

impl LookupStatus {
    const fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable message.
    pub detail: String,
}

/// An error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// Create an error with an explicit status.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// A `404` with the given message.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    /// Map a valuation error for an endpoint with the given lookup status.
    #[must_use]
    pub fn from_valuation(err: &ValuationError, lookup: LookupStatus) -> Self {
        match err {
            ValuationError::NotFound(_)
            | ValuationError::MissingField { .. }
            | ValuationError::NoDataAvailable(_) => {
                Self::new(lookup.status(), format!("Data not found: {err}"))
            }
            ValuationError::InsufficientData(_) => Self::not_found(format!(
                "Not enough data for calculation: {err}"
            )),
            ValuationError::InvalidParameter(_) | ValuationError::InvalidRateRelationship { .. } => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            ValuationError::DivisionUndefined(_)
            | ValuationError::UndefinedGrowth { .. }
            | ValuationError::Upstream(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal Error: {err}"),
            ),
        }
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response message.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, detail = %self.detail, "request failed");
        } else {
            tracing::warn!(status = %self.status, detail = %self.detail, "request rejected");
        }
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

macro_rules! impl_from_rejection {
    ($($rejection:ty),*) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    Self::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
                }
            }
        )*
    };
}

impl_from_rejection!(JsonRejection, PathRejection, QueryRejection);
