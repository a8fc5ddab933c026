//! Request extractors that reject with [`AppError`] instead of axum's
//! default plain-text rejections.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body decoded into `T`.
///
/// The `Content-Type` header is not inspected. Syntax errors and shape
/// mismatches both reject with [`AppError::BadRequest`] carrying the
/// `serde_json` message.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|err| AppError::bad_request(err.to_string()))
    }
}

/// Single `{id}` path segment parsed as an `i64` row id.
///
/// A segment that is not a valid `i64` (`abc`, or out of range) yields
/// `PathId(None)`: it can match no row, so handlers answer as they would
/// for a missing id instead of rejecting the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub Option<i64>);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        match raw.parse::<i64>() {
            Ok(id) => Ok(PathId(Some(id))),
            Err(err) => {
                tracing::debug!(raw = %raw, error = %err, "path id matches no row");
                Ok(PathId(None))
            }
        }
    }
}
