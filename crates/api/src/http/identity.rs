//! Caller identity from request headers
//!
//! The identity provider sits in front of this service and forwards the
//! authenticated user as headers:
//! - `x-user-id`: user UUID (required)
//! - `x-vet-id`: vet profile UUID when acting as a veterinarian
//! - `x-staff`: `true`/`1` for clinic staff

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use petnco_domain::{Actor, UserId, VetId};

use super::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const VET_ID_HEADER: &str = "x-vet-id";
pub const STAFF_HEADER: &str = "x-staff";

/// Authenticated caller of a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Actor);

impl Caller {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let user_id: UserId = header_str(headers, USER_ID_HEADER)?
            .ok_or_else(|| ApiError::Unauthenticated(format!("missing {USER_ID_HEADER} header")))?
            .parse()
            .map_err(|_| ApiError::Unauthenticated(format!("invalid {USER_ID_HEADER} header")))?;

        let vet_id: Option<VetId> = header_str(headers, VET_ID_HEADER)?
            .map(|raw| {
                raw.parse().map_err(|_| {
                    ApiError::Unauthenticated(format!("invalid {VET_ID_HEADER} header"))
                })
            })
            .transpose()?;

        let is_staff = header_str(headers, STAFF_HEADER)?
            .is_some_and(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        Ok(Self(Actor { user_id, is_staff, vet_id }))
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, ApiError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::trim)
                .map_err(|_| ApiError::Unauthenticated(format!("{name} header is not ASCII")))
        })
        .transpose()
}
