//! Current user service
//!
//! Get the current caller identity from the request based on the
//! Authorization header. Verification is stateless: the token signature
//! and expiry are the only things consulted, there is no storage
//! round-trip and no revocation list.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::Extension;
use axum::RequestPartsExt;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use serde::Serialize;

use crate::tokens;
use crate::tokens::JwtKeys;
use crate::users::User;

use super::Error;

/// Token information served to the user
#[derive(Debug, Serialize)]
pub struct TokenPair {
    /// Type of the tokens: Bearer
    token_type: String,

    /// In how many seconds does the access token expire
    expires_in: i64,

    /// The access token to provide to follow up requests in the Authorization header
    access_token: String,

    /// The long-lived refresh token
    refresh_token: String,
}

/// Generate a token pair for the outside world for a given user
pub fn generate_token_pair(jwt_keys: &JwtKeys, user: &User) -> Result<TokenPair, Error> {
    let access_token = jwt_keys
        .access
        .issue(user.id)
        .map_err(Error::internal_server_error)?;

    let refresh_token = jwt_keys
        .refresh
        .issue(user.id)
        .map_err(Error::internal_server_error)?;

    Ok(TokenPair {
        token_type: "Bearer".to_string(),
        expires_in: jwt_keys.access.time_to_live(),
        access_token,
        refresh_token,
    })
}

/// The verified caller identity, bound for the duration of one request
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser {
    /// The user ID embedded in the verified token
    id: i64,
}

impl CurrentUser {
    /// The user ID of the caller
    pub fn id(self) -> i64 {
        self.id
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the token from the authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::unauthorized("Missing or malformed bearer token"))?;

        let Extension(jwt_keys) = parts
            .extract::<Extension<JwtKeys>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get JWT keys"))?;

        let id = jwt_keys
            .access
            .verify(bearer.token())
            .map_err(|err| match err {
                tokens::Error::MalformedClaims => Error::unauthorized("Invalid token claims"),
                tokens::Error::Invalid => Error::unauthorized("Invalid token"),
            })?;

        Ok(Self { id })
    }
}
