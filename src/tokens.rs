//! Signed identity assertions
//!
//! Issues and verifies the two kinds of JWT: short-lived access tokens and
//! long-lived refresh tokens, each signed with its own secret so that
//! compromise of one does not expose the other purpose. There is no
//! revocation; validity is entirely determined by signature and expiry.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// How long an access token stays valid, in seconds
const ACCESS_TOKEN_TIME_TO_LIVE: i64 = 15 * 60;

/// How long a refresh token stays valid, in seconds
const REFRESH_TOKEN_TIME_TO_LIVE: i64 = 7 * 24 * 60 * 60;

/// Token verification errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Malformed, wrongly signed, or expired token
    #[error("Invalid token")]
    Invalid,

    /// The signature checks out, but the claims are not shaped as expected
    #[error("Invalid token claims")]
    MalformedClaims,
}

/// The JWT claims to identify a user
#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    /// The user ID
    sub: i64,

    /// Expiry, as seconds since the Unix epoch
    exp: i64,
}

/// The keys for one token purpose
#[derive(Clone)]
pub struct TokenKeys {
    /// The encoding key
    encoding: EncodingKey,

    /// The decoding key
    decoding: DecodingKey,

    /// Seconds a freshly issued token stays valid
    time_to_live: i64,
}

impl TokenKeys {
    /// Create new encoding/decoding keys, derived from a secret
    fn new(secret: &[u8], time_to_live: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            time_to_live,
        }
    }

    /// Seconds a freshly issued token stays valid
    pub fn time_to_live(&self) -> i64 {
        self.time_to_live
    }

    /// Sign a token embedding the given user ID
    pub fn issue(&self, user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id,
            exp: Utc::now().timestamp() + self.time_to_live,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify a token and extract the embedded user ID
    ///
    /// Expiry is evaluated against the clock at the time of this call
    pub fn verify(&self, token: &str) -> Result<i64, Error> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|err| match err.kind() {
                ErrorKind::Json(_) => Error::MalformedClaims,
                _ => Error::Invalid,
            })?;

        Ok(token_data.claims.sub)
    }
}

/// The keys used for encoding/decoding JWT tokens
#[derive(Clone)]
pub struct JwtKeys {
    /// Keys for the short-lived access tokens
    pub access: TokenKeys,

    /// Keys for the long-lived refresh tokens
    pub refresh: TokenKeys,
}

impl JwtKeys {
    /// Create new encoding/decoding keys, derived from the two secrets
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access: TokenKeys::new(access_secret, ACCESS_TOKEN_TIME_TO_LIVE),
            refresh: TokenKeys::new(refresh_secret, REFRESH_TOKEN_TIME_TO_LIVE),
        }
    }
}
