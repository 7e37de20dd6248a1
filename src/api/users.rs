//! User API management

use axum::Extension;
use serde::Deserialize;

use crate::password::hash;
use crate::password::verify;
use crate::storage::CreateUserValues;
use crate::storage::Storage;
use crate::tokens::JwtKeys;

use super::current_user::generate_token_pair;
use super::current_user::TokenPair;
use super::Error;
use super::Form;
use super::Success;

/// Registration form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    /// Username of the new user
    username: String,
    /// Email address of the new user, unique across all users
    email: String,
    /// Password of the new user
    password: String,
    /// Repeated password, must match
    confirm_password: String,
}

/// Register a new user
///
/// No token is issued at registration; follow up with a login.
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "username": "frida", "email": "frida@example.com", "password": "verysecret", "confirmPassword": "verysecret" }' \
///     http://localhost:6000/api/users
/// ```
///
/// Response
/// ```json
/// { "data": "Account created" }
/// ```
pub async fn register<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<RegisterForm>,
) -> Result<Success<&'static str>, Error> {
    if form.password != form.confirm_password {
        return Err(Error::bad_request("Passwords do not match"));
    }

    let existing_user = storage
        .find_single_user_by_email(&form.email)
        .await
        .map_err(Error::storage)?;

    if existing_user.is_some() {
        return Err(Error::bad_request("Email already in use"));
    }

    let hashed_password = hash(&form.password);

    let values = CreateUserValues {
        username: &form.username,
        email: &form.email,
        hashed_password: &hashed_password,
    };

    let user = storage
        .create_user(&values)
        .await
        .map_err(Error::storage)?;

    tracing::debug!("Registered account {} for {}", user.id, user.username);

    Ok(Success::created("Account created"))
}

/// Login form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    /// Email address of the user
    email: String,
    /// Password of the user
    password: String,
}

/// Get a token pair for a user "session"
///
/// The access token can then be used to access the rest of the API routes
/// by using it in the `Authorization` header
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "email": "frida@example.com", "password": "verysecret" }' \
///     http://localhost:6000/api/users/token
/// ```
///
/// Response
/// ```json
/// { "data": { "token_type": "Bearer", "access_token": "some token", "refresh_token": "some other token" } }
/// ```
pub async fn token<S: Storage>(
    Extension(jwt_keys): Extension<JwtKeys>,
    Extension(storage): Extension<S>,
    Form(form): Form<LoginForm>,
) -> Result<Success<TokenPair>, Error> {
    let user = storage
        .find_single_user_by_email(&form.email)
        .await
        .map_err(Error::storage)?;

    let Some(user) = user else {
        return Err(Error::unauthorized("User not found"));
    };

    if !verify(&user.hashed_password, &form.password) {
        return Err(Error::unauthorized("Wrong password"));
    }

    let token_pair = generate_token_pair(&jwt_keys, &user)?;

    Ok(Success::ok(token_pair))
}
