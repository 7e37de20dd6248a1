//! All API endpoint setup

use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;
use axum::Router;

use crate::storage::Storage;

pub use current_user::CurrentUser;
pub use request::Form;
pub use request::PathParameters;
pub use response::Error;
pub use response::Success;

mod current_user;
mod notes;
mod request;
mod response;
mod users;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let users = Router::new()
        .route("/", post(users::register::<S>))
        .route("/token", post(users::token::<S>));

    let notes = Router::new()
        .route("/", get(notes::list::<S>))
        .route("/", post(notes::create::<S>))
        .route("/search", get(notes::search::<S>))
        .route("/{note}", patch(notes::update::<S>))
        .route("/{note}", delete(notes::delete::<S>))
        .route("/{note}/pin", put(notes::pin::<S>))
        .route("/{note}/restore", put(notes::restore::<S>))
        .route("/{note}/permanent", delete(notes::permanent::<S>));

    Router::new().nest("/users", users).nest("/notes", notes)
}
