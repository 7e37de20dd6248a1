//! All things related to the storage of users and notes

use async_trait::async_trait;
use thiserror::Error;

use crate::notes::Note;
use crate::users::User;

#[cfg(not(feature = "postgres"))]
use memory::Memory;
#[cfg(feature = "postgres")]
use postgres::Postgres;

#[cfg(not(feature = "postgres"))]
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> Memory {
    Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> Postgres {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The username
    pub username: &'a str,

    /// The email address, unique across all users
    pub email: &'a str,

    /// The hashed password
    pub hashed_password: &'a str,
}

/// Values to create a Note
pub struct CreateNoteValues<'a> {
    /// ID of the user creating the note, never reassigned afterwards
    pub user_id: i64,

    /// Title of the note
    pub title: &'a str,

    /// Content of the note
    ///
    /// Can be anything
    pub content: &'a str,

    /// Single free-text tag
    pub tag: &'a str,
}

/// Values to update a Note
///
/// Fields left as `None` are not touched
pub struct UpdateNoteValues<'a> {
    /// New (optional) title of the note
    pub title: Option<&'a String>,

    /// New (optional) content of the note
    pub content: Option<&'a String>,

    /// New (optional) tag of the note
    pub tag: Option<&'a String>,
}

/// Storage with all supported operations
///
/// Ownership of notes is checked by the callers; storage has no notion of
/// the current caller.
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Finds a single user by its email address
    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create a single user
    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User>;

    /// Find a single note by its ID
    ///
    /// DOES NOT respect the soft-delete, handle with care
    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>>;

    /// Find all notes owned by a user, pinned notes first, then by
    /// last-touched timestamp descending
    ///
    /// DOES NOT respect the soft-delete; the deletion marker is carried on
    /// every note so callers can build a trash view
    async fn find_all_notes_by_user(&self, user_id: i64) -> Result<Vec<Note>>;

    /// Create a note, stamping the last-touched timestamp
    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note>;

    /// Update a note, re-stamping the last-touched timestamp
    async fn update_note(&self, note: &Note, values: &UpdateNoteValues<'_>) -> Result<Note>;

    /// Set the pinned flag of a note
    ///
    /// Leaves the last-touched timestamp alone, pin state is metadata
    async fn set_note_pinned(&self, note: &Note, pinned: bool) -> Result<Note>;

    /// Soft-delete a note by stamping its deletion timestamp
    ///
    /// Re-stamps the timestamp when the note is already soft-deleted
    async fn soft_delete_note(&self, note: &Note) -> Result<()>;

    /// Clear the deletion timestamp of a note
    async fn restore_note(&self, note: &Note) -> Result<()>;

    /// Remove a note from storage, irreversibly
    async fn delete_note_permanent(&self, note: &Note) -> Result<()>;

    /// Case-insensitive substring search over title, content and tag,
    /// scoped to a single user
    ///
    /// DOES NOT respect the soft-delete
    async fn search_notes_by_user(&self, user_id: i64, query: &str) -> Result<Vec<Note>>;
}
