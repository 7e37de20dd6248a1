//! Postgres storage

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::notes::Note;
use crate::users::User;

use super::CreateNoteValues;
use super::CreateUserValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateNoteValues;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Columns of a note row, in the order every note query selects them
const NOTE_COLUMNS: &str = "id, user_id, title, content, tag, touched_at, pinned, \
     created_at, updated_at, deleted_at";

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> Self {
        let database_connection_string = std::env::var("DATABASE_URL").expect("Valid DATABASE_URL");

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .expect("Valid connection");

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Self {
        let migration_result = MIGRATOR.run(&connection_pool).await;

        if let Err(err) = migration_result {
            panic!("Migrations could not run: {err}");
        }

        Self { connection_pool }
    }
}

/// Postgres version of user
#[derive(FromRow)]
struct SqlxUser {
    /// User ID
    id: i64,

    /// Username
    username: String,

    /// Email address
    email: String,

    /// Hashed password
    hashed_password: String,

    /// Creation date
    created_at: NaiveDateTime,

    /// Last updated at
    updated_at: NaiveDateTime,
}

impl User {
    /// Create user from postgres version
    fn from_sqlx_user(user: SqlxUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            hashed_password: user.hashed_password,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    /// Maybe create user from postgres version
    fn from_sqlx_user_optional(user: Option<SqlxUser>) -> Option<Self> {
        user.map(Self::from_sqlx_user)
    }
}

/// Postgres version of note
#[derive(FromRow)]
struct SqlxNote {
    /// Note ID
    id: i64,

    /// ID of the owning user
    user_id: i64,

    /// Title
    title: String,

    /// Content
    content: String,

    /// Tag
    tag: String,

    /// Last-touched timestamp
    touched_at: NaiveDateTime,

    /// Pinned flag
    pinned: bool,

    /// Creation date
    created_at: NaiveDateTime,

    /// Last updated at
    updated_at: NaiveDateTime,

    /// Deleted at
    deleted_at: Option<NaiveDateTime>,
}

impl Note {
    /// Create note from postgres version
    fn from_sqlx_note(note: SqlxNote) -> Self {
        Self {
            id: note.id,
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            tag: note.tag,
            touched_at: note.touched_at,
            pinned: note.pinned,
            created_at: note.created_at,
            updated_at: note.updated_at,
            deleted_at: note.deleted_at,
        }
    }

    /// Maybe create note from postgres version
    fn from_sqlx_note_optional(note: Option<SqlxNote>) -> Option<Self> {
        note.map(Self::from_sqlx_note)
    }

    /// Create multiple notes from postgres version
    fn from_sqlx_note_multiple(mut notes: Vec<SqlxNote>) -> Vec<Self> {
        notes
            .drain(..)
            .map(Self::from_sqlx_note)
            .collect::<Vec<Self>>()
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, SqlxUser>(
            r"
            SELECT id, username, email, hashed_password, created_at, updated_at
            FROM users
            WHERE email = $1
            LIMIT 1
            ",
        )
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await
        .map(User::from_sqlx_user_optional)
        .map_err(connection_error)?;

        Ok(user)
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        let user = sqlx::query_as::<_, SqlxUser>(
            r"
            INSERT INTO users (username, email, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, hashed_password, created_at, updated_at
            ",
        )
        .bind(values.username)
        .bind(values.email)
        .bind(values.hashed_password)
        .fetch_one(&self.connection_pool)
        .await
        .map(User::from_sqlx_user)
        .map_err(connection_error)?;

        Ok(user)
    }

    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            SELECT {NOTE_COLUMNS}
            FROM notes
            WHERE id = $1
            LIMIT 1
            ",
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note_optional)
        .map_err(connection_error)?;

        Ok(note)
    }

    async fn find_all_notes_by_user(&self, user_id: i64) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            SELECT {NOTE_COLUMNS}
            FROM notes
            WHERE user_id = $1
            ORDER BY pinned DESC, touched_at DESC
            ",
        ))
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note_multiple)
        .map_err(connection_error)?;

        Ok(notes)
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        let note = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            INSERT INTO notes (user_id, title, content, tag)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTE_COLUMNS}
            ",
        ))
        .bind(values.user_id)
        .bind(values.title)
        .bind(values.content)
        .bind(values.tag)
        .fetch_one(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note)
        .map_err(connection_error)?;

        Ok(note)
    }

    async fn update_note(&self, note: &Note, values: &UpdateNoteValues<'_>) -> Result<Note> {
        let updated_note = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            UPDATE notes
            SET title = $1, content = $2, tag = $3,
                touched_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING {NOTE_COLUMNS}
            ",
        ))
        .bind(values.title.unwrap_or(&note.title))
        .bind(values.content.unwrap_or(&note.content))
        .bind(values.tag.unwrap_or(&note.tag))
        .bind(note.id)
        .fetch_one(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note)
        .map_err(connection_error)?;

        Ok(updated_note)
    }

    async fn set_note_pinned(&self, note: &Note, pinned: bool) -> Result<Note> {
        let updated_note = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            UPDATE notes
            SET pinned = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING {NOTE_COLUMNS}
            ",
        ))
        .bind(pinned)
        .bind(note.id)
        .fetch_one(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note)
        .map_err(connection_error)?;

        Ok(updated_note)
    }

    async fn soft_delete_note(&self, note: &Note) -> Result<()> {
        sqlx::query(
            r"
            UPDATE notes
            SET deleted_at = CURRENT_TIMESTAMP
            WHERE id = $1
            ",
        )
        .bind(note.id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }

    async fn restore_note(&self, note: &Note) -> Result<()> {
        sqlx::query(
            r"
            UPDATE notes
            SET deleted_at = NULL
            WHERE id = $1
            ",
        )
        .bind(note.id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }

    async fn delete_note_permanent(&self, note: &Note) -> Result<()> {
        sqlx::query(
            r"
            DELETE FROM notes
            WHERE id = $1
            ",
        )
        .bind(note.id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }

    async fn search_notes_by_user(&self, user_id: i64, query: &str) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, SqlxNote>(&format!(
            r"
            SELECT {NOTE_COLUMNS}
            FROM notes
            WHERE user_id = $1
                AND (title ILIKE $2 OR content ILIKE $2 OR tag ILIKE $2)
            ",
        ))
        .bind(user_id)
        .bind(format!("%{query}%"))
        .fetch_all(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note_multiple)
        .map_err(connection_error)?;

        Ok(notes)
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
