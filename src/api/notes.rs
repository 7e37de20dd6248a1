//! Note API management
//!
//! Every operation requires a verified caller identity, and every mutation
//! checks that the caller owns the note. Notes move through
//! active -> soft-deleted -> purged; soft-deleted notes stay listable so a
//! trash view can be built on top, and purging is irreversible.

use axum::extract::Query;
use axum::Extension;
use chrono::naive::NaiveDateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::notes::Note;
use crate::notes::RestorePolicy;
use crate::storage::CreateNoteValues;
use crate::storage::Storage;
use crate::storage::UpdateNoteValues;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

/// The note response information
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tag: String,
    pub pinned: bool,
    pub touched_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl NoteResponse {
    fn from_note(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            tag: note.tag,
            pinned: note.pinned,
            touched_at: note.touched_at,
            created_at: note.created_at,
            updated_at: note.updated_at,
            deleted_at: note.deleted_at,
        }
    }

    fn from_note_multiple(mut notes: Vec<Note>) -> Vec<Self> {
        notes.drain(..).map(Self::from_note).collect::<Vec<Self>>()
    }
}

/// List all notes of the caller
///
/// Pinned notes come first, then the most recently touched. Soft-deleted
/// notes are included, with their `deletedAt` set, for the trash view.
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let notes = storage
        .find_all_notes_by_user(current_user.id())
        .await
        .map_err(Error::storage)?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

/// Create note form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteForm {
    /// Title of the note, required
    title: String,
    /// Content of the note
    #[serde(default)]
    content: String,
    /// Single free-text tag
    #[serde(default)]
    tag: String,
}

/// Create a note owned by the caller
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    Form(form): Form<CreateNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    if form.title.trim().is_empty() {
        return Err(Error::bad_request("Title can not be empty"));
    }

    let values = CreateNoteValues {
        user_id: current_user.id(),
        title: &form.title,
        content: &form.content,
        tag: &form.tag,
    };

    let note = storage
        .create_note(&values)
        .await
        .map_err(Error::storage)?;

    Ok(Success::created(NoteResponse::from_note(note)))
}

/// Update note form
///
/// This is a merge-patch: fields left out are not touched
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteForm {
    /// New (optional) title of the note
    title: Option<String>,
    /// New (optional) content of the note
    content: Option<String>,
    /// New (optional) tag of the note
    tag: Option<String>,
}

/// Update a note of the caller
///
/// Soft-deleted notes can still be edited before they are purged.
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<i64>,
    Form(form): Form<UpdateNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let note = fetch_owned_note(&storage, current_user, note_id).await?;

    let values = UpdateNoteValues {
        title: form.title.as_ref(),
        content: form.content.as_ref(),
        tag: form.tag.as_ref(),
    };

    let note = storage
        .update_note(&note, &values)
        .await
        .map_err(Error::storage)?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Search parameters
#[derive(Debug, Deserialize)]
pub struct SearchParameters {
    /// The search query
    #[serde(default)]
    q: String,
}

/// Search the notes of the caller
///
/// Case-insensitive substring match against title, content and tag.
pub async fn search<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    Query(parameters): Query<SearchParameters>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    if parameters.q.is_empty() {
        return Err(Error::bad_request("Search query can not be empty"));
    }

    let notes = storage
        .search_notes_by_user(current_user.id(), &parameters.q)
        .await
        .map_err(Error::storage)?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

/// Pin note form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinNoteForm {
    /// The requested pin state
    pinned: bool,
}

/// Set the pinned flag of a note of the caller
///
/// Pin state is metadata: the last-touched timestamp is left alone, so
/// pinning does not reshuffle the recency ordering.
pub async fn pin<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<i64>,
    Form(form): Form<PinNoteForm>,
) -> Result<Success<&'static str>, Error> {
    let note = storage
        .find_single_note_by_id(note_id)
        .await
        .map_err(Error::storage)?;

    // a missing note and a foreign note are deliberately indistinguishable
    let note = match note {
        Some(note) if note.user_id == current_user.id() => note,
        _ => return Err(Error::forbidden("Not the owner of this note")),
    };

    storage
        .set_note_pinned(&note, form.pinned)
        .await
        .map_err(Error::storage)?;

    Ok(Success::<&'static str>::no_content())
}

/// Soft-delete a note of the caller
///
/// The note is kept around and can be restored; deleting an already
/// soft-deleted note just re-stamps the deletion timestamp.
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<&'static str>, Error> {
    let note = fetch_owned_note(&storage, current_user, note_id).await?;

    storage
        .soft_delete_note(&note)
        .await
        .map_err(Error::storage)?;

    Ok(Success::<&'static str>::no_content())
}

/// Restore a soft-deleted note of the caller
///
/// Only allowed while the deletion timestamp is within the restore window.
pub async fn restore<S: Storage>(
    Extension(storage): Extension<S>,
    Extension(restore_policy): Extension<RestorePolicy>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<&'static str>, Error> {
    let note = fetch_owned_note(&storage, current_user, note_id).await?;

    if let Some(deleted_at) = note.deleted_at {
        if !restore_policy.restore_allowed(deleted_at, Utc::now().naive_utc()) {
            return Err(Error::bad_request("Restore window has expired"));
        }
    }

    storage
        .restore_note(&note)
        .await
        .map_err(Error::storage)?;

    Ok(Success::<&'static str>::no_content())
}

/// Permanently delete a note of the caller, regardless of its current state
///
/// This removes the note for good, there is no way back.
pub async fn permanent<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<&'static str>, Error> {
    let note = fetch_owned_note(&storage, current_user, note_id).await?;

    storage
        .delete_note_permanent(&note)
        .await
        .map_err(Error::storage)?;

    Ok(Success::<&'static str>::no_content())
}

/// Fetch a note and check that the caller owns it
///
/// The soft-delete marker is ignored: the owner may still edit, restore or
/// purge a note sitting in the trash.
async fn fetch_owned_note<S: Storage>(
    storage: &S,
    current_user: CurrentUser,
    note_id: i64,
) -> Result<Note, Error> {
    let note = storage
        .find_single_note_by_id(note_id)
        .await
        .map_err(Error::storage)?
        .map_or_else(|| Err(Error::not_found("Note not found")), Ok)?;

    if note.user_id == current_user.id() {
        Ok(note)
    } else {
        Err(Error::forbidden("Not the owner of this note"))
    }
}
