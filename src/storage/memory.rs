//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::notes::Note;
use crate::users::User;

use super::CreateNoteValues;
use super::CreateUserValues;
use super::Result;
use super::Storage;
use super::UpdateNoteValues;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug)]
pub struct Memory {
    /// All users in storage
    users: Arc<Mutex<HashMap<i64, User>>>,

    /// All notes in storage
    notes: Arc<Mutex<HashMap<i64, Note>>>,

    /// Source of record identifiers, shared by users and notes
    id_sequence: Arc<AtomicI64>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            notes: Arc::new(Mutex::new(HashMap::new())),
            id_sequence: Arc::new(AtomicI64::new(1)),
        }
    }

    fn next_id(&self) -> i64 {
        self.id_sequence.fetch_add(1, Ordering::Relaxed)
    }
}

/// Order notes for listing: pinned first, then last-touched descending
fn sort_for_listing(notes: &mut [Note]) {
    notes.sort_by(|left, right| {
        right
            .pinned
            .cmp(&left.pinned)
            .then(right.touched_at.cmp(&left.touched_at))
    });
}

/// Case-insensitive substring match over title, content and tag
fn matches_query(note: &Note, query: &str) -> bool {
    note.title.to_lowercase().contains(query)
        || note.content.to_lowercase().contains(query)
        || note.tag.to_lowercase().contains(query)
}

#[async_trait]
impl Storage for Memory {
    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        let user = User {
            id: self.next_id(),
            username: values.username.to_string(),
            email: values.email.to_string(),
            hashed_password: values.hashed_password.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        };

        self.users.lock().await.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        Ok(self.notes.lock().await.get(&id).cloned())
    }

    async fn find_all_notes_by_user(&self, user_id: i64) -> Result<Vec<Note>> {
        let mut notes = self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| note.user_id == user_id)
            .cloned()
            .collect::<Vec<Note>>();

        sort_for_listing(&mut notes);

        Ok(notes)
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        let note = Note {
            id: self.next_id(),
            user_id: values.user_id,
            title: values.title.to_string(),
            content: values.content.to_string(),
            tag: values.tag.to_string(),
            touched_at: Utc::now().naive_utc(),
            pinned: false,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
            deleted_at: None,
        };

        self.notes.lock().await.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update_note(&self, note: &Note, values: &UpdateNoteValues<'_>) -> Result<Note> {
        Ok(self
            .notes
            .lock()
            .await
            .get_mut(&note.id)
            .map(|note| {
                if let Some(title) = values.title {
                    note.title = title.to_string();
                }

                if let Some(content) = values.content {
                    note.content = content.to_string();
                }

                if let Some(tag) = values.tag {
                    note.tag = tag.to_string();
                }

                note.touched_at = Utc::now().naive_utc();
                note.updated_at = Utc::now().naive_utc();

                note.clone()
            })
            .expect("HashMap is the source of the note"))
    }

    async fn set_note_pinned(&self, note: &Note, pinned: bool) -> Result<Note> {
        Ok(self
            .notes
            .lock()
            .await
            .get_mut(&note.id)
            .map(|note| {
                note.pinned = pinned;
                note.updated_at = Utc::now().naive_utc();

                note.clone()
            })
            .expect("HashMap is the source of the note"))
    }

    async fn soft_delete_note(&self, note: &Note) -> Result<()> {
        if let Some(note) = self.notes.lock().await.get_mut(&note.id) {
            note.deleted_at = Some(Utc::now().naive_utc());
        }

        Ok(())
    }

    async fn restore_note(&self, note: &Note) -> Result<()> {
        if let Some(note) = self.notes.lock().await.get_mut(&note.id) {
            note.deleted_at = None;
        }

        Ok(())
    }

    async fn delete_note_permanent(&self, note: &Note) -> Result<()> {
        self.notes.lock().await.remove(&note.id);

        Ok(())
    }

    async fn search_notes_by_user(&self, user_id: i64, query: &str) -> Result<Vec<Note>> {
        let query = query.to_lowercase();

        Ok(self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| note.user_id == user_id && matches_query(note, &query))
            .cloned()
            .collect())
    }
}
