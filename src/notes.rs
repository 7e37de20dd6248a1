use chrono::naive::NaiveDateTime;
use chrono::Duration;

#[derive(Clone, Debug)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub tag: String,
    pub touched_at: NaiveDateTime,
    pub pinned: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

/// How long a soft-deleted note stays restorable
#[derive(Clone, Copy, Debug)]
pub struct RestorePolicy {
    /// Size of the window, in days
    window_days: i64,
}

impl RestorePolicy {
    pub fn new(window_days: i64) -> Self {
        Self { window_days }
    }

    /// Whether a note deleted at `deleted_at` may still be restored at `now`
    pub fn restore_allowed(self, deleted_at: NaiveDateTime, now: NaiveDateTime) -> bool {
        now - deleted_at <= Duration::days(self.window_days)
    }
}
