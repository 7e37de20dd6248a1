use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_soft_delete_is_idempotent() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;
    let note = helper::create_note(&mut app, &access_token, "Shopping list", "", "home").await;

    let (status_code, _) = helper::maybe_delete_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // the note stays listable, with its deletion marker set
    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    let notes = notes.unwrap();
    assert_eq!(1, notes.len());
    assert!(notes[0].deleted_at.is_some());

    // deleting again is not an error
    let (status_code, _) = helper::maybe_delete_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    assert!(notes.unwrap()[0].deleted_at.is_some());
}

#[tokio::test]
async fn test_restore_within_window() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;
    let note = helper::create_note(&mut app, &access_token, "Shopping list", "", "home").await;

    let (status_code, _) = helper::maybe_delete_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let (status_code, error) = helper::maybe_restore_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);
    assert_eq!(None, error);

    // back in the land of the living
    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    assert_eq!(None, notes.unwrap()[0].deleted_at);
}

#[tokio::test]
async fn test_restore_window_expired() {
    // a zero-day window expires immediately
    let mut app = helper::setup_test_app_with_restore_window(0).await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;
    let note = helper::create_note(&mut app, &access_token, "Shopping list", "", "home").await;

    let (status_code, _) = helper::maybe_delete_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let (status_code, error) = helper::maybe_restore_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Restore window has expired".to_string()), error);

    // still in the trash
    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    assert!(notes.unwrap()[0].deleted_at.is_some());
}

#[tokio::test]
async fn test_permanent_delete_then_restore() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;
    let note = helper::create_note(&mut app, &access_token, "Shopping list", "", "home").await;

    let (status_code, _) =
        helper::maybe_permanent_delete_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // the note is gone for good, not merely outside the window
    let (status_code, error) = helper::maybe_restore_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);

    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    assert_eq!(Vec::<helper::Note>::new(), notes.unwrap());
}

#[tokio::test]
async fn test_permanent_delete_of_soft_deleted_note() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;
    let note = helper::create_note(&mut app, &access_token, "Shopping list", "", "home").await;

    let (status_code, _) = helper::maybe_delete_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let (status_code, _) =
        helper::maybe_permanent_delete_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    assert_eq!(Vec::<helper::Note>::new(), notes.unwrap());
}

#[tokio::test]
async fn test_soft_deleted_note_is_still_editable() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;
    let note = helper::create_note(&mut app, &access_token, "Shopping list", "", "home").await;

    let (status_code, _) = helper::maybe_delete_note(&mut app, &access_token, note.id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // the owner can keep editing a note sitting in the trash
    let (status_code, updated_note, _) = helper::maybe_update_note(
        &mut app,
        &access_token,
        note.id,
        json!({ "content": "last minute addition" }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    let updated_note = updated_note.unwrap();
    assert_eq!("last minute addition".to_string(), updated_note.content);
    assert!(updated_note.deleted_at.is_some());
}
