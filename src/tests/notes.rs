use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_create_and_list() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;

    // verify empty note list
    let (status_code, notes) = helper::list_notes(&mut app, &access_token).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Vec::<helper::Note>::new(), notes.unwrap());

    // create note
    let note = helper::create_note(
        &mut app,
        &access_token,
        "Shopping list",
        "Bread, cheese",
        "home",
    )
    .await;
    assert_eq!("Shopping list".to_string(), note.title);
    assert_eq!("Bread, cheese".to_string(), note.content);
    assert_eq!("home".to_string(), note.tag);
    assert!(!note.pinned);
    assert_eq!(None, note.deleted_at);

    // fetch notes, note is included
    let (status_code, notes) = helper::list_notes(&mut app, &access_token).await;
    assert_eq!(StatusCode::OK, status_code);
    let notes = notes.unwrap();
    assert_eq!(1, notes.len());
    assert_eq!(note.id, notes[0].id);
}

#[tokio::test]
async fn test_create_requires_title() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;

    let (status_code, _, error) =
        helper::maybe_create_note(&mut app, &access_token, "", "some content", "").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Title can not be empty".to_string()), error);
}

#[tokio::test]
async fn test_update_is_merge_patch() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;

    let note = helper::create_note(
        &mut app,
        &access_token,
        "Shopping list",
        "Bread, cheese",
        "home",
    )
    .await;

    // only the content is patched
    let (status_code, updated_note, _) = helper::maybe_update_note(
        &mut app,
        &access_token,
        note.id,
        json!({ "content": "Bread, cheese, wine" }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    let updated_note = updated_note.unwrap();
    assert_eq!("Shopping list".to_string(), updated_note.title);
    assert_eq!("Bread, cheese, wine".to_string(), updated_note.content);
    assert_eq!("home".to_string(), updated_note.tag);
}

#[tokio::test]
async fn test_update_unknown_note() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;

    let (status_code, _, error) =
        helper::maybe_update_note(&mut app, &access_token, 42, json!({ "title": "Anything" }))
            .await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);
}

#[tokio::test]
async fn test_list_ordering() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;

    let one = helper::create_note(&mut app, &access_token, "one", "", "").await;
    let two = helper::create_note(&mut app, &access_token, "two", "", "").await;
    let three = helper::create_note(&mut app, &access_token, "three", "", "").await;

    let (status_code, _) = helper::maybe_toggle_pin(&mut app, &access_token, two.id, true).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // pinned first, then last-touched descending
    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    let ids = notes
        .unwrap()
        .iter()
        .map(|note| note.id)
        .collect::<Vec<i64>>();
    assert_eq!(vec![two.id, three.id, one.id], ids);

    // pinning did not re-stamp the last-touched timestamp
    let (status_code, _) = helper::maybe_toggle_pin(&mut app, &access_token, two.id, false).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    let ids = notes
        .unwrap()
        .iter()
        .map(|note| note.id)
        .collect::<Vec<i64>>();
    assert_eq!(vec![three.id, two.id, one.id], ids);
}

#[tokio::test]
async fn test_update_moves_note_to_the_front() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::register_and_login(&mut app, "frida", "frida@example.com").await;

    let one = helper::create_note(&mut app, &access_token, "one", "", "").await;
    let two = helper::create_note(&mut app, &access_token, "two", "", "").await;

    let (status_code, _, _) = helper::maybe_update_note(
        &mut app,
        &access_token,
        one.id,
        json!({ "content": "updated" }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);

    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    let ids = notes
        .unwrap()
        .iter()
        .map(|note| note.id)
        .collect::<Vec<i64>>();
    assert_eq!(vec![one.id, two.id], ids);
}
