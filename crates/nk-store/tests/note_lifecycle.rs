//! End-to-end note lifecycle through the gateway on the local backend.

use std::time::Duration;

use nk_core::NoteFields;
use nk_store::{LocalStore, NoteGateway, NoteStore, StoreError};
use pretty_assertions::assert_eq;

async fn gateway() -> NoteGateway<LocalStore> {
    NoteGateway::new(LocalStore::open(":memory:").await.unwrap())
}

/// Stored timestamps have millisecond resolution.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

#[tokio::test]
async fn add_update_delete_scenario() {
    let gw = gateway().await;

    gw.add_note("u1", &NoteFields::new("Groceries", "milk, eggs"))
        .await
        .unwrap();
    let notes = gw.get_user_notes("u1").await;
    assert_eq!(notes.len(), 1);
    let note = &notes[0];
    assert!(!note.id.is_empty());
    assert_eq!(note.title, "Groceries");
    assert_eq!(note.content, "milk, eggs");
    assert_eq!(note.updated_at, None);

    tick().await;
    gw.update_note("u1", &note.id, &NoteFields::new("Groceries", "milk, eggs, bread"))
        .await
        .unwrap();
    let notes = gw.get_user_notes("u1").await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "milk, eggs, bread");
    let updated_at = notes[0].updated_at.expect("updated_at set on edit");
    assert!(updated_at > notes[0].created_at);
    assert_eq!(notes[0].created_at, note.created_at);

    gw.delete_note("u1", &note.id).await.unwrap();
    assert!(gw.get_user_notes("u1").await.is_empty());
}

#[tokio::test]
async fn notes_are_scoped_to_owner() {
    let gw = gateway().await;
    gw.add_note("u1", &NoteFields::new("mine", "a")).await.unwrap();
    gw.add_note("u2", &NoteFields::new("theirs", "b")).await.unwrap();
    gw.add_note("u1", &NoteFields::new("mine too", "c")).await.unwrap();

    let notes = gw.get_user_notes("u1").await;
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n.user_id == "u1"));
    assert!(gw.get_user_notes("nobody").await.is_empty());
}

#[tokio::test]
async fn notes_are_listed_newest_first() {
    let gw = gateway().await;
    for title in ["first", "second", "third"] {
        gw.add_note("u1", &NoteFields::new(title, "x")).await.unwrap();
        tick().await;
    }

    let notes = gw.get_user_notes("u1").await;
    let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    assert!(notes.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn empty_title_reads_back_untitled() {
    let gw = gateway().await;
    gw.add_note("u1", &NoteFields::new("", "body")).await.unwrap();
    assert_eq!(gw.get_user_notes("u1").await[0].title, "Untitled");
}

#[tokio::test]
async fn updating_a_deleted_note_is_not_found() {
    let gw = gateway().await;
    let note = gw.add_note("u1", &NoteFields::new("t", "c")).await.unwrap();
    gw.delete_note("u1", &note.id).await.unwrap();

    let err = gw
        .update_note("u1", &note.id, &NoteFields::new("t", "changed"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert!(gw.store().query_by_owner("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_row_does_not_hide_other_notes() {
    let gw = gateway().await;
    gw.add_note("u1", &NoteFields::new("Kept", "valid")).await.unwrap();
    tick().await;
    gw.add_note("u1", &NoteFields::new("Also kept", "valid too"))
        .await
        .unwrap();
    gw.store()
        .conn()
        .execute(
            "INSERT INTO notes (id, user_id, title, content, created_at) \
             VALUES ('legacy', 'u1', 'Old', 'x', 'Tue Jan 06 2026')",
            (),
        )
        .await
        .unwrap();

    let notes = gw.get_user_notes("u1").await;
    let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Also kept", "Kept"]);
}
