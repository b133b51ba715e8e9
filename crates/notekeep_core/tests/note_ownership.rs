use notekeep_core::db::open_db_in_memory;
use notekeep_core::response::{from_access_error, Response};
use notekeep_core::{
    AccessError, Denial, NoteDraft, NoteRepository, NoteService, NoteValidationError, Session,
    SqliteNoteRepository, SqliteUserRepository, User, UserRepository,
};
use rusqlite::Connection;

type Notes<'conn> = NoteService<SqliteUserRepository<'conn>, SqliteNoteRepository<'conn>>;

fn note_service(conn: &Connection) -> Notes<'_> {
    NoteService::new(
        SqliteUserRepository::try_new(conn).unwrap(),
        SqliteNoteRepository::try_new(conn).unwrap(),
    )
}

fn seed_users(conn: &Connection, usernames: &[&str]) {
    let users = SqliteUserRepository::try_new(conn).unwrap();
    for username in usernames {
        users
            .insert_user(&User::new(
                *username,
                "digest",
                format!("{username}@example.com"),
                "First",
                "Last",
            ))
            .unwrap();
    }
}

#[test]
fn add_update_fetch_roundtrip_keeps_owner() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice"]);
    let notes = note_service(&conn);
    let alice = Session::as_user("alice");

    let created = notes.add_note(&alice, "alice", "T", "C").unwrap();
    assert_eq!(created.owner, "alice");

    notes.update_note(&alice, created.id, "T2", "C2").unwrap();
    let fetched = notes.get_note(&alice, created.id).unwrap();
    assert_eq!(fetched.title, "T2");
    assert_eq!(fetched.content, "C2");
    assert_eq!(fetched.owner, "alice");
    assert_eq!(fetched.id, created.id);
}

#[test]
fn add_note_for_another_user_is_forbidden() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice", "bob"]);
    let notes = note_service(&conn);

    let err = notes
        .add_note(&Session::as_user("bob"), "alice", "T", "C")
        .unwrap_err();
    assert!(matches!(err, AccessError::Denied(Denial::Forbidden { .. })));
    assert!(notes
        .list_notes(&Session::as_user("alice"), "alice")
        .unwrap()
        .is_empty());
}

#[test]
fn add_note_anonymously_redirects_to_login() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice"]);
    let notes = note_service(&conn);

    let err = notes
        .add_note(&Session::anonymous(), "alice", "T", "C")
        .unwrap_err();
    match from_access_error(&err) {
        Response::Redirect { location, .. } => assert_eq!(location, "/login"),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn add_note_for_unregistered_owner_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let notes = note_service(&conn);

    let err = notes
        .add_note(&Session::as_user("ghost"), "ghost", "T", "C")
        .unwrap_err();
    assert!(matches!(err, AccessError::UserNotFound(name) if name == "ghost"));
}

#[test]
fn add_note_validates_title_after_authorization() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice", "bob"]);
    let notes = note_service(&conn);
    let long_title = "t".repeat(101);

    let denied = notes
        .add_note(&Session::as_user("bob"), "alice", long_title.as_str(), "C")
        .unwrap_err();
    assert!(matches!(denied, AccessError::Denied(_)));

    let invalid = notes
        .add_note(&Session::as_user("alice"), "alice", long_title.as_str(), "C")
        .unwrap_err();
    assert!(matches!(
        invalid,
        AccessError::InvalidNote(NoteValidationError::TitleTooLong { chars: 101 })
    ));
}

#[test]
fn title_with_nul_is_a_field_error_not_an_outage() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice"]);
    let notes = note_service(&conn);
    let alice = Session::as_user("alice");

    let err = notes.add_note(&alice, "alice", "\0title", "c").unwrap_err();
    assert!(matches!(
        err,
        AccessError::InvalidNote(NoteValidationError::InvalidTitle)
    ));
    assert!(matches!(
        from_access_error(&err),
        Response::FieldError { field: "title", .. }
    ));

    let created = notes.add_note(&alice, "alice", "T", "C").unwrap();
    let err = notes
        .update_note(&alice, created.id, "\0title", "c")
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::InvalidNote(NoteValidationError::InvalidTitle)
    ));
    assert_eq!(notes.get_note(&alice, created.id).unwrap().title, "T");
}

#[test]
fn schema_check_failure_on_note_is_invalid_title() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice"]);
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let repo_err = repo
        .insert_note("alice", &NoteDraft::new("\0title", "c"))
        .unwrap_err();
    assert!(matches!(
        AccessError::from(repo_err),
        AccessError::InvalidNote(NoteValidationError::InvalidTitle)
    ));
}

#[test]
fn forbidden_update_leaves_note_unchanged() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice", "bob"]);
    let notes = note_service(&conn);
    let alice = Session::as_user("alice");
    let created = notes.add_note(&alice, "alice", "T", "C").unwrap();

    let err = notes
        .update_note(&Session::as_user("bob"), created.id, "hijacked", "x")
        .unwrap_err();
    assert!(matches!(
        err.denial(),
        Some(Denial::Forbidden { caller }) if caller == "bob"
    ));
    assert_eq!(notes.get_note(&alice, created.id).unwrap(), created);
}

#[test]
fn update_of_missing_note_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice"]);
    let notes = note_service(&conn);

    let err = notes
        .update_note(&Session::as_user("alice"), 999, "T", "C")
        .unwrap_err();
    assert!(matches!(err, AccessError::NoteNotFound(999)));
    assert_eq!(from_access_error(&err), Response::NotFound);
}

#[test]
fn delete_by_third_user_is_forbidden_then_owner_delete_succeeds() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice", "bob", "carol"]);
    let notes = note_service(&conn);
    let alice = Session::as_user("alice");
    let created = notes.add_note(&alice, "alice", "T", "C").unwrap();

    let err = notes
        .delete_note(&Session::as_user("carol"), created.id)
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::Denied(Denial::Forbidden { ref caller }) if caller == "carol"
    ));
    assert_eq!(notes.get_note(&alice, created.id).unwrap(), created);

    notes.delete_note(&alice, created.id).unwrap();
    let fetch = notes.get_note(&alice, created.id).unwrap_err();
    assert!(matches!(fetch, AccessError::NoteNotFound(id) if id == created.id));

    let again = notes.delete_note(&alice, created.id).unwrap_err();
    assert!(matches!(again, AccessError::NoteNotFound(_)));
}

#[test]
fn reading_anothers_note_is_forbidden() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice", "bob"]);
    let notes = note_service(&conn);
    let created = notes
        .add_note(&Session::as_user("alice"), "alice", "private", "secret")
        .unwrap();

    let err = notes
        .get_note(&Session::as_user("bob"), created.id)
        .unwrap_err();
    assert!(matches!(err, AccessError::Denied(_)));
    let listing = notes
        .list_notes(&Session::as_user("bob"), "alice")
        .unwrap_err();
    assert!(matches!(listing, AccessError::Denied(_)));
}

#[test]
fn list_returns_owned_notes_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice", "bob"]);
    let notes = note_service(&conn);
    let alice = Session::as_user("alice");
    let bob = Session::as_user("bob");

    notes.add_note(&alice, "alice", "first", "").unwrap();
    notes.add_note(&bob, "bob", "bob's", "").unwrap();
    notes.add_note(&alice, "alice", "second", "").unwrap();

    let titles: Vec<String> = notes
        .list_notes(&alice, "alice")
        .unwrap()
        .into_iter()
        .map(|note| note.title)
        .collect();
    assert_eq!(titles, vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn store_failure_surfaces_as_store_error_without_touching_session() {
    let conn = open_db_in_memory().unwrap();
    seed_users(&conn, &["alice"]);
    let notes = note_service(&conn);
    let alice = Session::as_user("alice");

    conn.execute_batch("DROP TABLE notes;").unwrap();
    let err = notes.add_note(&alice, "alice", "T", "C").unwrap_err();
    assert!(matches!(err, AccessError::Store(_)));
    assert!(matches!(from_access_error(&err), Response::Unavailable { .. }));
    assert_eq!(alice, Session::as_user("alice"));
}
