// AccountDirectory against the SeaORM store on SQLite

mod common;

use std::sync::Arc;

use account_service::domain::{
    AccountRole, DomainError, RegisterAccountDto, TxMode, UpdateProfileDto, UserAccount,
    UserStore, UserStoreTx,
};
use account_service::SeaOrmUserStore;

fn registration(username: &str, password: &str) -> RegisterAccountDto {
    RegisterAccountDto {
        username: username.to_string(),
        password: password.to_string(),
        nickname: Some(format!("{username} nick")),
        email: Some(format!("{username}@x.com")),
    }
}

#[tokio::test]
async fn carol_registers_once() {
    let db = common::setup_test_db().await;
    let directory = common::test_directory(&db);

    assert!(!directory.exists_by_username("carol").await.unwrap());

    let id = directory
        .register(RegisterAccountDto {
            username: "carol".into(),
            password: "pw1".into(),
            nickname: Some("Carol".into()),
            email: Some("c@x.com".into()),
        })
        .await
        .unwrap();
    assert_eq!(id, 1);
    assert!(directory.exists_by_username("carol").await.unwrap());

    let creds = directory.load_credentials_for_login("carol").await.unwrap();
    assert_eq!(creds.username, "carol");
    assert_eq!(creds.role, AccountRole::User);
    assert!(!creds.locked);
    assert!(directory
        .hasher()
        .verify("pw1", &creds.hashed_password)
        .unwrap());

    let err = directory
        .register(registration("carol", "pw2"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateAccount(ref u) if u == "carol"));
    assert_eq!(common::count_rows(&db, "carol").await, 1);
}

#[tokio::test]
async fn new_rows_are_unlocked_local_users() {
    let db = common::setup_test_db().await;
    let directory = common::test_directory(&db);
    directory.register(registration("dave", "secret")).await.unwrap();

    let row = common::find_row(&db, "dave").await.unwrap();
    assert!(!row.is_locked);
    assert!(!row.is_social);
    assert_ne!(row.password, "secret");
    assert_eq!(row.nickname.as_deref(), Some("dave nick"));
    assert_eq!(row.email.as_deref(), Some("dave@x.com"));
}

#[tokio::test]
async fn ids_increase_per_registration() {
    let db = common::setup_test_db().await;
    let directory = common::test_directory(&db);

    let first = directory.register(registration("amy", "pw")).await.unwrap();
    let second = directory.register(registration("ben", "pw")).await.unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn locked_and_social_rows_exist_but_cannot_log_in() {
    let db = common::setup_test_db().await;
    let directory = common::test_directory(&db);
    directory.register(registration("frank", "pw")).await.unwrap();
    directory.register(registration("grace", "pw")).await.unwrap();

    common::set_flags(&db, "frank", true, false).await;
    common::set_flags(&db, "grace", false, true).await;

    for username in ["frank", "grace"] {
        assert!(directory.exists_by_username(username).await.unwrap());
        let err = directory
            .load_credentials_for_login(username)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AccountNotFound(_)));
    }
}

#[tokio::test]
async fn own_update_changes_only_profile_fields() {
    let db = common::setup_test_db().await;
    let directory = common::test_directory(&db);
    let id = directory.register(registration("alice", "pw")).await.unwrap();
    let before = common::find_row(&db, "alice").await.unwrap();

    let updated = directory
        .update_profile(
            "alice",
            UpdateProfileDto {
                username: "alice".into(),
                nickname: Some("X".into()),
                email: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated, id);

    let after = common::find_row(&db, "alice").await.unwrap();
    assert_eq!(after.id, id);
    assert_eq!(after.nickname.as_deref(), Some("X"));
    assert_eq!(after.email, before.email);
    assert_eq!(after.password, before.password);
    assert_eq!(after.created_at, before.created_at);
    assert!(directory.load_credentials_for_login("alice").await.is_ok());
}

#[tokio::test]
async fn update_for_someone_else_is_denied_without_writing() {
    let db = common::setup_test_db().await;
    let directory = common::test_directory(&db);
    directory.register(registration("alice", "pw")).await.unwrap();
    directory.register(registration("bob", "pw")).await.unwrap();

    let err = directory
        .update_profile(
            "alice",
            UpdateProfileDto {
                username: "bob".into(),
                nickname: Some("pwned".into()),
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AccessDenied { .. }));

    let bob = common::find_row(&db, "bob").await.unwrap();
    assert_eq!(bob.nickname.as_deref(), Some("bob nick"));
}

#[tokio::test]
async fn update_of_locked_account_is_not_found() {
    let db = common::setup_test_db().await;
    let directory = common::test_directory(&db);
    directory.register(registration("heidi", "pw")).await.unwrap();
    common::set_flags(&db, "heidi", true, false).await;

    let err = directory
        .update_profile(
            "heidi",
            UpdateProfileDto {
                username: "heidi".into(),
                nickname: Some("H".into()),
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AccountNotFound(_)));
}

#[tokio::test]
async fn unique_index_violation_surfaces_as_duplicate() {
    let db = common::setup_test_db().await;
    let directory = common::test_directory(&db);
    directory.register(registration("ivan", "pw")).await.unwrap();

    // Straight to the store, skipping the directory's existence check.
    let store = Arc::new(SeaOrmUserStore::new(db.clone()));
    let tx = store.begin(TxMode::ReadWrite).await.unwrap();
    let err = tx
        .save(UserAccount::new_local(
            "ivan".into(),
            "hash".into(),
            None,
            None,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::DuplicateAccount(ref u) if u == "ivan"));
    drop(tx);
    assert_eq!(common::count_rows(&db, "ivan").await, 1);
}

#[tokio::test]
async fn uncommitted_transaction_is_rolled_back() {
    let db = common::setup_test_db().await;
    let store = SeaOrmUserStore::new(db.clone());

    {
        let tx = store.begin(TxMode::ReadWrite).await.unwrap();
        let saved = tx
            .save(UserAccount::new_local(
                "judy".into(),
                "hash".into(),
                None,
                None,
            ))
            .await
            .unwrap();
        assert!(saved.id.is_some());
    }

    let directory = common::test_directory(&db);
    assert!(!directory.exists_by_username("judy").await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_of_one_username_yield_one_account() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::setup_file_db(dir.path(), 10).await;
    let directory = common::test_directory(&db);

    for round in 0..5 {
        let username = format!("racer{round}");
        let attempts: Vec<_> = (0..4)
            .map(|i| {
                let directory = directory.clone();
                let dto = registration(&username, &format!("pw{i}"));
                tokio::spawn(async move { directory.register(dto).await })
            })
            .collect();

        let mut created = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => created += 1,
                Err(DomainError::DuplicateAccount(u)) => assert_eq!(u, username),
                Err(other) => panic!("unexpected error for {username}: {other}"),
            }
        }
        assert_eq!(created, 1, "{username}");
        assert_eq!(common::count_rows(&db, &username).await, 1);
    }
}

#[tokio::test]
async fn profile_update_leaves_credentials_and_flags_alone() {
    let db = common::setup_test_db().await;
    let directory = common::test_directory(&db);
    let id = directory.register(registration("kate", "pw")).await.unwrap();
    let before = common::find_row(&db, "kate").await.unwrap();

    let store = SeaOrmUserStore::new(db.clone());
    let tx = store.begin(TxMode::ReadOnly).await.unwrap();
    let mut stale = tx
        .find_by_username_locked_social("kate", false, false)
        .await
        .unwrap()
        .unwrap();
    drop(tx);

    // Locked after the read, before the profile write lands
    common::set_flags(&db, "kate", true, false).await;
    stale.nickname = Some("K".into());
    stale.password_hash = "replaced".into();
    stale.role = AccountRole::Admin;

    let tx = store.begin(TxMode::ReadWrite).await.unwrap();
    tx.save(stale).await.unwrap();
    tx.commit().await.unwrap();

    let after = common::find_row(&db, "kate").await.unwrap();
    assert_eq!(after.id, id);
    assert_eq!(after.nickname.as_deref(), Some("K"));
    assert_eq!(after.password, before.password);
    assert_eq!(after.role_type, before.role_type);
    assert!(after.is_locked);
}
