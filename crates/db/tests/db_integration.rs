//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test -p tasknote-db --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `tasknote`)
//!   `TEST_DB_PASSWORD` (default: `tasknote`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use tasknote_common::AppError;
use tasknote_db::entities::{
    Address, Contact, File, LoginHistory, Note, NoteHistory, NoteTag, Review, address, contact,
    file, login_history, note, note_history, note_tag, notification, notification_type, review,
    user,
};
use tasknote_db::repositories::{
    AddressRepository, ContactRepository, FileRepository, LoginHistoryRepository, NoteLinks,
    NoteRepository, NoteTagRepository, NotificationRepository, NotificationTypeRepository,
    ReviewRepository, UserRepository,
};
use tasknote_db::test_utils::TestDatabase;

fn user_model(id: &str) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(id.to_string()),
        username: Set(id.to_string()),
        email: Set(format!("{id}@example.com")),
        password: Set("hash".to_string()),
        date_of_birth: Set(None),
        is_active: Set(true),
        is_staff: Set(false),
        is_superuser: Set(false),
        last_login: Set(None),
        created_at: Set(Utc::now().into()),
    }
}

fn note_model(id: &str, user_id: &str, title: &str) -> note::ActiveModel {
    note::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        title: Set(title.to_string()),
        content: Set("body".to_string()),
        completed: Set(false),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
}

async fn count<E: EntityTrait>(conn: &DatabaseConnection) -> u64
where
    E::Model: Sync,
{
    E::find().count(conn).await.unwrap()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_note_title_unique_per_user() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.shared();
    let users = UserRepository::new(conn.clone());
    let notes = NoteRepository::new(conn.clone());

    users.create(user_model("u1")).await.unwrap();
    users.create(user_model("u2")).await.unwrap();

    let links = NoteLinks::default();
    notes.create(note_model("n1", "u1", "Plan"), &links).await.unwrap();
    notes.create(note_model("n2", "u2", "Plan"), &links).await.unwrap();
    let duplicate = notes.create(note_model("n3", "u1", "Plan"), &links).await;

    assert!(matches!(duplicate, Err(AppError::Integrity(_))));
    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_delete_user_cascades_and_nullifies() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.shared();
    let users = UserRepository::new(conn.clone());
    let notes = NoteRepository::new(conn.clone());

    users.create(user_model("owner")).await.unwrap();
    users.create(user_model("reviewer")).await.unwrap();
    notes
        .create(note_model("n1", "owner", "Plan"), &NoteLinks::default())
        .await
        .unwrap();

    AddressRepository::new(conn.clone())
        .create(address::ActiveModel {
            id: Set("a1".to_string()),
            user_id: Set("owner".to_string()),
            state: Set(address::State::Sp),
            street: Set("Rua A".to_string()),
            number: Set("1".to_string()),
            complement: Set(String::new()),
            neighborhood: Set("Centro".to_string()),
            city: Set("São Paulo".to_string()),
            postal_code: Set("01000-100".to_string()),
        })
        .await
        .unwrap();
    ContactRepository::new(conn.clone())
        .create(contact::ActiveModel {
            id: Set("c1".to_string()),
            user_id: Set("owner".to_string()),
            landline: Set(String::new()),
            mobile_phone: Set("11987654321".to_string()),
        })
        .await
        .unwrap();
    LoginHistoryRepository::new(conn.clone())
        .create(login_history::ActiveModel {
            id: Set("l1".to_string()),
            user_id: Set("owner".to_string()),
            ip_address: Set("127.0.0.1".to_string()),
            user_agent: Set("test".to_string()),
            timestamp: Set(Utc::now().into()),
        })
        .await
        .unwrap();
    ReviewRepository::new(conn.clone())
        .create(review::ActiveModel {
            id: Set("r1".to_string()),
            note_id: Set("n1".to_string()),
            reviewer_id: Set(Some("reviewer".to_string())),
            rating: Set(5),
            comment: Set(String::new()),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    // Reviewer goes away: the review stays, anonymised.
    users.delete("reviewer").await.unwrap();
    let review = Review::find_by_id("r1").one(db.connection()).await.unwrap().unwrap();
    assert!(review.reviewer_id.is_none());

    // Owner goes away: everything owned goes with them.
    users.delete("owner").await.unwrap();
    assert_eq!(count::<Note>(db.connection()).await, 0);
    assert_eq!(count::<Address>(db.connection()).await, 0);
    assert_eq!(count::<Contact>(db.connection()).await, 0);
    assert_eq!(count::<LoginHistory>(db.connection()).await, 0);
    assert_eq!(count::<Review>(db.connection()).await, 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_delete_note_cascades() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.shared();

    UserRepository::new(conn.clone())
        .create(user_model("u1"))
        .await
        .unwrap();
    let notes = NoteRepository::new(conn.clone());
    notes
        .create(note_model("n1", "u1", "Plan"), &NoteLinks::default())
        .await
        .unwrap();

    FileRepository::new(conn.clone())
        .create(file::ActiveModel {
            id: Set("f1".to_string()),
            note_id: Set("n1".to_string()),
            path: Set("notes/files/2025/03/01/f1_a.txt".to_string()),
            uploaded_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();
    NoteTagRepository::new(conn.clone())
        .create(note_tag::ActiveModel {
            id: Set("t1".to_string()),
            note_id: Set("n1".to_string()),
            tag: Set("work".to_string()),
        })
        .await
        .unwrap();
    notes
        .update(
            note::ActiveModel {
                id: sea_orm::ActiveValue::Unchanged("n1".to_string()),
                content: Set("new body".to_string()),
                ..Default::default()
            },
            Some(note_history::ActiveModel {
                id: Set("h1".to_string()),
                note_id: Set("n1".to_string()),
                edited_by_id: Set(Some("u1".to_string())),
                previous_content: Set("body".to_string()),
                edited_at: Set(Utc::now().into()),
            }),
            &NoteLinks::default(),
        )
        .await
        .unwrap();
    assert_eq!(count::<NoteHistory>(db.connection()).await, 1);

    notes.delete("n1").await.unwrap();
    assert_eq!(count::<File>(db.connection()).await, 0);
    assert_eq!(count::<NoteTag>(db.connection()).await, 0);
    assert_eq!(count::<NoteHistory>(db.connection()).await, 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_notification_type_in_use_is_protected() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.shared();

    UserRepository::new(conn.clone())
        .create(user_model("u1"))
        .await
        .unwrap();
    let types = NotificationTypeRepository::new(conn.clone());
    types
        .create(notification_type::ActiveModel {
            id: Set("t1".to_string()),
            name: Set("reminder".to_string()),
            description: Set(String::new()),
            template: Set("You have a reminder".to_string()),
        })
        .await
        .unwrap();
    NotificationRepository::new(conn.clone())
        .create(notification::ActiveModel {
            id: Set("no1".to_string()),
            type_id: Set("t1".to_string()),
            user_id: Set("u1".to_string()),
            note_id: Set(None),
            message: Set("You have a reminder".to_string()),
            sent_at: Set(Utc::now().into()),
            read: Set(false),
        })
        .await
        .unwrap();

    let result = types.delete("t1").await;
    assert!(matches!(result, Err(AppError::Protected(_))));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_check_constraints_reject_out_of_range() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.shared();

    UserRepository::new(conn.clone())
        .create(user_model("u1"))
        .await
        .unwrap();
    NoteRepository::new(conn.clone())
        .create(note_model("n1", "u1", "Plan"), &NoteLinks::default())
        .await
        .unwrap();

    let result = ReviewRepository::new(conn.clone())
        .create(review::ActiveModel {
            id: Set("r1".to_string()),
            note_id: Set("n1".to_string()),
            reviewer_id: Set(None),
            rating: Set(6),
            comment: Set(String::new()),
            created_at: Set(Utc::now().into()),
        })
        .await;
    assert!(matches!(result, Err(AppError::Integrity(_))));

    db.drop_database().await.unwrap();
}
