//! Integration tests for the session lifecycle: single-active
//! invariant, bottle registration, enrollment, and cascade deletion.

use sqlx::PgPool;

use cuvee_core::roles::{ROLE_ARBITER, ROLE_PARTICIPANT};
use cuvee_core::session::{
    ENROLLMENT_WAITING, STATUS_ACTIVE, STATUS_COMPLETED, STATUS_SETUP, TYPE_STANDARD,
};
use cuvee_db::models::bottle::CreateBottle;
use cuvee_db::models::tasting::CreateTasting;
use cuvee_db::models::tasting_session::CreateSession;
use cuvee_db::models::user::CreateUser;
use cuvee_db::repositories::{
    BottleRepo, EnrollmentRepo, SessionRepo, TastingRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str, role: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$test-placeholder".to_string(),
        first_name: None,
        last_name: None,
        role: role.to_string(),
        needs_password_setup: false,
    }
}

fn new_session(name: &str, created_by: i64) -> CreateSession {
    CreateSession {
        name: name.to_string(),
        session_type: TYPE_STANDARD.to_string(),
        created_by,
    }
}

fn new_tasting(user_id: i64, identifier: Option<&str>, score: f64) -> CreateTasting {
    CreateTasting {
        user_id,
        bottle_identifier: identifier.map(str::to_string),
        wine_name: "Test wine".to_string(),
        wine_type: "Red".to_string(),
        vintage: 2020,
        region: "Loire".to_string(),
        appearance_score: 3,
        aroma_score: 3,
        taste_score: 3,
        finish_score: 3,
        final_score: score,
        notes: "notes".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Session status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_activation_demotes_other_active_session(pool: PgPool) {
    let arbiter = UserRepo::create(&pool, &new_user("arbiter", ROLE_ARBITER))
        .await
        .unwrap();

    let a = SessionRepo::create(&pool, &new_session("Session A", arbiter.id))
        .await
        .unwrap();
    let b = SessionRepo::create(&pool, &new_session("Session B", arbiter.id))
        .await
        .unwrap();
    assert_eq!(a.status, STATUS_SETUP, "sessions must start in setup");

    assert!(SessionRepo::activate(&pool, a.id).await.unwrap());
    assert!(SessionRepo::activate(&pool, b.id).await.unwrap());

    let a = SessionRepo::find_by_id(&pool, a.id).await.unwrap().unwrap();
    let b = SessionRepo::find_by_id(&pool, b.id).await.unwrap().unwrap();
    assert_eq!(a.status, STATUS_SETUP, "previously active session must be demoted");
    assert_eq!(b.status, STATUS_ACTIVE);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_activation_of_missing_session_reports_not_found(pool: PgPool) {
    assert!(!SessionRepo::activate(&pool, 9999).await.unwrap());
    assert!(!SessionRepo::set_status(&pool, 9999, STATUS_COMPLETED)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_plain_status_change_leaves_other_sessions_alone(pool: PgPool) {
    let arbiter = UserRepo::create(&pool, &new_user("arbiter", ROLE_ARBITER))
        .await
        .unwrap();
    let a = SessionRepo::create(&pool, &new_session("A", arbiter.id))
        .await
        .unwrap();
    let b = SessionRepo::create(&pool, &new_session("B", arbiter.id))
        .await
        .unwrap();

    SessionRepo::activate(&pool, a.id).await.unwrap();
    SessionRepo::set_status(&pool, b.id, STATUS_COMPLETED)
        .await
        .unwrap();

    let a = SessionRepo::find_by_id(&pool, a.id).await.unwrap().unwrap();
    assert_eq!(a.status, STATUS_ACTIVE, "completing B must not touch A");
}

// ---------------------------------------------------------------------------
// Bottles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_bottle_number_pre_check(pool: PgPool) {
    let arbiter = UserRepo::create(&pool, &new_user("arbiter", ROLE_ARBITER))
        .await
        .unwrap();
    let session = SessionRepo::create(&pool, &new_session("Friday Reds", arbiter.id))
        .await
        .unwrap();

    let bottle = BottleRepo::create(
        &pool,
        &CreateBottle {
            session_id: session.id,
            bottle_number: 1,
            custom_name: Some("Saumur".to_string()),
            wine_details: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(bottle.bottle_number, 1);

    assert!(BottleRepo::number_exists(&pool, session.id, 1).await.unwrap());
    assert!(!BottleRepo::number_exists(&pool, session.id, 2).await.unwrap());

    // Same number in a different session is fine.
    let other = SessionRepo::create(&pool, &new_session("Other", arbiter.id))
        .await
        .unwrap();
    assert!(!BottleRepo::number_exists(&pool, other.id, 1).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_remove_missing_bottle_reports_not_found(pool: PgPool) {
    assert!(!BottleRepo::delete(&pool, 424242).await.unwrap());
}

// ---------------------------------------------------------------------------
// Enrollment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_enrollment_is_unique_per_user_and_session(pool: PgPool) {
    let arbiter = UserRepo::create(&pool, &new_user("arbiter", ROLE_ARBITER))
        .await
        .unwrap();
    let taster = UserRepo::create(&pool, &new_user("alice", ROLE_PARTICIPANT))
        .await
        .unwrap();
    let session = SessionRepo::create(&pool, &new_session("Reds", arbiter.id))
        .await
        .unwrap();

    let enrollment = EnrollmentRepo::create(&pool, taster.id, session.id)
        .await
        .unwrap();
    assert_eq!(enrollment.status, ENROLLMENT_WAITING);
    assert_eq!(enrollment.current_bottle, 1);

    // The join handler checks find() first; the constraint backs it up.
    let existing = EnrollmentRepo::find(&pool, taster.id, session.id)
        .await
        .unwrap()
        .expect("enrollment should be found");
    assert_eq!(existing.id, enrollment.id);

    let duplicate = EnrollmentRepo::create(&pool, taster.id, session.id).await;
    assert!(duplicate.is_err(), "second enrollment row must be rejected");
}

// ---------------------------------------------------------------------------
// Cascade deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_session_cascades_but_keeps_tastings(pool: PgPool) {
    let arbiter = UserRepo::create(&pool, &new_user("arbiter", ROLE_ARBITER))
        .await
        .unwrap();
    let taster = UserRepo::create(&pool, &new_user("bob", ROLE_PARTICIPANT))
        .await
        .unwrap();
    let session = SessionRepo::create(&pool, &new_session("Doomed", arbiter.id))
        .await
        .unwrap();

    BottleRepo::create(
        &pool,
        &CreateBottle {
            session_id: session.id,
            bottle_number: 1,
            custom_name: None,
            wine_details: None,
        },
    )
    .await
    .unwrap();
    EnrollmentRepo::create(&pool, taster.id, session.id)
        .await
        .unwrap();
    TastingRepo::create(&pool, &new_tasting(taster.id, Some("Bottle 1"), 15.0))
        .await
        .unwrap();

    assert!(SessionRepo::delete_cascade(&pool, session.id).await.unwrap());

    assert!(SessionRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .is_none());
    assert!(BottleRepo::list_for_session(&pool, session.id)
        .await
        .unwrap()
        .is_empty());
    assert!(EnrollmentRepo::find(&pool, taster.id, session.id)
        .await
        .unwrap()
        .is_none());

    // Tastings reference the user, not the session; they must survive.
    assert_eq!(TastingRepo::count_for_user(&pool, taster.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_missing_session_reports_not_found(pool: PgPool) {
    assert!(!SessionRepo::delete_cascade(&pool, 777).await.unwrap());
}

// ---------------------------------------------------------------------------
// Tasting ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_tasting_enforces_ownership_in_query(pool: PgPool) {
    let alice = UserRepo::create(&pool, &new_user("alice", ROLE_PARTICIPANT))
        .await
        .unwrap();
    let mallory = UserRepo::create(&pool, &new_user("mallory", ROLE_PARTICIPANT))
        .await
        .unwrap();

    let tasting = TastingRepo::create(&pool, &new_tasting(alice.id, None, 12.0))
        .await
        .unwrap();

    // Another user's credentials never match, regardless of role.
    assert!(!TastingRepo::delete_owned(&pool, tasting.id, mallory.id)
        .await
        .unwrap());
    assert_eq!(TastingRepo::count_for_user(&pool, alice.id).await.unwrap(), 1);

    assert!(TastingRepo::delete_owned(&pool, tasting.id, alice.id)
        .await
        .unwrap());
    assert_eq!(TastingRepo::count_for_user(&pool, alice.id).await.unwrap(), 0);
}
