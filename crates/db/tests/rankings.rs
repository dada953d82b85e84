//! Integration tests for the aggregation engine: statistics buckets,
//! ranking order, and the unrankable-identifier exclusions.

use sqlx::PgPool;

use cuvee_core::roles::{ROLE_ARBITER, ROLE_PARTICIPANT};
use cuvee_db::models::tasting::CreateTasting;
use cuvee_db::models::user::CreateUser;
use cuvee_db::repositories::{StatsRepo, TastingRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str, role: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$test-placeholder".to_string(),
        first_name: Some(username.to_string()),
        last_name: None,
        role: role.to_string(),
        needs_password_setup: false,
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

async fn seed_participant(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(pool, &new_user(username, ROLE_PARTICIPANT))
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// User statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_user_statistics_distribution_buckets(pool: PgPool) {
    let user = seed_participant(&pool, "alice").await;

    // One tasting per bucket; 17.5 lands in "excellent" (>= 16).
    for score in [17.5, 14.0, 12.0, 5.0] {
        TastingRepo::create(&pool, &new_tasting(user, None, score))
            .await
            .unwrap();
    }

    let stats = StatsRepo::user_statistics(&pool, user).await.unwrap();
    assert_eq!(stats.total_tastings, 4);
    assert_eq!(stats.excellent_count, 1);
    assert_eq!(stats.good_count, 1);
    assert_eq!(stats.average_count, 1);
    assert_eq!(stats.poor_count, 1);
    assert_eq!(stats.best_score, Some(17.5));
    assert_eq!(stats.worst_score, Some(5.0));
    // All rows were inserted today.
    assert_eq!(stats.active_days, 1);
    assert!(stats.last_tasting_date.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_statistics_over_zero_rows_reports_null_scores(pool: PgPool) {
    let user = seed_participant(&pool, "empty").await;

    let stats = StatsRepo::user_statistics(&pool, user).await.unwrap();
    assert_eq!(stats.total_tastings, 0);
    assert_eq!(stats.average_score, None);
    assert_eq!(stats.best_score, None);
    assert_eq!(stats.worst_score, None);
    assert_eq!(stats.active_days, 0);
    assert_eq!(stats.last_tasting_date, None);
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_rankings_exclude_unrankable_identifiers(pool: PgPool) {
    let user = seed_participant(&pool, "alice").await;

    TastingRepo::create(&pool, &new_tasting(user, Some("Saumur"), 15.0))
        .await
        .unwrap();
    TastingRepo::create(&pool, &new_tasting(user, None, 16.0))
        .await
        .unwrap();
    TastingRepo::create(&pool, &new_tasting(user, Some(""), 17.0))
        .await
        .unwrap();
    TastingRepo::create(&pool, &new_tasting(user, Some("null"), 18.0))
        .await
        .unwrap();

    let rows = StatsRepo::bottle_rankings(&pool, user, 20, 0).await.unwrap();
    assert_eq!(rows.len(), 1, "only the real identifier forms a group");
    assert_eq!(rows[0].bottle_identifier, "Saumur");
    assert_eq!(StatsRepo::count_bottle_groups(&pool, user).await.unwrap(), 1);

    let global = StatsRepo::global_bottle_rankings(&pool, 20, 0).await.unwrap();
    assert_eq!(global.len(), 1, "global ranking applies the same filter");
    assert_eq!(global[0].bottle_identifier, "Saumur");
    assert_eq!(
        StatsRepo::count_global_bottle_groups(&pool).await.unwrap(),
        1
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ranking_orders_by_mean_then_count(pool: PgPool) {
    let user = seed_participant(&pool, "alice").await;

    // "Chinon": mean 15.0 over two tastings.
    TastingRepo::create(&pool, &new_tasting(user, Some("Chinon"), 14.0))
        .await
        .unwrap();
    TastingRepo::create(&pool, &new_tasting(user, Some("Chinon"), 16.0))
        .await
        .unwrap();
    // "Cahors": mean 15.0 over three tastings -- wins the tie on count.
    for score in [14.0, 15.0, 16.0] {
        TastingRepo::create(&pool, &new_tasting(user, Some("Cahors"), score))
            .await
            .unwrap();
    }
    // "Margaux": mean 18.0 -- first overall.
    TastingRepo::create(&pool, &new_tasting(user, Some("Margaux"), 18.0))
        .await
        .unwrap();

    let rows = StatsRepo::bottle_rankings(&pool, user, 20, 0).await.unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.bottle_identifier.as_str()).collect();
    assert_eq!(order, ["Margaux", "Cahors", "Chinon"]);
    assert_eq!(rows[1].tasting_count, 3);
    assert_eq!(rows[2].tasting_count, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rankings_are_scoped_to_the_requesting_user(pool: PgPool) {
    let alice = seed_participant(&pool, "alice").await;
    let bob = seed_participant(&pool, "bob").await;

    TastingRepo::create(&pool, &new_tasting(alice, Some("Margaux"), 18.0))
        .await
        .unwrap();
    TastingRepo::create(&pool, &new_tasting(bob, Some("Margaux"), 10.0))
        .await
        .unwrap();

    let rows = StatsRepo::bottle_rankings(&pool, alice, 20, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tasting_count, 1);
    assert_eq!(rows[0].average_score, 18.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_global_ranking_counts_distinct_tasters(pool: PgPool) {
    let alice = seed_participant(&pool, "alice").await;
    let bob = seed_participant(&pool, "bob").await;

    TastingRepo::create(&pool, &new_tasting(alice, Some("Margaux"), 18.0))
        .await
        .unwrap();
    TastingRepo::create(&pool, &new_tasting(alice, Some("Margaux"), 16.0))
        .await
        .unwrap();
    TastingRepo::create(&pool, &new_tasting(bob, Some("Margaux"), 14.0))
        .await
        .unwrap();

    let rows = StatsRepo::global_bottle_rankings(&pool, 20, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tasting_count, 3);
    assert_eq!(rows[0].user_count, 2);
}

// ---------------------------------------------------------------------------
// Global statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_detailed_global_and_leaderboard(pool: PgPool) {
    let arbiter = UserRepo::create(&pool, &new_user("arbiter", ROLE_ARBITER))
        .await
        .unwrap();
    let alice = seed_participant(&pool, "alice").await;
    let bob = seed_participant(&pool, "bob").await;
    let _idle = seed_participant(&pool, "idle").await;

    TastingRepo::create(&pool, &new_tasting(alice, None, 18.0))
        .await
        .unwrap();
    TastingRepo::create(&pool, &new_tasting(bob, None, 12.0))
        .await
        .unwrap();
    TastingRepo::create(&pool, &new_tasting(arbiter.id, None, 20.0))
        .await
        .unwrap();

    let global = StatsRepo::detailed_global(&pool).await.unwrap();
    assert_eq!(global.total_tastings, 3);
    assert_eq!(global.total_tasters, 3);
    assert_eq!(global.min_score, Some(12.0));
    assert_eq!(global.max_score, Some(20.0));

    let top = StatsRepo::top_tasters(&pool, ROLE_PARTICIPANT).await.unwrap();
    let names: Vec<&str> = top.iter().map(|r| r.username.as_str()).collect();
    // Participants with tastings only, best mean first; the arbiter's
    // 20.0 and the idle participant never appear.
    assert_eq!(names, ["alice", "bob"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_global_statistics_over_empty_database(pool: PgPool) {
    let stats = StatsRepo::global_statistics(&pool).await.unwrap();
    assert_eq!(stats.total_users, 0);
    assert_eq!(stats.total_tastings, 0);
    assert_eq!(stats.average_score, None);
    assert_eq!(stats.highest_score, None);
}
