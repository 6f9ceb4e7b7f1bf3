//! Integration tests for session rows, status transitions, and result
//! persistence.
//!
//! Verifies against a real database that:
//! - Sessions start in `pending` and advance through compare-and-set updates
//! - Backward and stale transitions are rejected without touching the row
//! - `failed` retains its cause and is distinct from `no_matches`
//! - Results read back ordered by score and cascade-delete with the session
//! - Session reads are owner-scoped

use cura_core::attributes::VisualAttributes;
use cura_core::search_status::{
    STATUS_ANALYZING, STATUS_COMPLETED, STATUS_NO_MATCHES, STATUS_PENDING, STATUS_SEARCHING,
};
use cura_db::models::search_result::NewSearchResult;
use cura_db::models::visual_search::CreateVisualSearch;
use cura_db::repositories::{SearchResultRepo, VisualSearchRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn submission(user_id: &str) -> CreateVisualSearch {
    CreateVisualSearch {
        user_id: user_id.to_string(),
        image_url: "https://images.example/query.jpg".to_string(),
        source_image_id: None,
        crop: None,
        budget: None,
    }
}

fn result_row(title: &str, score: f64) -> NewSearchResult {
    NewSearchResult {
        platform: "depop".to_string(),
        item_url: format!("https://depop.example/{title}"),
        title: title.to_string(),
        price: 42.0,
        currency: "USD".to_string(),
        image_url: None,
        description: None,
        similarity_score: score,
        match_explanation: Some("Matched on item type".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn session_starts_pending(pool: PgPool) {
    let session = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();
    assert_eq!(session.status, STATUS_PENDING);
    assert!(session.analysis_data.is_none());
    assert!(session.error_message.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn happy_path_advances_to_completed(pool: PgPool) {
    let session = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();

    for (from, to) in [
        (STATUS_PENDING, STATUS_ANALYZING),
        (STATUS_ANALYZING, STATUS_SEARCHING),
        (STATUS_SEARCHING, STATUS_COMPLETED),
    ] {
        assert!(
            VisualSearchRepo::transition(&pool, session.id, from, to)
                .await
                .unwrap(),
            "{from} -> {to} should succeed"
        );
    }

    let reloaded = VisualSearchRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, STATUS_COMPLETED);
}

#[sqlx::test(migrations = "./migrations")]
async fn backward_transition_rejected(pool: PgPool) {
    let session = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();
    VisualSearchRepo::transition(&pool, session.id, STATUS_PENDING, STATUS_ANALYZING)
        .await
        .unwrap();

    let moved = VisualSearchRepo::transition(&pool, session.id, STATUS_ANALYZING, STATUS_PENDING)
        .await
        .unwrap();
    assert!(!moved);

    let reloaded = VisualSearchRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, STATUS_ANALYZING);
}

#[sqlx::test(migrations = "./migrations")]
async fn stale_compare_and_set_rejected(pool: PgPool) {
    let session = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();
    VisualSearchRepo::transition(&pool, session.id, STATUS_PENDING, STATUS_ANALYZING)
        .await
        .unwrap();

    // A writer that still believes the session is pending loses the race.
    let moved = VisualSearchRepo::transition(&pool, session.id, STATUS_PENDING, STATUS_ANALYZING)
        .await
        .unwrap();
    assert!(!moved);
}

#[sqlx::test(migrations = "./migrations")]
async fn failure_retains_cause_and_is_not_no_matches(pool: PgPool) {
    let session = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();
    VisualSearchRepo::transition(&pool, session.id, STATUS_PENDING, STATUS_ANALYZING)
        .await
        .unwrap();

    assert!(
        VisualSearchRepo::mark_failed(&pool, session.id, STATUS_ANALYZING, "vision model timeout")
            .await
            .unwrap()
    );

    let reloaded = VisualSearchRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, "failed");
    assert_ne!(reloaded.status, STATUS_NO_MATCHES);
    assert_eq!(reloaded.error_message.as_deref(), Some("vision model timeout"));
}

#[sqlx::test(migrations = "./migrations")]
async fn analysis_data_round_trips(pool: PgPool) {
    let session = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();
    let attrs = VisualAttributes {
        item_type: Some("pants".to_string()),
        primary_colors: vec!["khaki".to_string()],
        ..Default::default()
    };
    VisualSearchRepo::set_analysis(&pool, session.id, &attrs)
        .await
        .unwrap();

    let reloaded = VisualSearchRepo::find_by_id(&pool, session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.analysis_data.unwrap().0, attrs);
}

// ---------------------------------------------------------------------------
// Ownership scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn sessions_are_owner_scoped(pool: PgPool) {
    let session = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();

    let mine = VisualSearchRepo::find_for_user(&pool, session.id, "user-1")
        .await
        .unwrap();
    assert!(mine.is_some());

    let theirs = VisualSearchRepo::find_for_user(&pool, session.id, "user-2")
        .await
        .unwrap();
    assert!(theirs.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn listing_is_per_user_newest_first(pool: PgPool) {
    let first = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();
    let second = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();
    VisualSearchRepo::create(&pool, &submission("user-2"))
        .await
        .unwrap();

    let sessions = VisualSearchRepo::list_by_user(&pool, "user-1")
        .await
        .unwrap();
    let ids: Vec<_> = sessions.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn results_read_back_ordered_by_score(pool: PgPool) {
    let session = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();

    SearchResultRepo::insert_batch(
        &pool,
        session.id,
        &[
            result_row("good", 0.78),
            result_row("best", 0.94),
            result_row("fine", 0.81),
        ],
    )
    .await
    .unwrap();

    let results = SearchResultRepo::list_by_search(&pool, session.id)
        .await
        .unwrap();
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["best", "fine", "good"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn results_cascade_delete_with_session(pool: PgPool) {
    let session = VisualSearchRepo::create(&pool, &submission("user-1"))
        .await
        .unwrap();
    SearchResultRepo::insert_batch(&pool, session.id, &[result_row("only", 0.9)])
        .await
        .unwrap();

    sqlx::query("DELETE FROM visual_searches WHERE id = $1")
        .bind(session.id)
        .execute(&pool)
        .await
        .unwrap();

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM search_results")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}
