//! Integration tests for document rows (source exclusivity) and the
//! client dashboard feed.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use atelier_core::roles::ROLE_CLIENT;
use atelier_db::models::project::CreateProject;
use atelier_db::models::task::CreateTask;
use atelier_db::repositories::{
    DashboardRepo, DocumentRepo, PhaseRepo, ProfileRepo, ProjectRepo, TaskRepo, TodoRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_client_project(pool: &PgPool) -> (i64, i64) {
    let client = ProfileRepo::create_identity(pool, "feed@acme.test", ROLE_CLIENT, None, None)
        .await
        .unwrap();
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Feed".to_string(),
            client_id: Some(client.id),
            price_cents: None,
            deposit_percent: None,
            brief_content: None,
        },
    )
    .await
    .unwrap();
    (client.id, project.id)
}

// ---------------------------------------------------------------------------
// Test: the CHECK constraint enforces exactly one document source
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_document_source_exclusivity(pool: PgPool) {
    let (_, project_id) = seed_client_project(&pool).await;

    let link = DocumentRepo::create(
        &pool,
        project_id,
        "Brief doc",
        None,
        Some("https://docs.google.com/document/d/abc/preview"),
        Some("link"),
        None,
    )
    .await
    .unwrap();
    assert_eq!(link.file_type.as_deref(), Some("link"));

    // Both sources set: rejected by the table constraint.
    let both = DocumentRepo::create(
        &pool,
        project_id,
        "Broken",
        Some("projects/1/broken.pdf"),
        Some("https://example.test"),
        None,
        None,
    )
    .await;
    assert!(both.is_err());

    // Neither source set: also rejected.
    let neither = DocumentRepo::create(&pool, project_id, "Empty", None, None, None, None).await;
    assert!(neither.is_err());
}

// ---------------------------------------------------------------------------
// Test: the feed unions documents, tasks, and todos since a cutoff
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_whats_new_feed(pool: PgPool) {
    let (client_id, project_id) = seed_client_project(&pool).await;
    let phases = PhaseRepo::list_for_project(&pool, project_id).await.unwrap();

    DocumentRepo::create(
        &pool,
        project_id,
        "Moodboard",
        Some("projects/1/moodboard.pdf"),
        None,
        Some("application/pdf"),
        Some(1024),
    )
    .await
    .unwrap();
    TaskRepo::create(
        &pool,
        project_id,
        &CreateTask { phase_id: phases[0].id, title: "Review moodboard".to_string() },
    )
    .await
    .unwrap();
    TodoRepo::create(&pool, project_id, "Send photos").await.unwrap();

    let since = Utc::now() - Duration::days(14);
    let items = DashboardRepo::whats_new(&pool, client_id, since).await.unwrap();
    assert_eq!(items.len(), 3);
    let kinds: Vec<&str> = items.iter().map(|i| i.kind.as_str()).collect();
    assert!(kinds.contains(&"document"));
    assert!(kinds.contains(&"task"));
    assert!(kinds.contains(&"todo"));
    assert!(items.iter().all(|i| i.project_id == project_id));

    // A cutoff in the future yields nothing.
    let future = Utc::now() + Duration::hours(1);
    let empty = DashboardRepo::whats_new(&pool, client_id, future).await.unwrap();
    assert!(empty.is_empty());

    // Another client sees none of it.
    let other = ProfileRepo::create_identity(&pool, "other@x.test", ROLE_CLIENT, None, None)
        .await
        .unwrap();
    let none = DashboardRepo::whats_new(&pool, other.id, since).await.unwrap();
    assert!(none.is_empty());
}
