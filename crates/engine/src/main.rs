//! BookForge Engine - prints the chapter navigation and planning board of a
//! book version from a library snapshot.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookforge_domain::{BookId, BookVersion, VersionId};
use bookforge_engine::infrastructure::{clock::SystemClock, memory::InMemoryBookRepo, ports::BookRepo};
use bookforge_engine::use_cases::PlanningQuery;
use bookforge_engine::{App, EngineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookforge_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = EngineConfig::from_env()?;
    tracing::info!(snapshot = %config.snapshot_path.display(), book_id = %config.book_id, "Starting BookForge Engine");

    let repo = InMemoryBookRepo::open(&config.snapshot_path, Arc::new(SystemClock))
        .await
        .with_context(|| format!("Failed to open {}", config.snapshot_path.display()))?;
    let book_repo: Arc<dyn BookRepo> = Arc::new(repo);

    let book = book_repo
        .get_book(&config.book_id)
        .await?
        .with_context(|| format!("Book {} not found in snapshot", config.book_id))?;
    let version = resolve_version(book_repo.as_ref(), &config.book_id, config.version_id.as_ref()).await?;
    tracing::info!(book = %book.title, version = %version.name, "Opened book version");

    let app = App::new(book_repo, None);

    let navigation = app
        .use_cases
        .navigation
        .chapters
        .execute(&book.id, &version.id, config.current_chapter.as_ref())
        .await?;
    let board = app
        .use_cases
        .planning
        .board
        .execute(&book.id, &version.id, &PlanningQuery::default())
        .await?;

    let output = serde_json::json!({
        "book": book,
        "version": version,
        "navigation": navigation,
        "board": board,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// The configured version, or the most recently created one.
async fn resolve_version(
    book_repo: &dyn BookRepo,
    book_id: &BookId,
    version_id: Option<&VersionId>,
) -> anyhow::Result<BookVersion> {
    let versions = book_repo.list_versions(book_id).await?;
    let version = match version_id {
        Some(id) => versions.into_iter().find(|version| &version.id == id),
        None => versions.into_iter().max_by_key(|version| version.created_at),
    };
    version.with_context(|| format!("No matching version for book {}", book_id))
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
