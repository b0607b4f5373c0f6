//! Demo binary: wires the pipeline against the in-memory store, registers a
//! sample extension filter, and runs a few mutations end to end.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use forum_pipeline::core::{PipelineResult, RequestContext};
use forum_pipeline::entities::{Category, Thread, User};
use forum_pipeline::hooks::{ActionFilter, ForumHooks, Next};
use forum_pipeline::logging;
use forum_pipeline::mutations::{login, move_threads, register_user};
use forum_pipeline::store::MemoryStore;
use forum_pipeline::validation::CleanedData;

/// Example extension: logs every thread move after the base action runs
struct AuditMoves;

#[async_trait]
impl ActionFilter<(Arc<RequestContext>, CleanedData), Vec<Thread>> for AuditMoves {
    async fn filter(
        &self,
        next: Next<'_, (Arc<RequestContext>, CleanedData), Vec<Thread>>,
        args: (Arc<RequestContext>, CleanedData),
    ) -> PipelineResult<Vec<Thread>> {
        let moved = next.call(args).await?;
        for thread in &moved {
            tracing::info!(thread = thread.id, category = thread.category_id, "audit: moved");
        }
        Ok(moved)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging()?;

    tracing::info!("=== Forum Pipeline Demo ===");

    // Seed the store
    let store = Arc::new(MemoryStore::new());
    store.seed_category(Category::new(1, "General"));
    store.seed_category(Category::new(2, "Feedback"));
    store.seed_thread(Thread::new(1, 1, "Welcome thread").with_starter(1));
    store.seed_thread(Thread::new(2, 1, "Second thread").with_starter(1));

    // Startup phase: register extensions, then freeze the registry
    let mut hooks = ForumHooks::new();
    hooks.move_threads.action.register(AuditMoves);
    let hooks = Arc::new(hooks);

    // Register an account and log in
    let ctx = Arc::new(RequestContext::new(store.clone()).with_hooks(hooks.clone()));
    let response = register_user(
        &ctx,
        &json!({"name": "JohnDoe", "email": "john@example.com", "password": "a strong passphrase"}),
    )
    .await?;
    println!("register_user -> {}", serde_json::to_string_pretty(&response)?);

    let response = login(
        &ctx,
        &json!({"username": "JohnDoe", "password": "a strong passphrase"}),
    )
    .await?;
    println!("login -> {}", serde_json::to_string_pretty(&response)?);

    // Move threads as a moderator; the audit filter reports each move
    let moderator = User::new(99, "Moderator", "mod@example.com", "").as_moderator();
    let ctx = Arc::new(
        RequestContext::new(store.clone())
            .with_hooks(hooks.clone())
            .with_user(moderator),
    );
    let response = move_threads(&ctx, &json!({"threads": [1, 2], "category": 2})).await?;
    println!("move_threads -> {}", serde_json::to_string_pretty(&response)?);

    // A failing request: unknown thread id, non-moderator caller
    let ctx = Arc::new(
        RequestContext::new(store)
            .with_hooks(hooks)
            .with_user(User::new(50, "Visitor", "v@example.com", "")),
    );
    let response = move_threads(&ctx, &json!({"threads": [1, 999], "category": 2})).await?;
    println!("move_threads (failing) -> {}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
