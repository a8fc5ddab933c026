use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// What a module sees while the application boots.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// Schema script contributed by a module.
///
/// There is no bookkeeping table: `up` runs on every start, so it must be
/// idempotent (`CREATE TABLE IF NOT EXISTS`, `CREATE INDEX IF NOT EXISTS`).
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A feature slice of the service: its tables, its routes and its part of
/// the API document.
///
/// Boot order is migrations, `init`, `start` for every module in
/// registration order; `stop` runs in reverse once the server has drained.
#[async_trait]
pub trait Module: Sync + Send {
    /// Key used for lookup, logs and migration ordering.
    fn name(&self) -> &'static str;

    /// Runs after every migration has been applied. An error aborts boot.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Handlers mounted at absolute paths; merged, not nested.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// `paths` and `components` to merge into `/docs/openapi.json`.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Sorted by module name then id before execution.
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Release anything `start` acquired. The shared pool is closed
    /// afterwards by the application, not here.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
