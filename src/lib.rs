//! Bookshelf application library
//!
//! Wires the books module into the kernel registry and owns the startup and
//! shutdown sequence shared by the `bookshelf` and `bookshelf-cli` binaries.

pub mod modules;

use anyhow::Context;
use axum::Router;
use bookshelf_db::Database;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// A bootstrapped application: database open, schema applied, modules started.
pub struct App {
    settings: Settings,
    db: Database,
    registry: ModuleRegistry,
}

impl App {
    /// Open the store, apply every module migration and start the modules.
    ///
    /// Any failure here is fatal; nothing has been served yet.
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let db = Database::connect(&settings.database.path, settings.database.max_connections)
            .await?;

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &db);

        if let Err(err) = apply_migrations(&registry, &db).await {
            db.close().await;
            return Err(err);
        }

        let ctx = InitCtx {
            settings: &settings,
        };
        registry.init_modules(&ctx).await?;
        registry.start_modules(&ctx).await?;

        tracing::info!(modules = registry.len(), "bookshelf bootstrap complete");

        Ok(Self {
            settings,
            db,
            registry,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn router(&self) -> Router {
        bookshelf_http::build_router(&self.registry)
    }

    /// Serve until `shutdown` resolves, then stop modules and close the store.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let served = bookshelf_http::start_server(self.router(), &self.settings, shutdown).await;
        let stopped = self.shutdown().await;
        served.and(stopped)
    }

    /// Stop modules in reverse order and close the shared pool.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let stopped = self.registry.stop_modules().await;
        self.db.close().await;
        stopped
    }
}

/// Execute every registered module's migration script against `db`.
pub async fn apply_migrations(registry: &ModuleRegistry, db: &Database) -> anyhow::Result<()> {
    for (module, migration) in registry.collect_migrations() {
        db.execute_script(migration.up)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        tracing::info!(module = %module, migration = migration.id, "migration applied");
    }
    Ok(())
}

/// Apply the schema and exit without serving.
pub async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    let db = Database::connect(&settings.database.path, settings.database.max_connections).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &db);

    let applied = apply_migrations(&registry, &db).await;
    db.close().await;
    applied
}

/// Full bootstrap, then serve until Ctrl-C or SIGTERM.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        database = %settings.database.path.display(),
        "bookshelf bootstrap starting"
    );

    let app = App::bootstrap(settings).await?;
    app.serve(bookshelf_http::shutdown_signal()).await
}
