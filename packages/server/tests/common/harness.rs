//! Test harness with testcontainers for integration testing.
//!
//! Uses one shared Postgres container across all tests for speed: the
//! container starts and migrations run on the first test, later tests
//! reuse them. Every test gets its own pool, mocks and outbox worker, and
//! drives the worker with `drain_pending` so side-effect assertions are
//! deterministic.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use server_core::kernel::{MockMailer, MockPushService, OutboxWorker, ServerDeps};

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

/// Global shared infrastructure - initialized once, reused by all tests.
static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Respect RUST_LOG; try_init avoids panicking when already set up.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test context: own pool, own mocks, own outbox worker.
pub struct TestContext {
    pub pool: PgPool,
    pub deps: ServerDeps,
    pub worker: OutboxWorker,
    pub push: Arc<MockPushService>,
    pub mailer: Arc<MockMailer>,
}

impl TestContext {
    /// Rebuild deps and worker around failing transports to prove side
    /// effects never leak into primary results.
    pub fn with_failing_transports(pool: PgPool) -> Self {
        let push = Arc::new(MockPushService::new().failing());
        let mailer = Arc::new(MockMailer::new().failing());
        let (deps, worker) = ServerDeps::with_services(pool.clone(), push.clone(), mailer.clone());
        Self {
            pool,
            deps,
            worker,
            push,
            mailer,
        }
    }
}

impl AsyncTestContext for TestContext {
    async fn setup() -> Self {
        let infra = SharedTestInfra::get().await;
        let pool = PgPool::connect(&infra.db_url)
            .await
            .expect("failed to connect to test database");

        let push = Arc::new(MockPushService::new());
        let mailer = Arc::new(MockMailer::new());
        let (deps, worker) = ServerDeps::with_services(pool.clone(), push.clone(), mailer.clone());

        Self {
            pool,
            deps,
            worker,
            push,
            mailer,
        }
    }

    async fn teardown(self) {
        self.pool.close().await;
    }
}
