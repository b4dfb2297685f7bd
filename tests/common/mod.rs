#![allow(dead_code)]

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use todo_api::app::{app, AppState};
use todo_api::auth::{PasswordHasher, TokenService};
use todo_api::config::AppConfig;
use todo_api::database::{DatabaseManager, Repository};
use todo_api::services::Service;

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// `DATABASE_URL` from the environment or `.env`; `None` means the
/// Postgres-backed tests skip.
pub fn database_url() -> Option<String> {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())
}

/// Migrated pool for direct repository tests
pub async fn pool() -> Result<Option<PgPool>> {
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&url)
        .await
        .context("failed to connect to DATABASE_URL")?;
    DatabaseManager::migrate(&pool).await?;
    Ok(Some(pool))
}

/// Username no other test run will collide with
pub fn unique_username(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    /// Serve the application on a detached thread with its own runtime; it
    /// exits together with the test process.
    fn spawn(database_url: String) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Bound before the thread starts
        let listener = std::net::TcpListener::bind(("127.0.0.1", port))
            .with_context(|| format!("failed to bind port {}", port))?;
        listener.set_nonblocking(true)?;

        std::thread::Builder::new()
            .name("todo-api-test-server".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(2)
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => return eprintln!("test server runtime failed: {}", e),
                };
                if let Err(e) = runtime.block_on(serve(listener, &database_url)) {
                    eprintln!("test server stopped: {:#}", e);
                }
            })
            .context("failed to start test server thread")?;

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Start the server once per test process; `None` without a database
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL not set, skipping server test");
        return Ok(None);
    };

    let server =
        SERVER.get_or_init(|| TestServer::spawn(url).expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

async fn serve(listener: std::net::TcpListener, database_url: &str) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to DATABASE_URL")?;
    DatabaseManager::migrate(&pool).await?;

    let config = AppConfig::development();
    let services = Service::new(
        &Repository::new(pool.clone()),
        PasswordHasher::new(config.security.password_salt.clone()),
        TokenService::new(&config.security.jwt_secret, config.security.token_ttl()),
    );
    let router = app(AppState { services, pool }, &config);

    let listener = tokio::net::TcpListener::from_std(listener)?;
    axum::serve(listener, router).await?;
    Ok(())
}
