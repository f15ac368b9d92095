#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use sqlx::SqlitePool;
use tagpress::{build_app, hash_password_argon2, init_db, run_app, ArticleService, Config};
use tempfile::TempDir;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

pub fn database_url(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("test.sqlite3").display())
}

/// A service over a fresh database; keep the directory alive for the test.
pub async fn article_service() -> (TempDir, ArticleService) {
    let (dir, pool) = database().await;
    (dir, ArticleService::new(pool))
}

pub async fn database() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_db(&database_url(&dir)).await.unwrap();
    (dir, pool)
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

pub struct TestServer {
    pub base_url: String,
    _dir: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn spawn_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let (_, address) = get_random_free_port();
    let config = Config {
        database_url: database_url(&dir),
        bind_address: address,
        admin_username: ADMIN_USERNAME.to_string(),
        admin_password_hash: Some(
            hash_password_argon2(ADMIN_PASSWORD.to_string())
                .await
                .unwrap(),
        ),
    };
    let router = build_app(&config).await.unwrap();
    tokio::spawn(run_app(router, address));

    let base_url = format!("http://{address}");
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if client
            .get(format!("{base_url}/check_health"))
            .send()
            .await
            .is_ok()
        {
            return TestServer {
                base_url,
                _dir: dir,
            };
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("server did not start on {address}");
}
