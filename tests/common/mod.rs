//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use students_api::config::AppConfig;
use students_api::lifecycle::Shutdown;
use students_api::model::{Student, StudentId};
use students_api::storage::{SqliteStorage, StorageError, StorageResult, StudentRepository};
use students_api::HttpServer;
use students_sdk::StudentsClient;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn sdk(&self) -> StudentsClient {
        StudentsClient::with_client(http_client(), &format!("http://{}", self.addr))
    }
}

/// Config suitable for tests; storage is supplied separately.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.env = "test".into();
    config.storage_path = ":memory:".into();
    config.http_server.address = "127.0.0.1:0".into();
    config
}

/// Start a server over a fresh in-memory database.
pub async fn start_server() -> TestServer {
    start_server_with(test_config()).await
}

/// Start a server with a custom config over a fresh in-memory database.
pub async fn start_server_with(config: AppConfig) -> TestServer {
    let repository: Arc<dyn StudentRepository> =
        Arc::new(SqliteStorage::open_in_memory().expect("in-memory storage"));
    start_server_with_repository(config, repository).await
}

/// Start a server whose every repository call fails.
pub async fn start_failing_server() -> TestServer {
    start_server_with_repository(test_config(), Arc::new(UnavailableRepository)).await
}

pub async fn start_server_with_repository(
    config: AppConfig,
    repository: Arc<dyn StudentRepository>,
) -> TestServer {
    let listener = TcpListener::bind(&config.http_server.address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, repository);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// A client that never goes through a proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Repository standing in for a database that cannot be reached.
pub struct UnavailableRepository;

impl StudentRepository for UnavailableRepository {
    fn create_student(&self, _: &str, _: &str, _: i32) -> StorageResult<StudentId> {
        Err(StorageError::Unavailable)
    }

    fn get_student_by_id(&self, _: StudentId) -> StorageResult<Student> {
        Err(StorageError::Unavailable)
    }

    fn get_students(&self) -> StorageResult<Vec<Student>> {
        Err(StorageError::Unavailable)
    }

    fn update_student_by_id(&self, _: StudentId, _: &str, _: &str, _: i32) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }

    fn delete_student_by_id(&self, _: StudentId) -> StorageResult<()> {
        Err(StorageError::Unavailable)
    }
}
