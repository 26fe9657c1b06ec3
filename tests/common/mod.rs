//! Common test utilities for E2E tests

use clipnest::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
            },
            pagination: config::PaginationConfig {
                notification_limit: 10,
                history_limit: 20,
                max_limit: 100,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = clipnest::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Seed a video owned by the given user
    pub async fn create_test_video(&self, owner: &str, title: &str) -> clipnest::data::Video {
        use chrono::Utc;
        use clipnest::data::{EntityId, Video};

        let video = Video {
            id: EntityId::new().0,
            owner: owner.to_string(),
            title: title.to_string(),
            thumbnail: "https://cdn.test.example/thumb.webp".to_string(),
            views: 0,
            comments_count: 0,
            created_at: Utc::now(),
        };
        self.state.db.upsert_video(&video).await.unwrap();
        video
    }

    /// Seed a user record
    pub async fn create_test_user(&self, full_name: &str) -> clipnest::data::User {
        use chrono::Utc;
        use clipnest::data::{EntityId, User};

        let user = User {
            id: EntityId::new().0,
            full_name: full_name.to_string(),
            avatar: "https://cdn.test.example/avatar.png".to_string(),
            created_at: Utc::now(),
        };
        self.state.db.upsert_user(&user).await.unwrap();
        user
    }

    /// Wait until the recipient has at least `count` notifications.
    ///
    /// Notification dispatch is fire-and-forget, so tests poll briefly
    /// instead of assuming it completed before the response returned.
    pub async fn wait_for_notifications(&self, recipient: &str, count: i64) -> bool {
        for _ in 0..50 {
            let total = self.state.db.count_notifications(recipient).await.unwrap();
            if total >= count {
                return true;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }
        false
    }
}
