#[cfg(test)]
pub mod test_utils {
    use crate::auth::AuthError;
    use crate::auth::provider::{ExternalProfile, IdentityProvider};
    use crate::auth::session::{CookieSettings, DbSessionStore, cookie_key};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use async_trait::async_trait;
    use axum::Router;
    use chrono::{Duration, Utc};
    use migration::{Migrator, MigratorTrait};
    use model::entities::{post, user};
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use std::collections::HashMap;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::EnvFilter;

    /// Authorization code the fake provider accepts for `octocat`.
    pub const OCTOCAT_CODE: &str = "octocat-code";
    pub const OCTOCAT_ID: &str = "MDQ6VXNlcjU4MzIzMQ==";
    /// Authorization code the fake provider accepts for `hubot`.
    pub const HUBOT_CODE: &str = "hubot-code";
    pub const HUBOT_ID: &str = "MDQ6VXNlcjQ4MDkzOA==";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Profile as the fake provider would return it for `login`.
    pub fn profile(node_id: &str, login: &str) -> ExternalProfile {
        ExternalProfile {
            id: node_id.to_string(),
            username: login.to_string(),
            display_name: None,
            bio: None,
            avatar_url: format!("https://avatars.example.com/{}", login),
            profile_url: format!("https://github.com/{}", login),
            emails: vec![format!("{}@example.com", login)],
        }
    }

    pub async fn insert_user(
        db: &DatabaseConnection,
        node_id: &str,
        login: &str,
        seen_welcome_modal: bool,
    ) -> user::Model {
        user::ActiveModel {
            user_id: Set(node_id.to_string()),
            username: Set(login.to_string()),
            avatar_url: Set(format!("https://avatars.example.com/{}", login)),
            github_url: Set(format!("https://github.com/{}", login)),
            email: Set(Some(format!("{}@example.com", login))),
            seen_welcome_modal: Set(seen_welcome_modal),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test user")
    }

    pub async fn insert_post(db: &DatabaseConnection, author: &user::Model, title: &str, body: &str) -> post::Model {
        post::ActiveModel {
            author_id: Set(author.id),
            title: Set(title.to_string()),
            body: Set(body.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test post")
    }

    /// Identity provider that answers from a fixed code table instead of
    /// calling GitHub.
    pub struct FakeIdentityProvider {
        profiles: HashMap<String, ExternalProfile>,
    }

    impl FakeIdentityProvider {
        pub fn new() -> Self {
            let mut profiles = HashMap::new();
            profiles.insert(OCTOCAT_CODE.to_string(), profile(OCTOCAT_ID, "octocat"));
            profiles.insert(HUBOT_CODE.to_string(), profile(HUBOT_ID, "hubot"));
            Self { profiles }
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentityProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn authorize_url(&self, state: &str) -> String {
            format!("https://github.example/login/oauth/authorize?state={}", state)
        }

        async fn fetch_profile(&self, code: &str) -> Result<ExternalProfile, AuthError> {
            self.profiles
                .get(code)
                .cloned()
                .ok_or_else(|| AuthError::Provider(format!("bad_verification_code: {}", code)))
        }
    }

    /// Create AppState for testing; `login_enabled` wires in the fake provider
    pub async fn setup_test_app_state(login_enabled: bool) -> AppState {
        let db = setup_test_db().await;
        let identity: Option<Arc<dyn IdentityProvider>> = if login_enabled {
            Some(Arc::new(FakeIdentityProvider::new()))
        } else {
            None
        };

        AppState {
            sessions: Arc::new(DbSessionStore::new(db.clone(), Duration::days(14))),
            db,
            identity,
            cookie_key: cookie_key(Some("test-session-secret")),
            cookies: CookieSettings {
                secure: false,
                session_ttl: Duration::days(14),
            },
            static_dir: None,
        }
    }

    /// Route test logs to the test writer; filter with `RUST_LOG`, WARN by default.
    pub fn init_test_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }

    /// Log output collected by a thread-local subscriber.
    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        /// Captures DEBUG and above on the current thread until the guard drops.
        pub fn start() -> (Self, tracing::subscriber::DefaultGuard) {
            let logs = Self::default();
            let writer = logs.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(LevelFilter::DEBUG)
                .with_ansi(false)
                .with_writer(move || writer.clone())
                .finish();
            (logs, tracing::subscriber::set_default(subscriber))
        }

        pub fn contents(&self) -> String {
            let bytes = self.0.lock().expect("log buffer poisoned");
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Create axum app for testing, with login enabled
    pub async fn setup_test_app() -> (Router, AppState) {
        init_test_tracing();

        let state = setup_test_app_state(true).await;
        let router = create_router(state.clone());
        (router, state)
    }
}
