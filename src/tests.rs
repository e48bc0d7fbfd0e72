#[cfg(test)]
mod integration_tests {
    use crate::auth::session::{SESSION_COOKIE, STATE_COOKIE};
    use crate::handlers::posts::NewPostRequest;
    use crate::router::create_router;
    use crate::schemas::{ApiResponse, ErrorResponse};
    use crate::test_utils::test_utils::{
        CapturedLogs, HUBOT_CODE, HUBOT_ID, OCTOCAT_CODE, OCTOCAT_ID, init_test_tracing,
        insert_post, insert_user, setup_test_app, setup_test_app_state,
    };
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::{TestResponse, TestServer};
    use common::{MeResponse, PostDto, UserDto};
    use model::entities::{session, user};
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

    fn location(response: &TestResponse) -> String {
        response
            .header("location")
            .to_str()
            .expect("location header should be ASCII")
            .to_string()
    }

    /// Runs the redirect/callback round trip for `code` and returns the
    /// callback response.
    async fn login(server: &TestServer, code: &str) -> TestResponse {
        let start = server.get("/login/github").await;
        start.assert_status(StatusCode::SEE_OTHER);

        let authorize = location(&start);
        let state = authorize
            .split("state=")
            .nth(1)
            .expect("authorize URL should carry a state")
            .to_string();

        server
            .get("/login/github/callback")
            .add_query_param("code", code)
            .add_query_param("state", state)
            .add_cookie(start.cookie(STATE_COOKIE))
            .await
    }

    async fn me(server: &TestServer, session: Option<Cookie<'static>>) -> MeResponse {
        let mut request = server.get("/api/v1/me");
        if let Some(cookie) = session {
            request = request.add_cookie(cookie);
        }
        let response = request.await;
        response.assert_status_ok();
        response.json::<ApiResponse<MeResponse>>().data
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_me_is_anonymous_without_session() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let body = me(&server, None).await;

        assert_eq!(body.user, None);
        assert!(body.login_enabled);
    }

    #[tokio::test]
    async fn test_login_redirects_to_provider_with_state_cookie() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/login/github").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert!(location(&response).starts_with("https://github.example/login/oauth/authorize?state="));

        let state_cookie = response.cookie(STATE_COOKIE);
        assert_eq!(state_cookie.http_only(), Some(true));
        assert_eq!(state_cookie.path(), Some("/login"));
    }

    #[tokio::test]
    async fn test_first_login_creates_user_and_shows_welcome() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = login(&server, OCTOCAT_CODE).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/?welcome");

        let users = user::Entity::find().all(&state.db).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user_id, OCTOCAT_ID);
        assert_eq!(users[0].username, "octocat");
        assert_eq!(users[0].email.as_deref(), Some("octocat@example.com"));
        assert!(users[0].seen_welcome_modal, "welcome flag should be set after redirect");

        let body = me(&server, Some(response.cookie(SESSION_COOKIE))).await;
        assert_eq!(body.user.map(|u| u.username), Some("octocat".to_string()));
    }

    #[tokio::test]
    async fn test_second_login_skips_welcome() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        assert_eq!(location(&login(&server, OCTOCAT_CODE).await), "/?welcome");
        let again = login(&server, OCTOCAT_CODE).await;

        again.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&again), "/");
        assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_existing_user_who_never_saw_welcome_gets_it_once() {
        let (app, state) = setup_test_app().await;
        insert_user(&state.db, OCTOCAT_ID, "octocat", false).await;
        let server = TestServer::new(app).unwrap();

        assert_eq!(location(&login(&server, OCTOCAT_CODE).await), "/?welcome");
        assert_eq!(location(&login(&server, OCTOCAT_CODE).await), "/");
        assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_distinct_identities_get_distinct_users() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        login(&server, OCTOCAT_CODE).await;
        login(&server, HUBOT_CODE).await;

        assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_callback_with_forged_state_is_rejected() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let start = server.get("/login/github").await;
        let response = server
            .get("/login/github/callback")
            .add_query_param("code", OCTOCAT_CODE)
            .add_query_param("state", "forged")
            .add_cookie(start.cookie(STATE_COOKIE))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert!(response.cookies().get(SESSION_COOKIE).is_none());
        assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_callback_without_state_cookie_is_rejected() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/login/github/callback")
            .add_query_param("code", OCTOCAT_CODE)
            .add_query_param("state", "anything")
            .await;

        assert_eq!(location(&response), "/");
        assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_code_exchange_redirects_home_without_session() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = login(&server, "bad-code").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert!(response.cookies().get(SESSION_COOKIE).is_none());
        assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 0);
        assert_eq!(session::Entity::find().count(&state.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let session_cookie = login(&server, OCTOCAT_CODE).await.cookie(SESSION_COOKIE);
        assert!(me(&server, Some(session_cookie.clone())).await.user.is_some());

        let response = server.get("/logout").add_cookie(session_cookie.clone()).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(session::Entity::find().count(&state.db).await.unwrap(), 0);
        assert_eq!(me(&server, Some(session_cookie)).await.user, None);
    }

    #[tokio::test]
    async fn test_logout_without_session_still_redirects() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/logout").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_relogin_replaces_previous_session() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let first = login(&server, OCTOCAT_CODE).await.cookie(SESSION_COOKIE);

        let start = server.get("/login/github").await;
        let oauth_state = location(&start).split("state=").nth(1).unwrap().to_string();
        let second = server
            .get("/login/github/callback")
            .add_query_param("code", OCTOCAT_CODE)
            .add_query_param("state", oauth_state)
            .add_cookie(start.cookie(STATE_COOKIE))
            .add_cookie(first.clone())
            .await
            .cookie(SESSION_COOKIE);

        assert_ne!(first.value(), second.value());
        assert_eq!(session::Entity::find().count(&state.db).await.unwrap(), 1);
        assert_eq!(me(&server, Some(first)).await.user, None);
        assert!(me(&server, Some(second)).await.user.is_some());
    }

    #[tokio::test]
    async fn test_forged_session_cookie_is_anonymous() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let body = me(&server, Some(Cookie::new(SESSION_COOKIE, "not-a-signed-value"))).await;

        assert_eq!(body.user, None);
    }

    #[tokio::test]
    async fn test_login_routes_absent_without_client_id() {
        init_test_tracing();
        let state = setup_test_app_state(false).await;
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.get("/login/github").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorResponse>().code, "LOGIN_DISABLED");
        server.get("/login/github/callback").await.assert_status(StatusCode::NOT_FOUND);

        let body = me(&server, None).await;
        assert!(!body.login_enabled);
        assert_eq!(body.user, None);

        // Everything else keeps working
        server.get("/health").await.assert_status_ok();
        server.get("/api/v1/posts").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_frontend_fallback_leaves_login_and_api_paths_alone() {
        init_test_tracing();
        let dist = tempfile::TempDir::new().unwrap();
        std::fs::write(dist.path().join("index.html"), "<html>pairhub</html>").unwrap();
        let mut state = setup_test_app_state(false).await;
        state.static_dir = Some(dist.path().to_path_buf());
        let server = TestServer::new(create_router(state)).unwrap();

        let page = server.get("/profile/octocat").await;
        page.assert_status_ok();
        page.assert_text("<html>pairhub</html>");
        server.get("/").await.assert_text("<html>pairhub</html>");

        let login = server.get("/login/github").await;
        login.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(login.json::<ErrorResponse>().code, "LOGIN_DISABLED");
        server.get("/login/github/callback").await.assert_status(StatusCode::NOT_FOUND);

        let api = server.get("/api/v1/does-not-exist").await;
        api.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(api.json::<ErrorResponse>().code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_user_by_username() {
        let (app, state) = setup_test_app().await;
        insert_user(&state.db, OCTOCAT_ID, "octocat", true).await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/users/octocat").await;
        response.assert_status_ok();
        let body: ApiResponse<UserDto> = response.json();
        assert_eq!(body.data.username, "octocat");
        assert_eq!(body.data.github_url, "https://github.com/octocat");

        // Email stays private
        let raw: serde_json::Value = response.json();
        assert!(raw["data"].get("email").is_none());
    }

    #[tokio::test]
    async fn test_reused_username_resolves_to_newest_account() {
        let (app, state) = setup_test_app().await;
        insert_user(&state.db, OCTOCAT_ID, "pairer", true).await;
        let newest = insert_user(&state.db, HUBOT_ID, "pairer", true).await;
        let server = TestServer::new(app).unwrap();

        let body: ApiResponse<UserDto> = server.get("/api/v1/users/pairer").await.json();

        assert_eq!(body.data.id, newest.id);
    }

    #[tokio::test]
    async fn test_me_logs_do_not_leak_email() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let session_cookie = login(&server, OCTOCAT_CODE).await.cookie(SESSION_COOKIE);

        let (logs, _guard) = CapturedLogs::start();
        let body = me(&server, Some(session_cookie)).await;
        assert_eq!(body.user.map(|u| u.username).as_deref(), Some("octocat"));

        let output = logs.contents();
        assert!(output.contains("octocat"), "expected /me to log the username");
        assert!(!output.contains("octocat@example.com"));
    }

    #[tokio::test]
    async fn test_get_unknown_user_returns_404() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/users/nobody").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "USER_NOT_FOUND");
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_unknown_api_path_returns_json_404() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_post_requires_login() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/posts")
            .json(&NewPostRequest {
                title: "Pair on a Rust CLI?".to_string(),
                body: "Evenings CET".to_string(),
            })
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_create_post_rejects_blank_title() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let session_cookie = login(&server, OCTOCAT_CODE).await.cookie(SESSION_COOKIE);

        let response = server
            .post("/api/v1/posts")
            .add_cookie(session_cookie)
            .json(&NewPostRequest {
                title: "   ".to_string(),
                body: "".to_string(),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_and_list_posts() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let session_cookie = login(&server, OCTOCAT_CODE).await.cookie(SESSION_COOKIE);

        let response = server
            .post("/api/v1/posts")
            .add_cookie(session_cookie)
            .json(&NewPostRequest {
                title: "  Looking for a Yew pairing partner ".to_string(),
                body: "Weekends, any timezone".to_string(),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let created: ApiResponse<PostDto> = response.json();
        assert_eq!(created.data.title, "Looking for a Yew pairing partner");
        assert_eq!(created.data.author.username, "octocat");

        let listed: ApiResponse<Vec<PostDto>> = server.get("/api/v1/posts").await.json();
        assert_eq!(listed.data.len(), 1);
        assert_eq!(listed.data[0].id, created.data.id);
    }

    #[tokio::test]
    async fn test_posts_search_and_pagination() {
        let (app, state) = setup_test_app().await;
        let author = insert_user(&state.db, OCTOCAT_ID, "octocat", true).await;
        insert_post(&state.db, &author, "Rust async deep dive", "tokio and axum").await;
        insert_post(&state.db, &author, "Elm frontend", "looking for someone who knows RUST").await;
        insert_post(&state.db, &author, "Go microservices", "grpc").await;
        let server = TestServer::new(app).unwrap();

        let found: ApiResponse<Vec<PostDto>> =
            server.get("/api/v1/posts").add_query_param("s", "rust").await.json();
        assert_eq!(found.data.len(), 2);
        assert!(found.data.iter().all(|p| p.title != "Go microservices"));

        // A blank phrase lists everything
        let all: ApiResponse<Vec<PostDto>> =
            server.get("/api/v1/posts").add_query_param("s", "  ").await.json();
        assert_eq!(all.data.len(), 3);

        let first_page: ApiResponse<Vec<PostDto>> = server
            .get("/api/v1/posts")
            .add_query_param("limit", 2)
            .await
            .json();
        let second_page: ApiResponse<Vec<PostDto>> = server
            .get("/api/v1/posts")
            .add_query_param("limit", 2)
            .add_query_param("page", 2)
            .await
            .json();
        assert_eq!(first_page.data.len(), 2);
        assert_eq!(second_page.data.len(), 1);
        // Newest first
        assert_eq!(second_page.data[0].title, "Rust async deep dive");
    }

    async fn assert_validation_error(response: TestResponse) {
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert!(!body.success);
        assert!(!body.error.is_empty());
    }

    #[tokio::test]
    async fn test_posts_reject_invalid_paging() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        assert_validation_error(server.get("/api/v1/posts").add_query_param("page", 0).await).await;
        assert_validation_error(server.get("/api/v1/posts").add_query_param("limit", 500).await).await;
        assert_validation_error(
            server.get("/api/v1/posts").add_query_param("page", "two").await,
        )
        .await;
    }

    #[tokio::test]
    async fn test_posts_reject_page_beyond_range() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        assert_validation_error(
            server
                .get("/api/v1/posts")
                .add_query_param("page", u64::MAX)
                .add_query_param("limit", 2)
                .await,
        )
        .await;
    }

    #[tokio::test]
    async fn test_create_post_rejects_malformed_body_with_json_error() {
        let (app, _) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let session_cookie = login(&server, OCTOCAT_CODE).await.cookie(SESSION_COOKIE);

        let response = server
            .post("/api/v1/posts")
            .add_cookie(session_cookie.clone())
            .json(&serde_json::json!({ "body": "no title" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<ErrorResponse>().code, "VALIDATION_ERROR");

        let too_long = NewPostRequest {
            title: "x".repeat(121),
            body: String::new(),
        };
        assert_validation_error(
            server
                .post("/api/v1/posts")
                .add_cookie(session_cookie)
                .json(&too_long)
                .await,
        )
        .await;
    }

    #[tokio::test]
    async fn test_posts_search_matches_wildcards_literally() {
        let (app, state) = setup_test_app().await;
        let author = insert_user(&state.db, OCTOCAT_ID, "octocat", true).await;
        insert_post(&state.db, &author, "Rust async", "tokio").await;
        insert_post(&state.db, &author, "axb", "").await;
        let server = TestServer::new(app).unwrap();

        let search = |phrase: &'static str| server.get("/api/v1/posts").add_query_param("s", phrase);

        let percent: ApiResponse<Vec<PostDto>> = search("%").await.json();
        assert!(percent.data.is_empty());
        let underscore: ApiResponse<Vec<PostDto>> = search("a_b").await.json();
        assert!(underscore.data.is_empty());

        insert_post(&state.db, &author, "100% remote", "uses snake_case").await;

        let percent: ApiResponse<Vec<PostDto>> = search("0% R").await.json();
        assert_eq!(percent.data.len(), 1);
        assert_eq!(percent.data[0].title, "100% remote");
        let underscore: ApiResponse<Vec<PostDto>> = search("e_c").await.json();
        assert_eq!(underscore.data.len(), 1);
    }

    #[tokio::test]
    async fn test_session_row_belongs_to_logged_in_user() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        login(&server, OCTOCAT_CODE).await;

        let octocat = user::Entity::find()
            .filter(user::Column::UserId.eq(OCTOCAT_ID))
            .one(&state.db)
            .await
            .unwrap()
            .unwrap();
        let sessions = session::Entity::find().all(&state.db).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].user_id, Some(octocat.id));
    }
}
