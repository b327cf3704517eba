#![allow(dead_code)]

use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenConfig;
use auth::TokenService;
use case_service::domain::access::authentication::AuthenticationService;
use case_service::domain::access::gate::AuthorizationGate;
use case_service::domain::assignment::models::ClientId;
use case_service::domain::assignment::service::AssignmentService;
use case_service::domain::identity::models::EmailAddress;
use case_service::domain::identity::models::Identity;
use case_service::domain::identity::models::NewIdentity;
use case_service::domain::identity::models::Role;
use case_service::domain::identity::models::Username;
use case_service::inbound::http::router::create_router;
use case_service::inbound::http::router::AppState;
use case_service::outbound::repositories::InMemoryStore;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Cheap Argon2 cost so tests do not spend seconds hashing.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("valid test params")
}

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryStore>,
    pub authentication: Arc<AuthenticationService<InMemoryStore>>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task with one admin seeded
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryStore::new());
        let tokens = Arc::new(TokenService::with_system_clock(&TokenConfig::new(
            TEST_SECRET,
        )));

        let authentication = Arc::new(
            AuthenticationService::new(Arc::clone(&store), test_hasher(), Arc::clone(&tokens))
                .expect("Failed to create authentication service"),
        );
        let gate = Arc::new(AuthorizationGate::new(Arc::clone(&store), tokens));
        let assignments = Arc::new(AssignmentService::new(
            Arc::clone(&store),
            Arc::clone(&store),
        ));

        let router = create_router(AppState {
            authentication: Arc::clone(&authentication),
            gate,
            assignments,
        });

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        let app = Self {
            address,
            port,
            store,
            authentication,
            api_client: reqwest::Client::new(),
        };

        app.seed_identity(
            ADMIN_USERNAME,
            "admin@example.com",
            ADMIN_PASSWORD,
            Role::Admin,
        )
        .await;

        app
    }

    /// Create an identity directly through the authentication service
    pub async fn seed_identity(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Identity {
        self.authentication
            .create_identity(NewIdentity::new(
                Username::new(username.to_string()).unwrap(),
                EmailAddress::new(email.to_string()).unwrap(),
                password.to_string(),
                role,
            ))
            .await
            .expect("Failed to seed identity")
    }

    pub async fn seed_client(&self, client_id: i64) {
        self.store.add_client(ClientId(client_id)).await;
    }

    /// Submit the login form
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/token")
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the bearer token
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["access_token"]
            .as_str()
            .expect("Missing access_token")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.token_for(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}
