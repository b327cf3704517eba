mod common;

use std::sync::Arc;

use auth::TokenConfig;
use auth::TokenService;
use case_service::domain::access::authentication::AuthenticationService;
use case_service::domain::identity::errors::IdentityError;
use case_service::domain::identity::models::EmailAddress;
use case_service::domain::identity::models::NewIdentity;
use case_service::domain::identity::models::Role;
use case_service::domain::identity::models::Username;
use case_service::outbound::repositories::InMemoryStore;
use common::test_hasher;
use common::TEST_SECRET;

const CONTENDERS: usize = 12;

fn service() -> Arc<AuthenticationService<InMemoryStore>> {
    let tokens = Arc::new(TokenService::with_system_clock(&TokenConfig::new(
        TEST_SECRET,
    )));

    Arc::new(
        AuthenticationService::new(Arc::new(InMemoryStore::new()), test_hasher(), tokens)
            .expect("Failed to create authentication service"),
    )
}

fn command(username: &str, email: &str) -> NewIdentity {
    NewIdentity::new(
        Username::new(username.to_string()).unwrap(),
        EmailAddress::new(email.to_string()).unwrap(),
        "pass_word!".to_string(),
        Role::CaseWorker,
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_creates_same_username_single_winner() {
    let service = service();

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .create_identity(command("racer", &format!("racer{}@example.com", i)))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => created += 1,
            Err(IdentityError::UsernameAlreadyExists(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, CONTENDERS - 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_creates_same_email_single_winner() {
    let service = service();

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .create_identity(command(&format!("racer{}", i), "racer@example.com"))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => created += 1,
            Err(IdentityError::EmailAlreadyExists(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, CONTENDERS - 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_ensure_identity_creates_once() {
    let service = service();

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .ensure_identity(command("admin", "admin@example.com"))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        if handle
            .await
            .expect("task panicked")
            .expect("ensure_identity failed")
            .is_some()
        {
            created += 1;
        }
    }

    assert_eq!(created, 1);
}
