//! In-memory store backing both repository ports.
//!
//! Used by tests and local runs without a database. Every write takes the
//! single table lock for its whole check-and-insert, which gives the same
//! uniqueness and reference guarantees as the Postgres constraints.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::assignment::errors::AssignmentError;
use crate::domain::assignment::models::Assignment;
use crate::domain::assignment::models::AssignmentUpdate;
use crate::domain::assignment::models::ClientId;
use crate::domain::assignment::ports::AssignmentRepository;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::NewIdentityRecord;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;

#[derive(Debug, Default)]
struct Tables {
    identities: BTreeMap<IdentityId, Identity>,
    username_index: HashMap<String, IdentityId>,
    email_index: HashMap<String, IdentityId>,
    last_identity_id: i64,
    clients: BTreeSet<ClientId>,
    assignments: BTreeMap<(ClientId, IdentityId), Assignment>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client so assignments can reference it.
    pub async fn add_client(&self, client_id: ClientId) {
        self.tables.write().await.clients.insert(client_id);
    }
}

#[async_trait]
impl IdentityRepository for InMemoryStore {
    async fn create(&self, identity: NewIdentityRecord) -> Result<Identity, IdentityError> {
        let mut tables = self.tables.write().await;

        if tables
            .username_index
            .contains_key(identity.username.as_str())
        {
            return Err(IdentityError::UsernameAlreadyExists(
                identity.username.to_string(),
            ));
        }
        if tables.email_index.contains_key(identity.email.as_str()) {
            return Err(IdentityError::EmailAlreadyExists(identity.email.to_string()));
        }

        tables.last_identity_id += 1;
        let id = IdentityId(tables.last_identity_id);
        let created = Identity {
            id,
            username: identity.username,
            email: identity.email,
            password_hash: identity.password_hash,
            role: identity.role,
            created_at: Utc::now(),
        };

        tables
            .username_index
            .insert(created.username.as_str().to_string(), id);
        tables
            .email_index
            .insert(created.email.as_str().to_string(), id);
        tables.identities.insert(id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError> {
        Ok(self.tables.read().await.identities.get(&id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityError> {
        let tables = self.tables.read().await;

        Ok(tables
            .username_index
            .get(username.as_str())
            .and_then(|id| tables.identities.get(id))
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, IdentityError> {
        let tables = self.tables.read().await;

        Ok(tables
            .email_index
            .get(email.as_str())
            .and_then(|id| tables.identities.get(id))
            .cloned())
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryStore {
    async fn create(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
    ) -> Result<Assignment, AssignmentError> {
        let mut tables = self.tables.write().await;

        if !tables.clients.contains(&client_id) {
            return Err(AssignmentError::ClientNotFound(client_id));
        }
        if !tables.identities.contains_key(&case_worker_id) {
            return Err(AssignmentError::CaseWorkerNotFound(case_worker_id));
        }
        if tables
            .assignments
            .contains_key(&(client_id, case_worker_id))
        {
            return Err(AssignmentError::AlreadyExists {
                client_id,
                case_worker_id,
            });
        }

        let assignment = Assignment::new(client_id, case_worker_id);
        tables
            .assignments
            .insert((client_id, case_worker_id), assignment.clone());

        Ok(assignment)
    }

    async fn update(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
        update: AssignmentUpdate,
    ) -> Result<Assignment, AssignmentError> {
        let mut tables = self.tables.write().await;

        let assignment = tables
            .assignments
            .get_mut(&(client_id, case_worker_id))
            .ok_or(AssignmentError::NotFound {
                client_id,
                case_worker_id,
            })?;
        update.apply_to(assignment);

        Ok(assignment.clone())
    }

    async fn find(
        &self,
        client_id: ClientId,
        case_worker_id: IdentityId,
    ) -> Result<Option<Assignment>, AssignmentError> {
        Ok(self
            .tables
            .read()
            .await
            .assignments
            .get(&(client_id, case_worker_id))
            .cloned())
    }

    async fn find_by_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Assignment>, AssignmentError> {
        Ok(self
            .tables
            .read()
            .await
            .assignments
            .range((client_id, IdentityId(i64::MIN))..=(client_id, IdentityId(i64::MAX)))
            .map(|(_, assignment)| assignment.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::assignment::models::SuccessRate;
    use crate::domain::identity::models::Role;

    fn record(username: &str, email: &str) -> NewIdentityRecord {
        NewIdentityRecord {
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            role: Role::CaseWorker,
        }
    }

    #[tokio::test]
    async fn test_identity_ids_are_sequential() {
        let store = InMemoryStore::new();

        let first = IdentityRepository::create(&store, record("alice", "alice@example.com"))
            .await
            .unwrap();
        let second = IdentityRepository::create(&store, record("bob", "bob@example.com"))
            .await
            .unwrap();

        assert_eq!(first.id, IdentityId(1));
        assert_eq!(second.id, IdentityId(2));
        assert_eq!(
            store.find_by_id(IdentityId(2)).await.unwrap().unwrap().username.as_str(),
            "bob"
        );
    }

    #[tokio::test]
    async fn test_identity_uniqueness() {
        let store = InMemoryStore::new();
        IdentityRepository::create(&store, record("alice", "alice@example.com"))
            .await
            .unwrap();

        let same_username =
            IdentityRepository::create(&store, record("alice", "other@example.com")).await;
        let same_email = IdentityRepository::create(&store, record("carol", "alice@example.com")).await;

        assert!(matches!(
            same_username,
            Err(IdentityError::UsernameAlreadyExists(_))
        ));
        assert!(matches!(same_email, Err(IdentityError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_single_winner() {
        let store = Arc::new(InMemoryStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    IdentityRepository::create(
                        store.as_ref(),
                        record("racer", &format!("racer{}@example.com", i)),
                    )
                    .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_assignment_references_must_exist() {
        let store = InMemoryStore::new();
        let worker = IdentityRepository::create(&store, record("worker", "worker@example.com"))
            .await
            .unwrap();

        let missing_client = AssignmentRepository::create(&store, ClientId(7), worker.id).await;
        assert!(matches!(
            missing_client,
            Err(AssignmentError::ClientNotFound(ClientId(7)))
        ));

        store.add_client(ClientId(7)).await;
        let missing_worker = AssignmentRepository::create(&store, ClientId(7), IdentityId(99)).await;
        assert!(matches!(
            missing_worker,
            Err(AssignmentError::CaseWorkerNotFound(IdentityId(99)))
        ));
    }

    #[tokio::test]
    async fn test_assignment_pair_is_unique() {
        let store = InMemoryStore::new();
        let worker = IdentityRepository::create(&store, record("worker", "worker@example.com"))
            .await
            .unwrap();
        store.add_client(ClientId(7)).await;

        AssignmentRepository::create(&store, ClientId(7), worker.id)
            .await
            .unwrap();
        let again = AssignmentRepository::create(&store, ClientId(7), worker.id).await;

        assert!(matches!(again, Err(AssignmentError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_update_and_list() {
        let store = InMemoryStore::new();
        let worker = IdentityRepository::create(&store, record("worker", "worker@example.com"))
            .await
            .unwrap();
        store.add_client(ClientId(7)).await;
        store.add_client(ClientId(8)).await;
        AssignmentRepository::create(&store, ClientId(7), worker.id)
            .await
            .unwrap();
        AssignmentRepository::create(&store, ClientId(8), worker.id)
            .await
            .unwrap();

        let updated = AssignmentRepository::update(
            &store,
            ClientId(7),
            worker.id,
            AssignmentUpdate {
                retention_services: Some(true),
                success_rate: Some(SuccessRate::new(40).unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(updated.services.retention_services);
        assert_eq!(updated.success_rate.value(), 40);
        assert_eq!(
            store.find(ClientId(7), worker.id).await.unwrap(),
            Some(updated)
        );

        let listed = store.find_by_client(ClientId(7)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].client_id, ClientId(7));
    }

    #[tokio::test]
    async fn test_update_missing_pair_is_not_found() {
        let store = InMemoryStore::new();

        let result = AssignmentRepository::update(
            &store,
            ClientId(99),
            IdentityId(1),
            AssignmentUpdate::default(),
        )
        .await;

        assert!(matches!(result, Err(AssignmentError::NotFound { .. })));
    }
}
