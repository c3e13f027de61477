//! In-memory user store used by tests and local development.

use super::{NewUser, ProfileOutcome, ProfilePatch, SignupOutcome, UserRecord, UserStore};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing signup rules. Test setup only.
    pub async fn seed(&self, record: UserRecord) {
        self.users.write().await.insert(record.id, record);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<SignupOutcome> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Ok(SignupOutcome::Conflict);
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: true,
        };
        users.insert(record.id, record.clone());
        Ok(SignupOutcome::Created(record))
    }

    async fn update_profile(&self, id: Uuid, patch: ProfilePatch) -> Result<ProfileOutcome> {
        let mut users = self.users.write().await;
        if let Some(email) = &patch.email {
            let taken = users
                .values()
                .any(|other| other.id != id && &other.email == email);
            if taken {
                return Ok(ProfileOutcome::EmailTaken);
            }
        }
        let Some(record) = users.get_mut(&id) else {
            return Ok(ProfileOutcome::Missing);
        };
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(email) = patch.email {
            record.email = email;
        }
        Ok(ProfileOutcome::Updated(record.clone()))
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }
}
