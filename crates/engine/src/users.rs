//! The module contains the user entity and the repository storing it.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, PageList, ResultEngine};

/// A stored user.
///
/// The `id` is assigned once by the repository (or by the client on an
/// upsert) and never changes afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    pub id: Uuid,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserEntity {
    /// A user without an id yet; `insert` assigns one.
    pub fn new(login: String, first_name: String, last_name: String) -> Self {
        Self {
            id: Uuid::nil(),
            login,
            first_name,
            last_name,
        }
    }

    /// An empty user carrying a client supplied id.
    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    fn replace_fields(&mut self, other: &UserEntity) {
        self.login.clone_from(&other.login);
        self.first_name.clone_from(&other.first_name);
        self.last_name.clone_from(&other.last_name);
    }
}

/// Storage of users, shared by every request handler.
pub trait UserRepository: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> Option<UserEntity>;

    /// Store a new user. A nil id is replaced by a fresh one.
    fn insert(&self, user: UserEntity) -> ResultEngine<UserEntity>;

    /// Replace the mutable fields of an existing user.
    fn update(&self, user: UserEntity) -> ResultEngine<()>;

    /// Insert `user` under `id` when absent, otherwise replace the stored
    /// fields. The flag is `true` when a new record was created.
    fn upsert_by_id(&self, id: Uuid, user: UserEntity) -> (UserEntity, bool);

    /// Remove a user. Returns whether something was removed.
    fn delete(&self, id: Uuid) -> bool;

    /// Insertion ordered page, `page_number` starting at 1.
    fn get_page(&self, page_number: usize, page_size: usize) -> PageList<UserEntity>;

    fn count(&self) -> usize;
}

#[derive(Debug, Default)]
struct Store {
    users: HashMap<Uuid, UserEntity>,
    order: Vec<Uuid>,
}

impl Store {
    fn push(&mut self, user: UserEntity) -> UserEntity {
        self.order.push(user.id);
        self.users.insert(user.id, user.clone());
        user
    }
}

/// Process wide in-memory repository.
///
/// Every operation takes the lock once, so each call is a single atomic
/// step. A poisoned lock is recovered since no call leaves the map half
/// written.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_id(&self, id: Uuid) -> Option<UserEntity> {
        self.read().users.get(&id).cloned()
    }

    fn insert(&self, mut user: UserEntity) -> ResultEngine<UserEntity> {
        let mut store = self.write();
        if user.id.is_nil() {
            user.id = Uuid::new_v4();
            while store.users.contains_key(&user.id) {
                user.id = Uuid::new_v4();
            }
        } else if store.users.contains_key(&user.id) {
            return Err(EngineError::ExistingKey(user.id.to_string()));
        }

        tracing::debug!("inserting user {}", user.id);
        Ok(store.push(user))
    }

    fn update(&self, user: UserEntity) -> ResultEngine<()> {
        let mut store = self.write();
        let stored = store
            .users
            .get_mut(&user.id)
            .ok_or_else(|| EngineError::KeyNotFound(user.id.to_string()))?;
        stored.replace_fields(&user);
        Ok(())
    }

    fn upsert_by_id(&self, id: Uuid, user: UserEntity) -> (UserEntity, bool) {
        let mut store = self.write();
        if let Some(stored) = store.users.get_mut(&id) {
            stored.replace_fields(&user);
            return (stored.clone(), false);
        }

        let mut user = user;
        user.id = id;
        tracing::debug!("upsert created user {id}");
        (store.push(user), true)
    }

    fn delete(&self, id: Uuid) -> bool {
        let mut store = self.write();
        if store.users.remove(&id).is_none() {
            return false;
        }
        store.order.retain(|stored| *stored != id);
        true
    }

    fn get_page(&self, page_number: usize, page_size: usize) -> PageList<UserEntity> {
        let store = self.read();
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        let items = store
            .order
            .iter()
            .skip(offset)
            .take(page_size)
            .filter_map(|id| store.users.get(id).cloned())
            .collect();

        PageList::new(items, store.users.len(), page_number, page_size)
    }

    fn count(&self) -> usize {
        self.read().users.len()
    }
}
