//! In-memory user records.
//!
//! The store is constructed once at startup and shared with the HTTP layer
//! through `Arc`. All access goes through a single mutex.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A single user entry
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
}

/// Input for `UserStore::create_user`
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
}

/// Input for `UserStore::update_user`; only the name is mutable.
/// `None` keeps the stored name.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
}

struct Records {
    users: Vec<User>,
    next_id: u64,
}

pub struct UserStore {
    records: Mutex<Records>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Records {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Build a store pre-populated with one record per name, ids 1..=n
    pub fn with_users<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for name in names {
            store.create_user(NewUser { name: name.into() });
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        // Every mutation completes before the guard drops, so a poisoned
        // lock still holds a consistent record list.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All records in insertion order
    pub fn list_users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    pub fn get_user_by_id(&self, id: u64) -> Option<User> {
        self.lock().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn create_user(&self, new_user: NewUser) -> User {
        let mut records = self.lock();
        let user = User {
            id: records.next_id,
            name: new_user.name,
        };
        records.next_id += 1;
        records.users.push(user.clone());
        user
    }

    /// Apply `changes` to an existing record. Returns `None` if no record has `id`.
    pub fn update_user(&self, id: u64, changes: UserChanges) -> Option<User> {
        let mut records = self.lock();
        let user = records.users.iter_mut().find(|u| u.id == id)?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        Some(user.clone())
    }

    /// Remove the record with `id`, returning it. Absent ids are a no-op.
    pub fn delete_user(&self, id: u64) -> Option<User> {
        let mut records = self.lock();
        let index = records.users.iter().position(|u| u.id == id)?;
        Some(records.users.remove(index))
    }

    pub fn len(&self) -> usize {
        self.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
