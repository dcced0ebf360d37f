//! In-memory user directory.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;

use crate::{DirectoryError, Result, UserDirectory, UserSnapshot};

#[derive(Debug, Default)]
struct InMemoryDirectoryState {
    users: HashMap<UserId, UserSnapshot>,
    unavailable: bool,
    calls: usize,
}

/// In-memory user directory for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    state: Arc<RwLock<InMemoryDirectoryState>>,
}

impl InMemoryUserDirectory {
    /// Creates a new empty in-memory directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user.
    pub fn insert(&self, user: UserSnapshot) {
        self.state.write().unwrap().users.insert(user.id, user);
    }

    /// Configures every subsequent lookup to fail as if the directory were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    /// Returns how many lookups have been made.
    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().calls
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user_by_id(&self, user_id: UserId) -> Result<UserSnapshot> {
        let mut state = self.state.write().unwrap();
        state.calls += 1;

        if state.unavailable {
            return Err(DirectoryError::Unavailable(
                "simulated directory outage".to_string(),
            ));
        }

        state
            .users
            .get(&user_id)
            .cloned()
            .ok_or(DirectoryError::NotFound(user_id))
    }
}
