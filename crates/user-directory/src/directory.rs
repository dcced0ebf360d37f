use async_trait::async_trait;
use common::UserId;

use crate::{Result, UserSnapshot};

/// Read-only lookup of users by id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches the current snapshot of a user.
    async fn get_user_by_id(&self, user_id: UserId) -> Result<UserSnapshot>;
}
