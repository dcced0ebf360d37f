//! Best-effort user enrichment of order responses.

use common::UserId;
use user_directory::{UserDirectory, UserSnapshot};

use crate::error::DomainError;
use crate::order::OrderResponse;

/// Attaches user data from the user directory to order responses.
///
/// Lookup failures of any kind are logged and swallowed: the response is
/// returned with `user` left empty and the surrounding operation carries on.
#[derive(Clone)]
pub struct UserEnricher<U: UserDirectory> {
    directory: U,
}

impl<U: UserDirectory> UserEnricher<U> {
    pub fn new(directory: U) -> Self {
        Self { directory }
    }

    /// Returns a reference to the underlying directory.
    pub fn directory(&self) -> &U {
        &self.directory
    }

    async fn fetch_user(&self, user_id: UserId) -> Result<UserSnapshot, DomainError> {
        Ok(self.directory.get_user_by_id(user_id).await?)
    }

    /// Sets `response.user` if the directory can resolve the order's user.
    #[tracing::instrument(skip(self, response), fields(user_id = %response.user_id))]
    pub async fn attach_user(&self, mut response: OrderResponse) -> OrderResponse {
        match self.fetch_user(response.user_id).await {
            Ok(user) => response.user = Some(user),
            Err(e) => {
                metrics::counter!("user_enrichment_failures_total").increment(1);
                tracing::warn!(
                    user_id = %response.user_id,
                    error = %e,
                    "failed to fetch user info"
                );
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Order;
    use user_directory::InMemoryUserDirectory;

    fn john() -> UserSnapshot {
        UserSnapshot {
            id: UserId::new(123),
            name: "John".to_string(),
            surname: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            birth_date: None,
        }
    }

    fn response_for(user: i64) -> OrderResponse {
        OrderResponse::from(&Order::new(UserId::new(user)))
    }

    #[tokio::test]
    async fn attaches_known_user() {
        let directory = InMemoryUserDirectory::new();
        directory.insert(john());
        let enricher = UserEnricher::new(directory);

        let response = enricher.attach_user(response_for(123)).await;
        assert_eq!(response.user, Some(john()));
    }

    #[tokio::test]
    async fn unknown_user_leaves_response_unchanged() {
        let enricher = UserEnricher::new(InMemoryUserDirectory::new());

        let original = response_for(7);
        let response = enricher.attach_user(original.clone()).await;
        assert_eq!(response, original);
    }

    #[tokio::test]
    async fn outage_leaves_user_empty() {
        let directory = InMemoryUserDirectory::new();
        directory.insert(john());
        directory.set_unavailable(true);
        let enricher = UserEnricher::new(directory);

        let response = enricher.attach_user(response_for(123)).await;
        assert!(response.user.is_none());
        assert_eq!(response.user_id, UserId::new(123));
    }
}
