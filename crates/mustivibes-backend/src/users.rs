use std::collections::HashMap;

use serde_json::{Map, Value};

use mustivibes_types::models::User;

use crate::client::{BackendClient, Service};
use crate::envelope;
use crate::error::BackendError;

impl BackendClient {
    /// `GET /users/all`.
    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, BackendError> {
        let body = self.get(Service::Core, "users/all", token).await?;
        Ok(envelope::list(body, "users"))
    }

    /// `GET /users/{id}`.
    pub async fn get_user(&self, token: &str, id: &str) -> Result<User, BackendError> {
        let body = self.get(Service::Core, &format!("users/{id}"), token).await?;
        envelope::object(body, "user")
    }

    /// `PUT /users/{id}` with the changed fields only.
    pub async fn update_user(
        &self,
        token: &str,
        id: &str,
        changes: &Map<String, Value>,
    ) -> Result<User, BackendError> {
        let body = self.put(Service::Core, &format!("users/{id}"), token, changes).await?;
        let updated = envelope::object::<User>(body, "user")
            .ok()
            .filter(|user| !user.id.is_empty());
        match updated {
            Some(user) => Ok(user),
            // Some builds answer `{ success, message }` only; re-read the row.
            None => self.get_user(token, id).await,
        }
    }

    /// `DELETE /users/{id}`.
    pub async fn delete_user(&self, token: &str, id: &str) -> Result<(), BackendError> {
        self.delete(Service::Core, &format!("users/{id}"), token).await?;
        Ok(())
    }

    /// Resolve a follower/following id list into users. Ids that fail to
    /// load are dropped; the rest keep the order of `ids`.
    pub async fn get_users_many(&self, token: &str, ids: &[String]) -> Vec<User> {
        let order: HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let results = self
            .for_each_bounded(ids.to_vec(), |id| async move { self.get_user(token, &id).await })
            .await;

        let mut users: Vec<(usize, User)> = results
            .into_iter()
            .filter_map(|(id, result)| {
                let position = order.get(id.as_str()).copied().unwrap_or(usize::MAX);
                result.ok().map(|user| (position, user))
            })
            .collect();
        users.sort_by_key(|(position, _)| *position);
        users.into_iter().map(|(_, user)| user).collect()
    }
}
