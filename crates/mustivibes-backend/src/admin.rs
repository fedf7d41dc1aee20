use serde_json::{Value, json};

use mustivibes_types::models::{AdminProfile, DashboardData};

use crate::client::{BackendClient, Service};
use crate::envelope;
use crate::error::BackendError;

impl BackendClient {
    /// `POST /admin/login`. Returns the backend's admin token and profile.
    pub async fn admin_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, AdminProfile), BackendError> {
        let body = self
            .post(
                Service::Core,
                "admin/login",
                None,
                &json!({ "email": email, "password": password }),
            )
            .await?;

        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BackendError::Decode("login response has no token".into()))?
            .to_string();

        let admin = envelope::object(body, "admin")?;
        Ok((token, admin))
    }

    /// `POST /admin/change-password`.
    pub async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), BackendError> {
        self.post(
            Service::Core,
            "admin/change-password",
            Some(token),
            &json!({ "currentPassword": current_password, "newPassword": new_password }),
        )
        .await?;
        Ok(())
    }

    /// `GET /dashboard`: the backend pre-aggregates everything.
    pub async fn dashboard(&self, token: &str) -> Result<DashboardData, BackendError> {
        let body = self.get(Service::Social, "dashboard", token).await?;
        envelope::object(body, "dashboard")
    }
}
