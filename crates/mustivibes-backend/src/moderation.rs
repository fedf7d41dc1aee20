use serde_json::{Value, json};

use mustivibes_types::api::ReportAction;
use mustivibes_types::models::{Report, Warning, WarningGuideline};

use crate::client::{BackendClient, Service};
use crate::envelope;
use crate::error::BackendError;

impl BackendClient {
    // -- User reports --

    /// `GET /admin/reports`.
    pub async fn list_reports(&self, token: &str) -> Result<Vec<Report>, BackendError> {
        let body = self.get(Service::Core, "admin/reports", token).await?;
        Ok(envelope::list(body, "reports"))
    }

    /// `GET /admin/report/{id}`.
    pub async fn get_report(&self, token: &str, id: &str) -> Result<Report, BackendError> {
        let body = self.get(Service::Core, &format!("admin/report/{id}"), token).await?;
        envelope::object(body, "report")
    }

    /// `PUT /admin/handle/{id}`: approve or reject with a mandatory comment.
    pub async fn handle_report(
        &self,
        token: &str,
        id: &str,
        action: ReportAction,
        admin_comment: &str,
    ) -> Result<Value, BackendError> {
        self.put(
            Service::Core,
            &format!("admin/handle/{id}"),
            token,
            &json!({ "action": action, "adminComment": admin_comment }),
        )
        .await
    }

    // -- Issued warnings --

    /// `GET /admin/warnings`.
    pub async fn list_warnings(&self, token: &str) -> Result<Vec<Warning>, BackendError> {
        let body = self.get(Service::Core, "admin/warnings", token).await?;
        Ok(envelope::list(body, "warnings"))
    }

    // -- Warning guidelines --

    pub async fn list_warning_guidelines(&self, token: &str) -> Result<Vec<WarningGuideline>, BackendError> {
        let body = self.get(Service::Social, "getall-warnings", token).await?;
        Ok(envelope::list(body, "warnings"))
    }

    pub async fn create_warning_guideline(
        &self,
        token: &str,
        kind: &str,
        description: &[String],
    ) -> Result<Value, BackendError> {
        self.post(
            Service::Social,
            "create-warning",
            Some(token),
            &json!({ "type": kind, "description": description }),
        )
        .await
    }

    pub async fn update_warning_guideline(
        &self,
        token: &str,
        id: &str,
        kind: &str,
        description: &[String],
    ) -> Result<Value, BackendError> {
        self.put(
            Service::Social,
            &format!("update-warning/{id}"),
            token,
            &json!({ "type": kind, "description": description }),
        )
        .await
    }

    pub async fn delete_warning_guideline(&self, token: &str, id: &str) -> Result<(), BackendError> {
        self.delete(Service::Social, &format!("delete-warning/{id}"), token).await?;
        Ok(())
    }
}
