use mustivibes_types::models::Payment;

use crate::client::{BackendClient, Service};
use crate::envelope;
use crate::error::BackendError;

impl BackendClient {
    /// `GET /get/payments`.
    pub async fn list_payments(&self, token: &str) -> Result<Vec<Payment>, BackendError> {
        let body = self.get(Service::Core, "get/payments", token).await?;
        Ok(envelope::list(body, "payments"))
    }
}
