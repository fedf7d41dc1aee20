use serde_json::{Value, json};

use mustivibes_types::api::{CoinConversionInput, DeductionRuleInput, PackageInput};
use mustivibes_types::models::{CoinConversion, CoinPackage, DeductionRule, ReferralConfig};

use crate::client::{BackendClient, Service};
use crate::envelope;
use crate::error::BackendError;

fn package_body(input: &PackageInput) -> Value {
    json!({
        "coins": input.coins,
        "price": input.price,
        "isActive": input.is_active.unwrap_or(true),
    })
}

fn conversion_body(input: &CoinConversionInput) -> Value {
    json!({
        "coins": input.coins,
        "amount": input.amount,
        "isActive": input.is_active.unwrap_or(true),
    })
}

fn deduction_body(input: &DeductionRuleInput) -> Value {
    json!({
        "callType": input.call_type,
        "coinsPerMinute": input.coins_per_minute,
        "isActive": input.is_active.unwrap_or(true),
    })
}

impl BackendClient {
    // -- Coin packages --

    pub async fn list_packages(&self, token: &str) -> Result<Vec<CoinPackage>, BackendError> {
        let body = self.get(Service::Core, "packages", token).await?;
        Ok(envelope::list(body, "packages"))
    }

    pub async fn create_package(&self, token: &str, input: &PackageInput) -> Result<Value, BackendError> {
        self.post(Service::Core, "packages", Some(token), &package_body(input)).await
    }

    pub async fn update_package(&self, token: &str, id: &str, input: &PackageInput) -> Result<Value, BackendError> {
        self.put(Service::Core, &format!("packages/{id}"), token, &package_body(input)).await
    }

    pub async fn delete_package(&self, token: &str, id: &str) -> Result<(), BackendError> {
        self.delete(Service::Core, &format!("packages/{id}"), token).await?;
        Ok(())
    }

    // -- Referral reward --

    pub async fn list_referral_configs(&self, token: &str) -> Result<Vec<ReferralConfig>, BackendError> {
        let body = self.get(Service::Core, "referral", token).await?;
        Ok(envelope::list(body, "referrals"))
    }

    pub async fn create_referral_config(&self, token: &str, coins: f64) -> Result<Value, BackendError> {
        self.post(Service::Core, "referral", Some(token), &json!({ "coins": coins })).await
    }

    pub async fn update_referral_config(&self, token: &str, id: &str, coins: f64) -> Result<Value, BackendError> {
        self.put(Service::Core, &format!("referral/{id}"), token, &json!({ "coins": coins })).await
    }

    pub async fn delete_referral_config(&self, token: &str, id: &str) -> Result<(), BackendError> {
        self.delete(Service::Core, &format!("referral/{id}"), token).await?;
        Ok(())
    }

    // -- Coin conversion --

    pub async fn list_coin_conversions(&self, token: &str) -> Result<Vec<CoinConversion>, BackendError> {
        let body = self.get(Service::Core, "coin-conversion", token).await?;
        Ok(envelope::list(body, "conversions"))
    }

    pub async fn create_coin_conversion(&self, token: &str, input: &CoinConversionInput) -> Result<Value, BackendError> {
        self.post(Service::Core, "coin-conversion", Some(token), &conversion_body(input)).await
    }

    pub async fn update_coin_conversion(
        &self,
        token: &str,
        id: &str,
        input: &CoinConversionInput,
    ) -> Result<Value, BackendError> {
        self.put(Service::Core, &format!("coin-conversion/{id}"), token, &conversion_body(input)).await
    }

    pub async fn delete_coin_conversion(&self, token: &str, id: &str) -> Result<(), BackendError> {
        self.delete(Service::Core, &format!("coin-conversion/{id}"), token).await?;
        Ok(())
    }

    // -- Call deduction rules --

    pub async fn list_deduction_rules(&self, token: &str) -> Result<Vec<DeductionRule>, BackendError> {
        let body = self.get(Service::Core, "deduction-rules", token).await?;
        Ok(envelope::list(body, "rules"))
    }

    pub async fn create_deduction_rule(&self, token: &str, input: &DeductionRuleInput) -> Result<Value, BackendError> {
        self.post(Service::Core, "deduction-rules", Some(token), &deduction_body(input)).await
    }

    pub async fn update_deduction_rule(
        &self,
        token: &str,
        id: &str,
        input: &DeductionRuleInput,
    ) -> Result<Value, BackendError> {
        self.put(Service::Core, &format!("deduction-rules/{id}"), token, &deduction_body(input)).await
    }

    pub async fn delete_deduction_rule(&self, token: &str, id: &str) -> Result<(), BackendError> {
        self.delete(Service::Core, &format!("deduction-rules/{id}"), token).await?;
        Ok(())
    }
}
