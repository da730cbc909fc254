//! Platform-side API client methods.
//!
//! Payload schemas are owned by the endpoints; bodies pass through as
//! opaque JSON.

use super::{ApiClient, ClientError};
use reqwest::Method;
use serde_json::Value;

impl ApiClient {
    /// List merchants.
    pub async fn list_merchants(&self, params: &Value) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/platform/merchants").query(params);
        self.execute(request).await
    }

    /// Create a merchant.
    pub async fn create_merchant(&self, data: &Value) -> Result<Value, ClientError> {
        let request = self.request(Method::POST, "/platform/merchants").json(data);
        self.execute(request).await
    }

    /// Update a merchant.
    pub async fn update_merchant(&self, id: u64, data: &Value) -> Result<Value, ClientError> {
        let request = self
            .request(Method::PUT, &format!("/platform/merchants/{id}"))
            .json(data);
        self.execute(request).await
    }

    /// Delete a merchant.
    pub async fn delete_merchant(&self, id: u64) -> Result<Value, ClientError> {
        let request = self.request(Method::DELETE, &format!("/platform/merchants/{id}"));
        self.execute(request).await
    }

    /// Get the verification rule set.
    pub async fn get_rules(&self) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/platform/rules");
        self.execute(request).await
    }

    /// Update the verification rule set.
    pub async fn update_rule(&self, data: &Value) -> Result<Value, ClientError> {
        let request = self.request(Method::PUT, "/platform/rules").json(data);
        self.execute(request).await
    }

    /// Platform-wide statistics.
    pub async fn platform_statistics(&self) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/platform/statistics");
        self.execute(request).await
    }
}
