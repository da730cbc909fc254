//! Merchant-side API client methods.

use super::{ApiClient, ClientError};
use reqwest::Method;
use serde_json::Value;

impl ApiClient {
    /// List code batches.
    pub async fn list_batches(&self, params: &Value) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/merchant/batches").query(params);
        self.execute(request).await
    }

    /// Create a code batch.
    pub async fn create_batch(&self, data: &Value) -> Result<Value, ClientError> {
        let request = self.request(Method::POST, "/merchant/batches").json(data);
        self.execute(request).await
    }

    /// Delete a code batch.
    pub async fn delete_batch(&self, id: u64) -> Result<Value, ClientError> {
        let request = self.request(Method::DELETE, &format!("/merchant/batches/{id}"));
        self.execute(request).await
    }

    /// List anti-counterfeit codes.
    pub async fn list_codes(&self, params: &Value) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/merchant/codes").query(params);
        self.execute(request).await
    }

    /// Generate codes into a new batch.
    pub async fn generate_codes(&self, data: &Value) -> Result<Value, ClientError> {
        let request = self.request(Method::POST, "/merchant/codes/generate").json(data);
        self.execute(request).await
    }

    /// Export the codes of a batch.
    pub async fn export_codes(&self, batch_id: u64) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, &format!("/merchant/codes/export/{batch_id}"));
        self.execute(request).await
    }

    /// Merchant statistics.
    pub async fn merchant_statistics(&self) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, "/merchant/statistics");
        self.execute(request).await
    }
}
