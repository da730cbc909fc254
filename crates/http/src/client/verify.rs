//! Public verification API client methods. No session required; the request
//! stage stamps a token only when one is present.

use super::{ApiClient, ClientError};
use reqwest::Method;
use serde_json::{json, Value};

impl ApiClient {
    /// Verify a single anti-counterfeit code.
    pub async fn verify_code(&self, code: &str) -> Result<Value, ClientError> {
        let request = self
            .request(Method::POST, "/verify")
            .json(&json!({ "code": code }));
        self.execute(request).await
    }

    /// Verify a batch of codes in one call.
    pub async fn batch_verify(&self, codes: &[String]) -> Result<Value, ClientError> {
        let request = self
            .request(Method::POST, "/verify/batch")
            .json(&json!({ "codes": codes }));
        self.execute(request).await
    }
}
