//! Yandex Cloud client
//!
//! Main client for interacting with Yandex Cloud APIs, combining
//! authentication and HTTP functionality.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::yc::auth::{Credentials, IamTokenProvider};
use crate::yc::http::HttpClient;

/// Base URLs of the per-service control-plane endpoints.
///
/// Defaults point at the public API; tests aim every service at one mock
/// server via [`Endpoints::with_base`].
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub iam: Url,
    pub resource_manager: Url,
    pub compute: Url,
    pub vpc: Url,
    pub monitoring: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        let parse = |raw: &str| Url::parse(raw).expect("static endpoint URL is valid");
        Self {
            iam: parse("https://iam.api.cloud.yandex.net"),
            resource_manager: parse("https://resource-manager.api.cloud.yandex.net"),
            compute: parse("https://compute.api.cloud.yandex.net"),
            vpc: parse("https://vpc.api.cloud.yandex.net"),
            monitoring: parse("https://monitoring.api.cloud.yandex.net"),
        }
    }
}

impl Endpoints {
    /// Point every service at a single base URL.
    pub fn with_base(base: &str) -> std::result::Result<Self, url::ParseError> {
        let base = Url::parse(base)?;
        Ok(Self {
            iam: base.clone(),
            resource_manager: base.clone(),
            compute: base.clone(),
            vpc: base.clone(),
            monitoring: base,
        })
    }
}

/// Main Yandex Cloud client
#[derive(Clone)]
pub struct YcClient {
    pub credentials: Credentials,
    pub auth: IamTokenProvider,
    pub http: HttpClient,
    pub endpoints: Endpoints,
}

impl YcClient {
    /// Create a new client against the public API.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_endpoints(credentials, Endpoints::default())
    }

    /// Create a new client against explicit endpoints.
    pub fn with_endpoints(credentials: Credentials, endpoints: Endpoints) -> Result<Self> {
        let http = HttpClient::new()?;
        let auth = IamTokenProvider::new(
            credentials.clone(),
            http.clone(),
            format!("{}iam/v1/tokens", endpoints.iam),
        );

        Ok(Self {
            credentials,
            auth,
            http,
            endpoints,
        })
    }

    /// Get the current IAM token.
    pub async fn get_token(&self) -> Result<String> {
        self.auth.get_token().await
    }

    /// Make an authenticated GET request.
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.get(url, &token, query).await
    }

    /// Make an authenticated POST request with a custom timeout.
    pub async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &Value,
        timeout: Duration,
    ) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.post(url, &token, query, body, timeout).await
    }

    /// GET a paginated listing, following `nextPageToken` until exhausted,
    /// and collect the records under `items_field`.
    pub async fn get_paginated(
        &self,
        url: &str,
        query: &[(&str, &str)],
        items_field: &str,
    ) -> Result<Vec<Value>> {
        let mut all_items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut page_query: Vec<(&str, &str)> = query.to_vec();
            if let Some(token) = page_token.as_deref() {
                page_query.push(("pageToken", token));
            }

            let response = self.get(url, &page_query).await?;

            if let Some(items) = response.get(items_field).and_then(|v| v.as_array()) {
                all_items.extend(items.iter().cloned());
            }

            page_token = response
                .get("nextPageToken")
                .and_then(|v| v.as_str())
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string());

            if page_token.is_none() {
                break;
            }
        }

        Ok(all_items)
    }

    // =========================================================================
    // Service URL helpers
    // =========================================================================

    /// Build an IAM API URL.
    pub fn iam_url(&self, path: &str) -> String {
        format!("{}iam/v1/{}", self.endpoints.iam, path)
    }

    /// Build a Resource Manager API URL.
    pub fn resource_manager_url(&self, path: &str) -> String {
        format!("{}resource-manager/v1/{}", self.endpoints.resource_manager, path)
    }

    /// Build a Compute API URL.
    pub fn compute_url(&self, path: &str) -> String {
        format!("{}compute/v1/{}", self.endpoints.compute, path)
    }

    /// Build a VPC API URL.
    pub fn vpc_url(&self, path: &str) -> String {
        format!("{}vpc/v1/{}", self.endpoints.vpc, path)
    }

    /// Build a Monitoring API URL.
    pub fn monitoring_url(&self, path: &str) -> String {
        format!("{}monitoring/v2/{}", self.endpoints.monitoring, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_are_per_service() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.iam.host_str(), Some("iam.api.cloud.yandex.net"));
        assert_eq!(
            endpoints.monitoring.host_str(),
            Some("monitoring.api.cloud.yandex.net")
        );
    }

    #[test]
    fn url_helpers_join_cleanly() {
        let client = YcClient::with_endpoints(
            Credentials::default(),
            Endpoints::with_base("http://127.0.0.1:8080").unwrap(),
        )
        .unwrap();

        assert_eq!(
            client.compute_url("instances"),
            "http://127.0.0.1:8080/compute/v1/instances"
        );
        assert_eq!(
            client.iam_url("serviceAccounts/sa-1"),
            "http://127.0.0.1:8080/iam/v1/serviceAccounts/sa-1"
        );
    }
}
