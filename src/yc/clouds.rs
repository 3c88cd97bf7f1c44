//! Cloud and folder hierarchy
//!
//! Functions for listing clouds and folders and for lazily resolving the
//! scope of a call when the caller did not supply one.

use serde_json::Value;

use crate::error::Result;
use crate::yc::client::YcClient;

/// Cloud information
#[derive(Debug, Clone)]
pub struct Cloud {
    pub id: String,
    pub name: String,
}

impl From<&Value> for Cloud {
    fn from(value: &Value) -> Self {
        Self {
            id: value
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            name: value
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
        }
    }
}

/// Folder information
#[derive(Debug, Clone)]
pub struct Folder {
    pub id: String,
    pub cloud_id: String,
    pub name: String,
    pub status: String,
}

impl From<&Value> for Folder {
    fn from(value: &Value) -> Self {
        Self {
            id: value
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            cloud_id: value
                .get("cloudId")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            name: value
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            status: value
                .get("status")
                .and_then(|v| v.as_str())
                .unwrap_or("UNKNOWN")
                .to_string(),
        }
    }
}

/// List all clouds visible to this identity. An empty list is a valid
/// result, not an error.
pub async fn list_clouds(client: &YcClient) -> Result<Vec<Cloud>> {
    let url = client.resource_manager_url("clouds");
    let items = client.get_paginated(&url, &[], "clouds").await?;
    Ok(items.iter().map(Cloud::from).collect())
}

/// List folders of a cloud. With no cloud id given, the first visible
/// cloud is discovered and used.
pub async fn list_folders(client: &YcClient, cloud_id: Option<&str>) -> Result<Vec<Folder>> {
    let cloud_id = match cloud_id {
        Some(id) => id.to_string(),
        None => match resolve_cloud_id(client).await? {
            Some(id) => id,
            None => {
                tracing::debug!("no cloud visible to this identity, no folders to list");
                return Ok(Vec::new());
            }
        },
    };

    let url = client.resource_manager_url("folders");
    let items = client
        .get_paginated(&url, &[("cloudId", cloud_id.as_str())], "folders")
        .await?;
    Ok(items.iter().map(Folder::from).collect())
}

/// Fetch one folder's details.
pub async fn get_folder(client: &YcClient, folder_id: &str) -> Result<Folder> {
    let url = client.resource_manager_url(&format!("folders/{}", folder_id));
    let response = client.get(&url, &[]).await?;
    Ok(Folder::from(&response))
}

/// Resolve the cloud scope: credentials default, else first visible cloud.
pub async fn resolve_cloud_id(client: &YcClient) -> Result<Option<String>> {
    if let Some(id) = client.credentials.cloud_id.clone() {
        return Ok(Some(id));
    }
    Ok(list_clouds(client).await?.into_iter().next().map(|c| c.id))
}

/// Resolve the folder scope: credentials default, else first folder of the
/// resolved cloud.
pub async fn resolve_folder_id(client: &YcClient) -> Result<Option<String>> {
    if let Some(id) = client.credentials.folder_id.clone() {
        return Ok(Some(id));
    }
    Ok(list_folders(client, None)
        .await?
        .into_iter()
        .next()
        .map(|f| f.id))
}

/// Resolve the identity's own home folder via the service-account lookup
/// endpoint. Returns `None` when the key material carries no service
/// account id to look up.
pub async fn home_folder_id(client: &YcClient) -> Result<Option<String>> {
    let Some(account_id) = client.credentials.service_account_id() else {
        tracing::debug!("no structured service account key, cannot look up home folder");
        return Ok(None);
    };

    let url = client.iam_url(&format!("serviceAccounts/{}", account_id));
    let response = client.get(&url, &[]).await?;

    Ok(response
        .get("folderId")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string()))
}
