//! Resource discovery
//!
//! Walks the cloud → folder hierarchy and enumerates typed resource lists,
//! degrading per folder instead of aborting the whole walk. When no cloud
//! is visible at all (narrow, folder-scoped permissions), discovery falls
//! back to the identity's own home folder.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::inventory::kinds::ResourceKind;
use crate::yc::client::YcClient;
use crate::yc::clouds::{self, Folder};

/// Everything discovered in one folder. A kind that failed to list is
/// present with zero records plus an entry in `errors`.
#[derive(Debug, Clone, Serialize)]
pub struct FolderInventory {
    pub folder_id: String,
    pub folder_name: String,
    pub resources: BTreeMap<&'static str, Vec<Value>>,
    pub total: usize,
    pub errors: Vec<String>,
}

/// One cloud's folders and their contents.
#[derive(Debug, Clone, Serialize)]
pub struct CloudInventory {
    pub cloud_id: String,
    pub cloud_name: String,
    pub folders: Vec<FolderInventory>,
}

/// Aggregate result of a full hierarchy walk.
///
/// `partial` marks soft failures that produced an empty or incomplete
/// aggregate without raising (for example a failed home-folder lookup).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoverySummary {
    pub clouds: Vec<CloudInventory>,
    pub total_resources: usize,
    pub errors: Vec<String>,
    pub partial: bool,
}

impl DiscoverySummary {
    fn recount(&mut self) {
        self.total_resources = self
            .clouds
            .iter()
            .flat_map(|c| c.folders.iter())
            .map(|f| f.total)
            .sum();
    }
}

/// List one resource kind in a folder. With no folder id given, the first
/// folder of the first cloud is resolved and used. Every returned record
/// is annotated with the folder id it was found under.
pub async fn list_resources(
    client: &YcClient,
    kind: ResourceKind,
    folder_id: Option<&str>,
) -> Result<Vec<Value>> {
    let folder_id = match folder_id {
        Some(id) => id.to_string(),
        None => clouds::resolve_folder_id(client)
            .await?
            .ok_or(Error::NoFolder)?,
    };

    list_in_folder(client, kind, &folder_id).await
}

async fn list_in_folder(
    client: &YcClient,
    kind: ResourceKind,
    folder_id: &str,
) -> Result<Vec<Value>> {
    let url = kind.list_url(client);
    let mut items = client
        .get_paginated(&url, &[("folderId", folder_id)], kind.key())
        .await?;

    // Callers must not infer containment from list order.
    for item in &mut items {
        if let Value::Object(map) = item {
            map.insert(
                "folderId".to_string(),
                Value::String(folder_id.to_string()),
            );
        }
    }

    Ok(items)
}

/// Walk the full hierarchy: every visible cloud, every folder in it, every
/// resource kind in each folder.
pub async fn discover_all(client: &YcClient) -> DiscoverySummary {
    let mut summary = DiscoverySummary::default();

    let visible_clouds = match clouds::list_clouds(client).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("cloud listing failed: {}", e);
            summary.errors.push(format!("cloud listing: {}", e));
            Vec::new()
        }
    };

    if visible_clouds.is_empty() {
        return discover_home_folder(client, summary).await;
    }

    for cloud in visible_clouds {
        let mut inventory = CloudInventory {
            cloud_id: cloud.id.clone(),
            cloud_name: cloud.name,
            folders: Vec::new(),
        };

        match clouds::list_folders(client, Some(&cloud.id)).await {
            Ok(folders) => {
                for folder in folders {
                    inventory
                        .folders
                        .push(inventory_for_folder(client, &folder).await);
                }
            }
            Err(e) => {
                tracing::warn!("folder listing for cloud {} failed: {}", cloud.id, e);
                summary
                    .errors
                    .push(format!("folder listing for cloud {}: {}", cloud.id, e));
            }
        }

        summary.clouds.push(inventory);
    }

    summary.recount();
    summary
}

/// Enumerate every kind in one folder, serially. A failing kind
/// contributes zero records plus an inline error marker.
async fn inventory_for_folder(client: &YcClient, folder: &Folder) -> FolderInventory {
    let mut inventory = FolderInventory {
        folder_id: folder.id.clone(),
        folder_name: folder.name.clone(),
        resources: BTreeMap::new(),
        total: 0,
        errors: Vec::new(),
    };

    for kind in ResourceKind::ALL {
        match list_in_folder(client, kind, &folder.id).await {
            Ok(items) => {
                inventory.total += items.len();
                inventory.resources.insert(kind.key(), items);
            }
            Err(e) => {
                tracing::warn!(
                    "listing {} in folder {} failed: {}",
                    kind.key(),
                    folder.id,
                    e
                );
                inventory.resources.insert(kind.key(), Vec::new());
                inventory.errors.push(format!("{}: {}", kind.key(), e));
            }
        }
    }

    inventory
}

/// Fallback path for identities with folder-scoped permissions: resolve
/// the identity's home folder and discover just that one folder. A failed
/// lookup yields an empty aggregate flagged as partial, not an error.
async fn discover_home_folder(
    client: &YcClient,
    mut summary: DiscoverySummary,
) -> DiscoverySummary {
    tracing::info!("no clouds visible, falling back to the identity's home folder");

    let folder_id = match clouds::home_folder_id(client).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            summary.partial = true;
            summary
                .errors
                .push("no clouds visible and no home folder resolvable".to_string());
            return summary;
        }
        Err(e) => {
            tracing::warn!("home folder lookup failed: {}", e);
            summary.partial = true;
            summary.errors.push(format!("home folder lookup: {}", e));
            return summary;
        }
    };

    let folder = match clouds::get_folder(client, &folder_id).await {
        Ok(folder) => folder,
        Err(e) => {
            tracing::warn!("home folder {} details fetch failed: {}", folder_id, e);
            summary.partial = true;
            summary
                .errors
                .push(format!("home folder {} details: {}", folder_id, e));
            return summary;
        }
    };

    let cloud_id = folder.cloud_id.clone();
    let folder_inventory = inventory_for_folder(client, &folder).await;

    summary.clouds.push(CloudInventory {
        cloud_id,
        cloud_name: "-".to_string(),
        folders: vec![folder_inventory],
    });
    summary.recount();
    summary
}
