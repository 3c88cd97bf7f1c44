//! Resource kind registry
//!
//! Static table of the resource types the inventory walk enumerates: which
//! service hosts them, and which response field carries the records.

use crate::yc::client::YcClient;

/// A resource type the discovery walk knows how to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Instances,
    Disks,
    Networks,
    Subnets,
}

impl ResourceKind {
    /// Every kind, in the order the walk lists them.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Instances,
        ResourceKind::Disks,
        ResourceKind::Networks,
        ResourceKind::Subnets,
    ];

    /// Stable key, also the listing path segment and the response field the
    /// provider nests the records under.
    pub fn key(&self) -> &'static str {
        match self {
            ResourceKind::Instances => "instances",
            ResourceKind::Disks => "disks",
            ResourceKind::Networks => "networks",
            ResourceKind::Subnets => "subnets",
        }
    }

    /// Look a kind up by its key (for CLI arguments).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// Listing URL of this kind on the service that hosts it.
    pub fn list_url(&self, client: &YcClient) -> String {
        match self {
            ResourceKind::Instances | ResourceKind::Disks => client.compute_url(self.key()),
            ResourceKind::Networks | ResourceKind::Subnets => client.vpc_url(self.key()),
        }
    }
}
