//! Full identity-graph traversal.
//!
//! The [`SyncEngine`] walks the connector's syncers the same way the
//! governance engine does:
//!
//! 1. List top-level resources (parent `None`) from every syncer.
//! 2. For each resource that declares child types, list those children.
//! 3. Collect entitlements and grants for every resource found.
//!
//! Calls run one after another. Any error aborts the cycle; nothing is
//! cached between cycles.

use std::collections::VecDeque;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::connector::{ResourceSyncer, Syncer, TableauConnector};
use crate::errors::SyncError;
use crate::models::{Entitlement, Grant, IdentityGraph, ListPage, Resource, ResourceId, ResourceType};

/// Statistics from a single sync cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStats {
    pub resources: usize,
    pub entitlements: usize,
    pub grants: usize,
    pub unresolved_grants: usize,
    pub started_at: String,
    pub completed_at: Option<String>,
}

pub struct SyncEngine {
    syncers: Vec<Syncer>,
}

impl SyncEngine {
    pub fn new(connector: &TableauConnector) -> Self {
        Self::with_syncers(connector.resource_syncers())
    }

    pub fn with_syncers(syncers: Vec<Syncer>) -> Self {
        info!(count = syncers.len(), "initializing sync engine");
        Self { syncers }
    }

    fn syncer_for(&self, resource_type: ResourceType) -> Option<&Syncer> {
        self.syncers
            .iter()
            .find(|s| s.resource_type() == resource_type)
    }

    /// Execute one full traversal and return the graph it produced.
    pub async fn run_sync_cycle(&self) -> Result<(IdentityGraph, SyncStats), SyncError> {
        let mut stats = SyncStats {
            started_at: Utc::now().to_rfc3339(),
            ..Default::default()
        };
        let mut graph = IdentityGraph::default();

        // Top-level resources first, then their children.
        let mut pending: VecDeque<Resource> = VecDeque::new();
        for syncer in &self.syncers {
            pending.extend(list_all(syncer, None).await?);
        }
        while let Some(resource) = pending.pop_front() {
            for child_type in &resource.child_resource_types {
                if let Some(child_syncer) = self.syncer_for(*child_type) {
                    let children = list_all(child_syncer, Some(&resource.id)).await?;
                    debug!(parent = %resource.id, child_type = %child_type, count = children.len(), "listed children");
                    pending.extend(children);
                }
            }
            graph.resources.push(resource);
        }

        for resource in &graph.resources {
            let Some(syncer) = self.syncer_for(resource.resource_type()) else {
                continue;
            };
            graph
                .entitlements
                .extend(entitlements_all(syncer, resource).await?);
            graph.grants.extend(grants_all(syncer, resource).await?);
        }

        stats.resources = graph.resources.len();
        stats.entitlements = graph.entitlements.len();
        stats.grants = graph.grants.len();
        stats.unresolved_grants = graph.grants.iter().filter(|g| !g.is_resolved()).count();
        stats.completed_at = Some(Utc::now().to_rfc3339());

        info!(
            resources = stats.resources,
            entitlements = stats.entitlements,
            grants = stats.grants,
            unresolved_grants = stats.unresolved_grants,
            "sync cycle complete"
        );
        Ok((graph, stats))
    }
}

// Each helper follows continuation tokens until the syncer reports none.

async fn list_all(syncer: &Syncer, parent: Option<&ResourceId>) -> Result<Vec<Resource>, SyncError> {
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let ListPage { items: page, next_page_token } =
            syncer.list(parent, token.as_deref()).await?;
        items.extend(page);
        match next_page_token.filter(|t| !t.is_empty()) {
            Some(next) => token = Some(next),
            None => return Ok(items),
        }
    }
}

async fn entitlements_all(syncer: &Syncer, resource: &Resource) -> Result<Vec<Entitlement>, SyncError> {
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let ListPage { items: page, next_page_token } =
            syncer.entitlements(resource, token.as_deref()).await?;
        items.extend(page);
        match next_page_token.filter(|t| !t.is_empty()) {
            Some(next) => token = Some(next),
            None => return Ok(items),
        }
    }
}

async fn grants_all(syncer: &Syncer, resource: &Resource) -> Result<Vec<Grant>, SyncError> {
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let ListPage { items: page, next_page_token } =
            syncer.grants(resource, token.as_deref()).await?;
        items.extend(page);
        match next_page_token.filter(|t| !t.is_empty()) {
            Some(next) => token = Some(next),
            None => return Ok(items),
        }
    }
}
