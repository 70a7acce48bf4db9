//! The registry proper: resolution, per-role probing, and status fan-out.

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use crate::probe::{HttpProbe, Probe, ProbeError};
use crate::role::{RoleSpec, RoleTable};

/// Resolved network target for a role. Computed on demand, never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u32,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u32) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Health and inventory of one role's server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoleStatus {
    pub port: u32,
    pub model: String,
    pub healthy: bool,
    pub models: Vec<String>,
}

/// Snapshot of every configured role, keyed by role name. Built fresh on
/// each [`RoleRegistry::get_status`] call and never cached.
pub type StatusReport = HashMap<String, RoleStatus>;

/// Maps symbolic role names to network targets and aggregates health and
/// inventory across all of them.
///
/// The table and host are fixed at construction; every operation is
/// stateless given those. The fail-soft methods ([`check_health`],
/// [`list_models`], [`get_status`]) never propagate an error, so the
/// registry is safe to poll from a loop.
///
/// [`check_health`]: RoleRegistry::check_health
/// [`list_models`]: RoleRegistry::list_models
/// [`get_status`]: RoleRegistry::get_status
pub struct RoleRegistry {
    host: String,
    table: RoleTable,
    probe: Arc<dyn Probe>,
}

impl RoleRegistry {
    pub fn new(host: impl Into<String>, table: RoleTable) -> Self {
        Self {
            host: host.into(),
            table,
            probe: Arc::new(HttpProbe::new()),
        }
    }

    /// Standard table with the host taken from `OLLAMA_ROLES_HOST`,
    /// defaulting to `localhost`.
    pub fn from_env() -> Self {
        let host = env::var("OLLAMA_ROLES_HOST").unwrap_or_else(|_| "localhost".into());
        Self::new(host, RoleTable::standard())
    }

    /// Substitute the probe implementation. Used by tests.
    pub fn with_probe(mut self, probe: Arc<dyn Probe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn table(&self) -> &RoleTable {
        &self.table
    }

    /// Look up a role's port and model. `None` for unknown roles; no
    /// network traffic either way.
    pub fn resolve(&self, role: &str) -> Option<&RoleSpec> {
        self.table.get(role)
    }

    /// Resolved (host, port) pair for a role.
    pub fn target(&self, role: &str) -> Option<Target> {
        self.resolve(role)
            .map(|spec| Target::new(self.host.clone(), spec.port))
    }

    /// Liveness of the server on `port`, with the failure cause intact.
    pub async fn try_check_health(&self, port: u32) -> Result<(), ProbeError> {
        let target = Target::new(self.host.clone(), port);
        self.probe.liveness(&target).await
    }

    /// Liveness of the server on `port`. Any failure, including timeouts
    /// and non-200 responses, folds into `false`.
    pub async fn check_health(&self, port: u32) -> bool {
        match self.try_check_health(port).await {
            Ok(()) => true,
            Err(err) => {
                debug!(port, %err, "health probe failed");
                false
            }
        }
    }

    /// Models loaded on the server on `port`, in the server's order, with
    /// the failure cause intact.
    pub async fn try_list_models(&self, port: u32) -> Result<Vec<String>, ProbeError> {
        let target = Target::new(self.host.clone(), port);
        self.probe.inventory(&target).await
    }

    /// Models loaded on the server on `port`. Any failure folds into an
    /// empty list. The order is whatever the server returned.
    pub async fn list_models(&self, port: u32) -> Vec<String> {
        match self.try_list_models(port).await {
            Ok(models) => models,
            Err(err) => {
                debug!(port, %err, "inventory probe failed");
                Vec::new()
            }
        }
    }

    /// Probe every configured role and merge the results into one report.
    ///
    /// Roles are probed independently and concurrently; one unreachable
    /// server never aborts the others. An unhealthy role records an empty
    /// model list without an inventory call, since the server is already
    /// known to be down.
    pub async fn get_status(&self) -> StatusReport {
        let probes = self.table.iter().map(|entry| async move {
            let healthy = self.check_health(entry.spec.port).await;
            let models = if healthy {
                self.list_models(entry.spec.port).await
            } else {
                Vec::new()
            };
            (
                entry.name.clone(),
                RoleStatus {
                    port: entry.spec.port,
                    model: entry.spec.model.clone(),
                    healthy,
                    models,
                },
            )
        });
        join_all(probes).await.into_iter().collect()
    }
}
