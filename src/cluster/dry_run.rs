//! Dry-run cluster adapter
//!
//! Renders every mutating request as a YAML document instead of sending it,
//! and keeps created objects in memory so that listing and deletion behave
//! like a real API server would for this workload.

use crate::domain::ports::ClusterApi;
use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod};
use kube::api::DeleteParams;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;
use tokio::sync::RwLock;
use tracing::debug;

const KIND_CLAIM: &str = "PersistentVolumeClaim";
const KIND_POD: &str = "Pod";

/// Cluster adapter that never leaves the process
pub struct DryRunCluster {
    namespace: String,
    out: Mutex<Box<dyn Write + Send>>,
    claims: RwLock<BTreeMap<String, PersistentVolumeClaim>>,
    pods: RwLock<BTreeMap<String, Pod>>,
}

impl DryRunCluster {
    /// Render to stdout
    pub fn new(namespace: &str) -> Self {
        Self::with_writer(namespace, Box::new(std::io::stdout()))
    }

    pub fn with_writer(namespace: &str, out: Box<dyn Write + Send>) -> Self {
        Self {
            namespace: namespace.to_string(),
            out: Mutex::new(out),
            claims: RwLock::new(BTreeMap::new()),
            pods: RwLock::new(BTreeMap::new()),
        }
    }

    fn emit(&self, text: &str) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("dry-run output poisoned")))?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn render_create<T: Serialize>(&self, kind: &str, name: &str, object: &T) -> Result<()> {
        let body = serde_yaml::to_string(object)?;
        self.emit(&format!(
            "---\n# create {} {}/{}\n{}",
            kind, self.namespace, name, body
        ))
    }

    fn render_delete(&self, kind: &str, name: &str, params: &DeleteParams) -> Result<()> {
        self.emit(&format!(
            "---\n# delete {} {}/{} propagationPolicy={:?}\n",
            kind, self.namespace, name, params.propagation_policy
        ))
    }
}

fn object_name(kind: &str, name: Option<&String>) -> Result<String> {
    name.cloned()
        .ok_or_else(|| Error::Configuration(format!("{} without metadata.name", kind)))
}

#[async_trait]
impl ClusterApi for DryRunCluster {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create_claim(&self, claim: &PersistentVolumeClaim) -> Result<PersistentVolumeClaim> {
        let name = object_name(KIND_CLAIM, claim.metadata.name.as_ref())?;
        let mut claims = self.claims.write().await;
        if claims.contains_key(&name) {
            return Err(Error::ResourceExists {
                kind: KIND_CLAIM.into(),
                name,
            });
        }

        let mut stored = claim.clone();
        stored.metadata.namespace = Some(self.namespace.clone());
        self.render_create(KIND_CLAIM, &name, &stored)?;
        claims.insert(name.clone(), stored.clone());

        debug!("Dry-run created claim {}", name);
        Ok(stored)
    }

    async fn list_claims(&self) -> Result<Vec<PersistentVolumeClaim>> {
        Ok(self.claims.read().await.values().cloned().collect())
    }

    async fn delete_claim(&self, name: &str, params: &DeleteParams) -> Result<()> {
        if self.claims.write().await.remove(name).is_none() {
            return Err(Error::ResourceNotFound {
                kind: KIND_CLAIM.into(),
                name: name.into(),
            });
        }
        self.render_delete(KIND_CLAIM, name, params)
    }

    async fn create_pod(&self, pod: &Pod) -> Result<Pod> {
        let name = object_name(KIND_POD, pod.metadata.name.as_ref())?;
        let mut pods = self.pods.write().await;
        if pods.contains_key(&name) {
            return Err(Error::ResourceExists {
                kind: KIND_POD.into(),
                name,
            });
        }

        let mut stored = pod.clone();
        stored.metadata.namespace = Some(self.namespace.clone());
        self.render_create(KIND_POD, &name, &stored)?;
        pods.insert(name.clone(), stored.clone());

        debug!("Dry-run created pod {}", name);
        Ok(stored)
    }

    async fn delete_pod(&self, name: &str, params: &DeleteParams) -> Result<()> {
        if self.pods.write().await.remove(name).is_none() {
            return Err(Error::ResourceNotFound {
                kind: KIND_POD.into(),
                name: name.into(),
            });
        }
        self.render_delete(KIND_POD, name, params)
    }
}
