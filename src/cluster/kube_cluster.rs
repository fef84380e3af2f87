//! Kubernetes API adapter
//!
//! Talks to the API server through `kube::Api` handles scoped to one namespace.

use crate::domain::ports::ClusterApi;
use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod};
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// =============================================================================
// Connection
// =============================================================================

/// Where to load cluster credentials from
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Explicit kubeconfig file; `None` infers in-cluster or default config
    pub kubeconfig: Option<PathBuf>,
    /// Context to select from the kubeconfig
    pub context: Option<String>,
}

/// `$HOME/.kube/config`, if a home directory is known
pub fn default_kubeconfig_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kube").join("config"))
}

/// Parse a kubeconfig file into a client config
pub async fn load_kubeconfig(path: &Path, context: Option<&str>) -> Result<Config> {
    let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
        Error::Kubeconfig(format!("Failed to read {}: {}", path.display(), e))
    })?;

    Config::from_custom_kubeconfig(
        kubeconfig,
        &KubeConfigOptions {
            context: context.map(String::from),
            ..Default::default()
        },
    )
    .await
    .map_err(|e| Error::Kubeconfig(format!("Failed to create config: {}", e)))
}

async fn build_config(options: &ConnectOptions) -> Result<Config> {
    match &options.kubeconfig {
        Some(path) => {
            debug!("Loading kubeconfig from {}", path.display());
            load_kubeconfig(path, options.context.as_deref()).await
        }
        None => {
            debug!("No kubeconfig given, inferring cluster config");
            Config::infer()
                .await
                .map_err(|e| Error::Kubeconfig(format!("Failed to infer config: {}", e)))
        }
    }
}

// =============================================================================
// Kube Cluster
// =============================================================================

/// Cluster adapter backed by the Kubernetes API
pub struct KubeCluster {
    namespace: String,
    claims: Api<PersistentVolumeClaim>,
    pods: Api<Pod>,
}

impl KubeCluster {
    /// Build a client from the given options and scope it to `namespace`
    pub async fn connect(options: &ConnectOptions, namespace: &str) -> Result<Self> {
        let config = build_config(options).await?;
        info!("Connecting to cluster at {}", config.cluster_url);

        let client = Client::try_from(config)?;
        Ok(Self::with_client(client, namespace))
    }

    pub fn with_client(client: Client, namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            claims: Api::namespaced(client.clone(), namespace),
            pods: Api::namespaced(client, namespace),
        }
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create_claim(&self, claim: &PersistentVolumeClaim) -> Result<PersistentVolumeClaim> {
        debug!("POST PersistentVolumeClaim {:?}", claim.metadata.name);
        Ok(self.claims.create(&PostParams::default(), claim).await?)
    }

    async fn list_claims(&self) -> Result<Vec<PersistentVolumeClaim>> {
        let list = self.claims.list(&ListParams::default()).await?;
        debug!("Listed {} claims in {}", list.items.len(), self.namespace);
        Ok(list.items)
    }

    async fn delete_claim(&self, name: &str, params: &DeleteParams) -> Result<()> {
        debug!("DELETE PersistentVolumeClaim {}", name);
        // Left(obj) means deletion is pending on finalizers; both count as accepted.
        self.claims.delete(name, params).await?;
        Ok(())
    }

    async fn create_pod(&self, pod: &Pod) -> Result<Pod> {
        debug!("POST Pod {:?}", pod.metadata.name);
        Ok(self.pods.create(&PostParams::default(), pod).await?)
    }

    async fn delete_pod(&self, name: &str, params: &DeleteParams) -> Result<()> {
        debug!("DELETE Pod {}", name);
        self.pods.delete(name, params).await?;
        Ok(())
    }
}
