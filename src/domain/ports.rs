//! Domain Ports - the seams between the sequencer and the outside world
//!
//! The cluster and the operator's terminal are both external collaborators.
//! Adapters in [`crate::cluster`] and [`crate::gate`] implement these traits.

use crate::error::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod};
use kube::api::DeleteParams;
use std::sync::Arc;

// =============================================================================
// Cluster API Port
// =============================================================================

/// Namespaced create/list/delete over claims and pods.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Namespace every call is scoped to
    fn namespace(&self) -> &str;

    /// Create a claim, returning the object as stored
    async fn create_claim(&self, claim: &PersistentVolumeClaim) -> Result<PersistentVolumeClaim>;

    /// List every claim in the namespace
    async fn list_claims(&self) -> Result<Vec<PersistentVolumeClaim>>;

    /// Delete a claim by name
    async fn delete_claim(&self, name: &str, params: &DeleteParams) -> Result<()>;

    /// Create a pod, returning the object as stored
    async fn create_pod(&self, pod: &Pod) -> Result<Pod>;

    /// Delete a pod by name
    async fn delete_pod(&self, name: &str, params: &DeleteParams) -> Result<()>;
}

// =============================================================================
// Operator Gate Port
// =============================================================================

/// Blocks until the operator allows the next step
#[async_trait]
pub trait Gate: Send {
    async fn confirm(&mut self) -> Result<()>;
}

// =============================================================================
// Type Aliases for Arc'd Traits
// =============================================================================

pub type ClusterApiRef = Arc<dyn ClusterApi>;
