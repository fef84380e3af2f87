//! Manifest builders for the claims and the consumer Pod
//!
//! Everything here is pure: names are derived from indices and objects are
//! assembled from templates, nothing talks to the cluster.

use k8s_openapi::api::core::v1::{
    Container, PersistentVolumeClaim, PersistentVolumeClaimSpec,
    PersistentVolumeClaimVolumeSource, Pod, PodSpec, SecurityContext, Volume, VolumeMount,
    VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix shared by every claim name
pub const CLAIM_PREFIX: &str = "pvc-";

/// Name of the Pod that holds all claims
pub const CONSUMER_NAME: &str = "hold-massive-pvcs";

pub const DEFAULT_CAPACITY: &str = "1Gi";
pub const DEFAULT_IMAGE: &str = "ubuntu:latest";

const ACCESS_MODE_RWO: &str = "ReadWriteOnce";
const VOLUME_MODE_FILESYSTEM: &str = "Filesystem";
const PULL_IF_NOT_PRESENT: &str = "IfNotPresent";

// =============================================================================
// Index Range
// =============================================================================

/// Inclusive range of claim indices. `start > end` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: i64,
    pub end: i64,
}

impl IndexRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of indices in the range, saturating at `u64::MAX`
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end.abs_diff(self.start).saturating_add(1)
        }
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<i64> {
        self.start..=self.end
    }
}

impl Default for IndexRange {
    fn default() -> Self {
        Self { start: 0, end: 5 }
    }
}

impl std::fmt::Display for IndexRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Fixed shape of every claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTemplate {
    /// Requested storage, as a Kubernetes quantity string
    pub capacity: String,
}

impl Default for ClaimTemplate {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY.to_string(),
        }
    }
}

/// Fixed shape of the consumer Pod
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerTemplate {
    /// Pod name, also used as the container name
    pub name: String,
    pub image: String,
    pub command: Vec<String>,
    pub privileged: bool,
}

impl Default for ConsumerTemplate {
    fn default() -> Self {
        Self {
            name: CONSUMER_NAME.to_string(),
            image: DEFAULT_IMAGE.to_string(),
            command: vec!["/bin/sleep".to_string(), "3600".to_string()],
            privileged: true,
        }
    }
}

// =============================================================================
// Builders
// =============================================================================

pub fn claim_name(index: i64) -> String {
    format!("{}{}", CLAIM_PREFIX, index)
}

/// Claim names for every index in the range, in order
pub fn claim_names(range: IndexRange) -> Vec<String> {
    range.iter().map(claim_name).collect()
}

/// Build a single-writer filesystem claim
pub fn storage_claim(name: &str, template: &ClaimTemplate) -> PersistentVolumeClaim {
    let mut requests = BTreeMap::new();
    requests.insert("storage".to_string(), Quantity(template.capacity.clone()));

    PersistentVolumeClaim {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(vec![ACCESS_MODE_RWO.to_string()]),
            resources: Some(VolumeResourceRequirements {
                requests: Some(requests),
                limits: None,
            }),
            volume_mode: Some(VOLUME_MODE_FILESYSTEM.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Build the consumer Pod with one volume and one mount per claim.
///
/// Each claim is mounted at `/<claim>`.
pub fn consumer_pod(template: &ConsumerTemplate, claims: &[String]) -> Pod {
    let volumes: Vec<Volume> = claims
        .iter()
        .map(|claim| Volume {
            name: claim.clone(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: claim.clone(),
                read_only: None,
            }),
            ..Default::default()
        })
        .collect();

    let mounts: Vec<VolumeMount> = claims
        .iter()
        .map(|claim| VolumeMount {
            name: claim.clone(),
            mount_path: format!("/{}", claim),
            ..Default::default()
        })
        .collect();

    let container = Container {
        name: template.name.clone(),
        image: Some(template.image.clone()),
        image_pull_policy: Some(PULL_IF_NOT_PRESENT.to_string()),
        command: Some(template.command.clone()),
        security_context: Some(SecurityContext {
            privileged: Some(template.privileged),
            ..Default::default()
        }),
        volume_mounts: (!mounts.is_empty()).then_some(mounts),
        ..Default::default()
    };

    Pod {
        metadata: ObjectMeta {
            name: Some(template.name.clone()),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers: vec![container],
            volumes: (!volumes.is_empty()).then_some(volumes),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Claim names referenced by a consumer's container mounts
pub fn mounted_claims(pod: &Pod) -> Vec<String> {
    pod.spec
        .iter()
        .flat_map(|spec| spec.containers.iter())
        .flat_map(|c| c.volume_mounts.iter().flatten())
        .map(|m| m.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_range_len() {
        assert_eq!(IndexRange::new(0, 5).len(), 6);
        assert_eq!(IndexRange::new(3, 3).len(), 1);
        assert_eq!(IndexRange::new(-2, 1).len(), 4);
        assert!(IndexRange::new(4, 3).is_empty());
        assert_eq!(IndexRange::new(4, 3).len(), 0);
        assert_eq!(IndexRange::new(i64::MIN, i64::MAX).len(), u64::MAX);
        assert_eq!(IndexRange::new(i64::MIN, i64::MIN).len(), 1);
    }

    #[test]
    fn test_claim_names_are_distinct_and_ordered() {
        let names = claim_names(IndexRange::new(0, 2));
        assert_eq!(names, vec!["pvc-0", "pvc-1", "pvc-2"]);

        let names = claim_names(IndexRange::new(10, 109));
        let unique: BTreeSet<_> = names.iter().collect();
        assert_eq!(names.len(), 100);
        assert_eq!(unique.len(), 100);

        assert!(claim_names(IndexRange::new(5, 0)).is_empty());
    }

    #[test]
    fn test_storage_claim_shape() {
        let pvc = storage_claim("pvc-7", &ClaimTemplate::default());
        assert_eq!(pvc.metadata.name.as_deref(), Some("pvc-7"));

        let spec = pvc.spec.unwrap();
        assert_eq!(spec.access_modes, Some(vec!["ReadWriteOnce".to_string()]));
        assert_eq!(spec.volume_mode.as_deref(), Some("Filesystem"));
        let requests = spec.resources.unwrap().requests.unwrap();
        assert_eq!(requests.get("storage"), Some(&Quantity("1Gi".into())));
    }

    #[test]
    fn test_consumer_mounts_match_claims() {
        let claims = claim_names(IndexRange::new(3, 6));
        let pod = consumer_pod(&ConsumerTemplate::default(), &claims);

        assert_eq!(pod.metadata.name.as_deref(), Some(CONSUMER_NAME));
        assert_eq!(mounted_claims(&pod), claims);

        let spec = pod.spec.unwrap();
        let volumes = spec.volumes.unwrap();
        assert_eq!(volumes.len(), 4);
        for (volume, claim) in volumes.iter().zip(&claims) {
            assert_eq!(&volume.name, claim);
            assert_eq!(
                volume.persistent_volume_claim.as_ref().map(|s| &s.claim_name),
                Some(claim)
            );
        }

        let container = &spec.containers[0];
        assert_eq!(container.name, CONSUMER_NAME);
        assert_eq!(container.image.as_deref(), Some("ubuntu:latest"));
        assert_eq!(container.image_pull_policy.as_deref(), Some("IfNotPresent"));
        assert_eq!(
            container.command,
            Some(vec!["/bin/sleep".to_string(), "3600".to_string()])
        );
        assert_eq!(
            container.security_context.as_ref().and_then(|s| s.privileged),
            Some(true)
        );
        let paths: Vec<_> = container
            .volume_mounts
            .iter()
            .flatten()
            .map(|m| m.mount_path.as_str())
            .collect();
        assert_eq!(paths, vec!["/pvc-3", "/pvc-4", "/pvc-5", "/pvc-6"]);
    }

    #[test]
    fn test_consumer_without_claims() {
        let pod = consumer_pod(&ConsumerTemplate::default(), &[]);
        assert!(mounted_claims(&pod).is_empty());
        assert!(pod.spec.unwrap().volumes.is_none());
    }
}
