//! Cluster adapters implementing [`ClusterApi`](crate::domain::ports::ClusterApi)

pub mod dry_run;
pub mod kube_cluster;

pub use dry_run::DryRunCluster;
pub use kube_cluster::{default_kubeconfig_path, load_kubeconfig, ConnectOptions, KubeCluster};
