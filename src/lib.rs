//! massive-claims - PersistentVolumeClaim stress demo
//!
//! Creates a batch of claims, mounts all of them into a single Pod, then
//! tears everything down again, pausing for the operator between steps.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Sequencer                         │
//! │  create claims → list → create pod → delete pod → delete │
//! ├──────────────────────────┬───────────────────────────────┤
//! │     ClusterApi (port)    │          Gate (port)          │
//! │  ┌────────────────────┐  │  ┌─────────────────────────┐  │
//! │  │ KubeCluster        │  │  │ StdinGate               │  │
//! │  │ DryRunCluster      │  │  │ AutoConfirm             │  │
//! │  └────────────────────┘  │  └─────────────────────────┘  │
//! └──────────────────────────┴───────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`sequencer`]: the five-step lifecycle
//! - [`domain`]: manifests and port traits
//! - [`cluster`]: Kubernetes and dry-run adapters
//! - [`gate`]: operator confirmation
//! - [`config`]: run configuration
//! - [`error`]: error types

pub mod cluster;
pub mod config;
pub mod domain;
pub mod error;
pub mod gate;
pub mod sequencer;

pub use cluster::{ConnectOptions, DryRunCluster, KubeCluster};
pub use config::SequencerConfig;
pub use domain::manifest::{ClaimTemplate, ConsumerTemplate, IndexRange};
pub use domain::ports::{ClusterApi, ClusterApiRef, Gate};
pub use error::{Error, Result};
pub use gate::{AutoConfirm, StdinGate};
pub use sequencer::Sequencer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
