//! Sequencer - the five-step claim lifecycle
//!
//! Steps run strictly in order with an operator gate between each:
//!
//! 1. create claims `pvc-<start>` ..= `pvc-<end>`
//! 2. list claims in the namespace
//! 3. create the consumer Pod mounting every claim
//! 4. delete the consumer Pod
//! 5. delete the claims
//!
//! The first failing call ends the run. Nothing already created is cleaned up.

use crate::config::SequencerConfig;
use crate::domain::manifest::{claim_name, claim_names, consumer_pod, storage_claim, IndexRange};
use crate::domain::ports::{ClusterApiRef, Gate};
use crate::error::Result;
use kube::api::DeleteParams;
use tracing::{debug, info};

pub struct Sequencer {
    config: SequencerConfig,
    cluster: ClusterApiRef,
    gate: Box<dyn Gate>,
}

impl Sequencer {
    pub fn new(config: SequencerConfig, cluster: ClusterApiRef, gate: Box<dyn Gate>) -> Self {
        Self {
            config,
            cluster,
            gate,
        }
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Run all five steps against the configured range
    pub async fn run(&mut self) -> Result<()> {
        let range = self.config.range;
        info!(
            "Starting claim lifecycle for {} in namespace {}",
            range,
            self.cluster.namespace()
        );

        println!("Creating pvc...");
        self.create_claims(range).await?;

        self.gate.confirm().await?;
        self.list_claims().await?;

        self.gate.confirm().await?;
        println!("Creating pod...");
        self.create_consumer(range).await?;

        self.gate.confirm().await?;
        println!("Deleting pod...");
        self.delete_consumer().await?;
        println!("Deleted pod.");

        self.gate.confirm().await?;
        println!("Deleting pvc...");
        self.delete_claims(range).await?;
        println!("Deleted pvc.");

        info!("Claim lifecycle complete");
        Ok(())
    }

    /// Create one claim per index. Returns the names reported by the API.
    pub async fn create_claims(&self, range: IndexRange) -> Result<Vec<String>> {
        let mut created = Vec::new();
        for index in range.iter() {
            let claim = storage_claim(&claim_name(index), &self.config.claim);
            let result = self.cluster.create_claim(&claim).await?;

            let name = result.metadata.name.unwrap_or_default();
            println!("Created pvc {:?}.", name);
            created.push(name);
        }
        debug!("Created {} claims", created.len());
        Ok(created)
    }

    /// List every claim in the namespace, unfiltered
    pub async fn list_claims(&self) -> Result<Vec<String>> {
        println!("Listing pvc in namespace {:?}:", self.cluster.namespace());
        let claims = self.cluster.list_claims().await?;

        let names: Vec<String> = claims
            .into_iter()
            .map(|c| c.metadata.name.unwrap_or_default())
            .collect();
        for name in &names {
            println!(" pvc {}", name);
        }
        Ok(names)
    }

    /// Create the consumer mounting every claim in `range`
    pub async fn create_consumer(&self, range: IndexRange) -> Result<String> {
        let pod = consumer_pod(&self.config.consumer, &claim_names(range));
        let result = self.cluster.create_pod(&pod).await?;

        let name = result.metadata.name.unwrap_or_default();
        println!("Created pod {:?}.", name);
        Ok(name)
    }

    pub async fn delete_consumer(&self) -> Result<()> {
        self.cluster
            .delete_pod(&self.config.consumer.name, &DeleteParams::foreground())
            .await
    }

    pub async fn delete_claims(&self, range: IndexRange) -> Result<()> {
        let params = DeleteParams::foreground();
        for index in range.iter() {
            self.cluster.delete_claim(&claim_name(index), &params).await?;
        }
        debug!("Deleted {} claims", range.len());
        Ok(())
    }
}
