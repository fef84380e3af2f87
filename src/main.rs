//! massive-claims
//!
//! Creates `pvc-<start>` ..= `pvc-<end>`, mounts them all in one Pod, then
//! deletes the Pod and the claims, waiting for Return between steps.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use massive_claims::cluster::default_kubeconfig_path;
use massive_claims::{
    AutoConfirm, ClaimTemplate, ClusterApiRef, ConnectOptions, ConsumerTemplate, DryRunCluster,
    Error, Gate, IndexRange, KubeCluster, Result, Sequencer, SequencerConfig, StdinGate,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Create many PersistentVolumeClaims, mount them in one Pod, then clean up
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the kubeconfig file (defaults to ~/.kube/config)
    #[arg(long, env = "MASSIVE_CLAIMS_KUBECONFIG_PATH")]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, env = "MASSIVE_CLAIMS_KUBE_CONTEXT")]
    context: Option<String>,

    /// Namespace for the claims and the pod
    #[arg(long, env = "MASSIVE_CLAIMS_NAMESPACE", default_value = "default")]
    namespace: String,

    /// Start index
    #[arg(long, env = "MASSIVE_CLAIMS_START", default_value_t = 0, allow_negative_numbers = true)]
    start: i64,

    /// End index (inclusive)
    #[arg(long, env = "MASSIVE_CLAIMS_END", default_value_t = 5, allow_negative_numbers = true)]
    end: i64,

    /// Storage requested by each claim
    #[arg(long, env = "MASSIVE_CLAIMS_CLAIM_CAPACITY", default_value = "1Gi")]
    capacity: String,

    /// Image for the pod holding the claims
    #[arg(long, env = "MASSIVE_CLAIMS_CONSUMER_IMAGE", default_value = "ubuntu:latest")]
    image: String,

    /// Do not wait for Return between steps
    #[arg(long, short = 'y', env = "MASSIVE_CLAIMS_ASSUME_YES")]
    yes: bool,

    /// Print manifests instead of calling the cluster
    #[arg(long, env = "MASSIVE_CLAIMS_DRY_RUN")]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Args {
    fn sequencer_config(&self) -> SequencerConfig {
        SequencerConfig {
            namespace: self.namespace.clone(),
            range: IndexRange::new(self.start, self.end),
            claim: ClaimTemplate {
                capacity: self.capacity.clone(),
            },
            consumer: ConsumerTemplate {
                image: self.image.clone(),
                ..Default::default()
            },
        }
    }

    fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            // A missing default file falls through to in-cluster config
            kubeconfig: self
                .kubeconfig
                .clone()
                .or_else(|| default_kubeconfig_path().filter(|p| p.exists())),
            context: self.context.clone(),
        }
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    if let Err(e) = run(&args).await {
        error!("{}: {}", failure_context(&e), e);
        return Err(e);
    }
    Ok(())
}

/// Cluster failures can leave objects behind, setup failures cannot
fn failure_context(err: &Error) -> &'static str {
    if err.is_external() {
        "Cluster call failed, objects created so far were left in place"
    } else {
        "Setup failed before the run finished"
    }
}

async fn run(args: &Args) -> Result<()> {
    println!("start {} end {}", args.start, args.end);

    let config = args.sequencer_config();
    config.validate()?;

    info!("massive-claims {}", massive_claims::VERSION);
    info!("  Namespace: {}", config.namespace);
    info!("  Claims: {} ({} each)", config.range, config.claim.capacity);
    info!("  Dry run: {}", args.dry_run);

    let cluster: ClusterApiRef = if args.dry_run {
        Arc::new(DryRunCluster::new(&config.namespace))
    } else {
        Arc::new(KubeCluster::connect(&args.connect_options(), &config.namespace).await?)
    };

    let gate: Box<dyn Gate> = if args.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(StdinGate::stdin())
    };

    Sequencer::new(config, cluster, gate).run().await
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "kube=info", "tower=warn"] {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }

    // stdout carries the step output and dry-run manifests
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
