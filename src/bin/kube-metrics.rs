//! kube-metrics - live CPU and memory plots for a Kubernetes node or pod.
//!
//! Usage:
//!   kube-metrics node worker-1                 # node usage, 1s interval
//!   kube-metrics pod web-0 -n shop             # every container of a pod
//!   kube-metrics pod web-0 --container app     # a single container
//!   kube-metrics pod web-0 --interval 500ms    # faster refresh

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tikv_jemallocator::Jemalloc;

use kube_metrics::config::{DEFAULT_LOCALE, DashboardConfig, Target};
use kube_metrics::logging::init_logging;
use kube_metrics::source::{ConnectOptions, KubeSource};
use kube_metrics::tui::App;
use kube_metrics::util::parse_duration;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Live CPU and memory plots for Kubernetes nodes and pods.
#[derive(Parser)]
#[command(name = "kube-metrics", version, about = "Kubernetes resource usage dashboard")]
struct Cli {
    /// Path to kubeconfig file (uses default discovery if not specified).
    #[arg(long, env = "KUBECONFIG", global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use.
    #[arg(long, global = true)]
    context: Option<String>,

    /// Timeout for each API request.
    #[arg(long, value_name = "DURATION", default_value = "10s", value_parser = parse_duration, global = true)]
    request_timeout: Duration,

    /// Namespace of the pod (defaults to the kubeconfig namespace).
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Number format language, e.g. de-CH or en.
    #[arg(long = "nfl", value_name = "LOCALE", default_value = DEFAULT_LOCALE, global = true)]
    number_format: String,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Append logs to this file. Without it, logs are discarded.
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plot CPU and memory usage of a node.
    Node {
        /// Node name.
        name: String,

        /// Refresh interval (e.g. 1s, 500ms, 1m30s; bare numbers are seconds).
        #[arg(short, long, default_value = "1s", value_parser = parse_duration)]
        interval: Duration,
    },

    /// Plot CPU and memory usage of a pod's containers.
    Pod {
        /// Pod name.
        name: String,

        /// Refresh interval (e.g. 1s, 500ms, 1m30s; bare numbers are seconds).
        #[arg(short, long, default_value = "1s", value_parser = parse_duration)]
        interval: Duration,

        /// Only plot this container (default: all containers).
        #[arg(short, long)]
        container: Option<String>,
    },
}

impl Cli {
    /// Splits the command line into what to watch and how.
    fn dashboard(self) -> (Target, DashboardConfig) {
        let (target, interval) = match self.command {
            Command::Node { name, interval } => (Target::Node { name }, interval),
            Command::Pod {
                name,
                interval,
                container,
            } => (
                Target::Pod {
                    namespace: self.namespace,
                    name,
                    container,
                },
                interval,
            ),
        };
        let config = DashboardConfig {
            interval,
            locale: self.number_format,
            ..DashboardConfig::default()
        };
        (target, config)
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref()).context("failed to initialise logging")?;

    let options = ConnectOptions {
        kubeconfig: cli.kubeconfig.clone(),
        context: cli.context.clone(),
        request_timeout: cli.request_timeout,
    };
    let (target, config) = cli.dashboard();

    let size = crossterm::terminal::size().context("failed to query terminal size")?;
    let source = KubeSource::connect(&options).context("failed to connect to cluster")?;
    let app = App::new(source, target, config, size)?;
    app.run()?;
    Ok(())
}
