use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use petal_ai::PredictionService;
use petal_core::LabelTable;
use petal_server::AppState;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "petal", version, about = "Serve a pre-trained iris classifier over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the model and serve `POST /predict/`.
    Serve {
        #[command(flatten)]
        model: ModelArgs,

        /// IP address to bind (IPv4 or IPv6, e.g. `0.0.0.0` or `::`).
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: IpAddr,

        /// Port to listen on.
        #[arg(long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },
    /// Load the model, verify it matches the label table, and exit.
    Check {
        #[command(flatten)]
        model: ModelArgs,
    },
}

#[derive(Args)]
struct ModelArgs {
    /// Model artifact (.json centroid model, or .onnx with the `onnx` feature).
    #[arg(long, env = "PETAL_MODEL", default_value = "models/iris-centroids.json")]
    model: PathBuf,

    /// Class labels in model output order, comma-separated.
    #[arg(long, env = "PETAL_LABELS", default_value = "setosa,versicolor,virginica")]
    labels: LabelTable,
}

impl ModelArgs {
    fn load(self) -> anyhow::Result<PredictionService> {
        PredictionService::load(&self.model, self.labels)
            .with_context(|| format!("loading model {}", self.model.display()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petal=info,tower_http=info".into()),
        )
        .init();

    match Cli::parse().command {
        Command::Serve { model, host, port } => {
            let service = model.load()?;
            let addr = SocketAddr::new(host, port);
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            petal_server::serve(listener, AppState::new(service))
                .await
                .context("server error")?;
        }
        Command::Check { model } => {
            let path = model.model.clone();
            let service = model.load()?;
            println!(
                "{}: ok ({} backend, {} classes: {})",
                path.display(),
                service.backend(),
                service.labels().len(),
                service.labels()
            );
        }
    }
    Ok(())
}
