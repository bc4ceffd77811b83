use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "affiche-server", version)]
struct Args {
    /// Directory with the front-end assets and the composite template.
    #[arg(long, default_value = "public")]
    public_dir: PathBuf,

    /// Listen port. Falls back to the PORT environment variable, then
    /// the default.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let port = args
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(affiche::serve::DEFAULT_PORT);

    let app = affiche::serve::router(affiche::serve::ServeConfig {
        public_dir: args.public_dir,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("bind port {port}"))?;
    tracing::info!(port, "server listening");
    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}
