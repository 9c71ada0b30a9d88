use anyhow::Result;
use clap::Parser;
use server::{load_engine, router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server", about = "Serve boolean and ranked film search over HTTP")]
struct Args {
    /// Directory written by `indexer build`
    #[arg(long, env = "FILMDEX_INDEX", default_value = "./index")]
    index: String,
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Comma-separated origins allowed by CORS; any origin when unset
    #[arg(long, env = "CORS_ALLOW_ORIGIN", value_delimiter = ',')]
    cors_allow_origin: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    // a missing or half-written index stops startup here
    let engine = load_engine(&args.index)?;
    let num_docs = engine.index().num_docs();
    let app = router(engine, &args.cors_allow_origin);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, index = %args.index, num_docs, "film search listening");
    axum::serve(listener, app).await?;
    Ok(())
}
