use clap::Parser;
use dotenv::dotenv;
use handler::Cli;
use tracing_subscriber::EnvFilter;

mod handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();
    let config = docxtract::read_config()?;
    let args = Cli::parse();
    handler::handler(args, config).await?;
    Ok(())
}

fn init_logging() {
    // fmt().init() also routes `log` records into the subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("docxtract=info,tower_http=info")),
        )
        .init();
}
