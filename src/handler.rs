use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::info;

use docxtract::server::{create_app, AppState};
use docxtract::{Config, DocumentType, Orchestrator, UploadedDocument};

#[derive(Parser)]
#[command(name = "docxtract")]
#[command(about = "Extract structured data from shipping and trade documents", version = "0.1")]
pub enum Cli {
    /// Run the extraction HTTP service
    Serve {
        #[arg(long, help = "Bind address, overrides the configured host")]
        host: Option<String>,

        #[arg(short, long, help = "Port, overrides the configured port")]
        port: Option<u16>,
    },

    /// Extract one local document and print the result as JSON
    Extract {
        #[arg(help = "Document type: invoice, packing-list or awb")]
        doc_type: DocumentType,

        #[arg(help = "Path to the PDF")]
        path: PathBuf,
    },

    /// Print the text of the first pages of a local document, no API key needed
    Preview {
        #[arg(help = "Path to the PDF")]
        path: PathBuf,
    },
}

pub async fn handler(args: Cli, config: Config) -> anyhow::Result<()> {
    match args {
        Cli::Serve { host, port } => serve(config, host, port).await,
        Cli::Extract { doc_type, path } => extract_file(config, doc_type, path).await,
        Cli::Preview { path } => preview_file(config, path).await,
    }
}

async fn serve(config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::from_config(&config)?;
    info!(
        "extractors ready for {:?}, staging uploads in {}",
        orchestrator.registry().document_types(),
        orchestrator.storage().root().display()
    );

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };
    let app = create_app(state, config.max_upload_bytes);

    let host = host.unwrap_or(config.host);
    let port = port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {}", addr))?;
    info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl+C: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Ctrl+C received, shutting down");
}

async fn extract_file(config: Config, doc_type: DocumentType, path: PathBuf) -> anyhow::Result<()> {
    let document = read_document(&path).await?;
    let orchestrator = Orchestrator::from_config(&config)?;
    let envelope = orchestrator.handle(doc_type, Some(document)).await?;

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn preview_file(config: Config, path: PathBuf) -> anyhow::Result<()> {
    let document = read_document(&path).await?;
    let orchestrator = Orchestrator::from_config(&config)?;
    let preview = orchestrator.preview(Some(document)).await?;

    println!("{}", preview.text);
    if preview.truncated {
        info!("preview truncated, document has {} pages", preview.page_count);
    }
    Ok(())
}

async fn read_document(path: &Path) -> anyhow::Result<UploadedDocument> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let display_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string);
    Ok(UploadedDocument::new(display_name, bytes))
}
