use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codedoc_rag::config::Config;
use codedoc_rag::indexer::{BoundaryMode, CodeAnalyzer, CodeChunker};
use codedoc_rag::mcp_server::DocMcpServer;
use codedoc_rag::ollama::OllamaClient;
use codedoc_rag::session::DocSession;
use codedoc_rag::types::LoadSourceRequest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codedoc-rag", version, about = "Question answering over source code")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the MCP server over stdio (default)
    Serve,
    /// Split a file into chunks and print them
    Chunk {
        file: PathBuf,
        /// Ignore boundary markers and split on size only
        #[arg(long)]
        size_only: bool,
        /// Print the chunks as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// List models available on the inference service
    Models,
    /// Load a folder or git repository and ask one question about it
    Ask {
        /// Local folder path or git repository URL
        source: String,
        question: String,
        /// Model that answers the question
        #[arg(long, env = "CODEDOC_LLM_MODEL")]
        model: Option<String>,
        /// File extensions to process, e.g. --ext .py --ext .js
        #[arg(long = "ext")]
        extensions: Vec<String>,
    },
    /// Print complexity metrics for a source file
    Analyze { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => DocMcpServer::serve_stdio().await?,
        Command::Chunk {
            file,
            size_only,
            json,
        } => {
            let config = Config::new()?;
            let mut chunking = config.chunking;
            if size_only {
                chunking = chunking.with_boundaries(BoundaryMode::None);
            }
            let chunker = CodeChunker::new(chunking);

            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let extension = file.extension().and_then(|e| e.to_str());
            let chunks = chunker.chunk_code_with(&content, &chunker.scanner_for(extension));

            if json {
                println!("{}", serde_json::to_string_pretty(&chunks)?);
            } else {
                for (i, chunk) in chunks.iter().enumerate() {
                    println!("--- chunk {} ({} chars) ---", i, chunk.chars().count());
                    println!("{}", chunk);
                }
            }
        }
        Command::Models => {
            let config = Config::new()?;
            let client = OllamaClient::new(&config.ollama)?;
            for model in client.available_models().await {
                println!("{}", model);
            }
        }
        Command::Ask {
            source,
            question,
            model,
            extensions,
        } => {
            let session = DocSession::new()?;
            let loaded = session
                .load_source(LoadSourceRequest {
                    source: Some(source),
                    files: vec![],
                    model,
                    extensions,
                })
                .await?;
            tracing::info!(
                "Indexed {} chunks from {} files",
                loaded.chunks_indexed,
                loaded.files_indexed
            );

            let response = session.query_documentation(&question).await?;
            println!("{}", response.answer);
        }
        Command::Analyze { file } => {
            let metrics = CodeAnalyzer::new().analyze_file(&file)?;
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        }
    }

    Ok(())
}
