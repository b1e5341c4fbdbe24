use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spydr_mcp::connector::adapter::mcp::{serve_http, serve_stdio};
use spydr_mcp::{Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "spydr-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read settings from this file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Use in-memory stores and mock embeddings; no settings required
    #[arg(long, global = true)]
    memory_storage: bool,

    /// Let graph context queries run write statements
    #[arg(long, global = true)]
    allow_graph_writes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    // stdout carries MCP frames in stdio mode
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let container = Arc::new(
        Container::new(ContainerConfig {
            memory_storage: cli.memory_storage,
            allow_graph_writes: cli.allow_graph_writes,
            env_file: cli.env_file,
        })
        .await?,
    );

    let result = match cli.command {
        Commands::Mcp { http, public } => match http {
            Some(port) => serve_http(container.clone(), port, public).await,
            None => serve_stdio(container.clone()).await,
        },
        command => Router::new(&container).route(command).await.map(|output| {
            println!("{}", output);
        }),
    };

    container.close().await;
    info!("Shutdown complete");
    result
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn mcp_http_flags_parse() {
        let cli = Cli::try_parse_from(["spydr-mcp", "mcp", "--http", "8080", "--public"]).unwrap();
        match cli.command {
            Commands::Mcp { http, public } => {
                assert_eq!(http, Some(8080));
                assert!(public);
            }
            _ => panic!("expected mcp command"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["spydr-mcp", "ping", "--memory-storage", "-v"]).unwrap();
        assert!(cli.memory_storage);
        assert!(cli.verbose);
    }

    #[test]
    fn create_source_requires_web() {
        let res = Cli::try_parse_from(["spydr-mcp", "create-source", "title", "--user", "u"]);
        assert!(res.is_err());
    }
}
