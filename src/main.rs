mod cli;

use ytsdebrid::{config, debrid::RealDebridClient, server, server::AppContext};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use ytsdebrid_common::Stream;

/// Where a development credential is written: the explicit config, the first
/// existing default, or `./config.toml`.
fn credential_path(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .or_else(config::find_default_config)
        .unwrap_or_else(|| PathBuf::from("./config.toml"))
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting ytsdebrid server");
    tracing::info!(
        "Server will listen on {}:{} ({:?})",
        config.server.host,
        config.server.port,
        config.environment
    );

    server::start_server(config, credential_path(config_path)).await
}

async fn resolve(id: &str, json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let ctx = AppContext::new(config, credential_path(config_path));

    let result = ctx.resolver().resolve(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Streams for {}: {}", id, result.streams.len());
    for stream in &result.streams {
        match stream {
            Stream::Converted(s) => println!("  {}\n    {}", s.title, s.url),
            Stream::Fallback(s) => println!("  {}\n    magnet {}", s.title, s.info_hash),
        }
    }
    Ok(())
}

async fn catalog(genre: Option<&str>, skip: Option<u32>, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let ctx = AppContext::new(config, credential_path(config_path));

    let page = ctx.resolver().catalog(genre, skip).await?;
    for meta in &page.metas {
        println!(
            "{}  {} ({})  {}",
            meta.id,
            meta.name,
            meta.release_info.as_deref().unwrap_or("?"),
            meta.genres.join(", ")
        );
    }
    println!("{} titles", page.metas.len());
    Ok(())
}

async fn check_key(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let Some(client) = RealDebridClient::from_config(&config.debrid) else {
        anyhow::bail!(
            "No debrid API key configured (set {} or debrid.api_key)",
            config::CREDENTIAL_ENV
        );
    };

    client.verify().await?;
    println!("✓ Debrid API key is valid");
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Environment: {:?}", config.environment);
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Metadata: {}", config.metadata.base_url);
            println!(
                "  Metadata cache TTL: {}s",
                config.metadata.cache_ttl_secs
            );
            println!("  Debrid: {}", config.debrid.base_url);
            println!(
                "  Debrid key configured: {}",
                config.debrid.credential().is_some()
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Metadata: {}", config.metadata.base_url);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "ytsdebrid=trace,tower_http=debug".to_string()
        } else {
            "ytsdebrid=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, config_path))
        }
        Commands::Resolve { id, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(resolve(&id, json, config_path))
        }
        Commands::Catalog { genre, skip } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(catalog(genre.as_deref(), skip, config_path))
        }
        Commands::CheckKey => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_key(config_path))
        }
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("ytsdebrid {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
