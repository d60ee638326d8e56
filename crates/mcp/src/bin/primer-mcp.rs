// Command-line front end for the primer tools and resources

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use primer_mcp::{PrimerConfig, PrimerServer};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "primer-mcp")]
#[command(about = "Sandboxed file tools and keyed resources for MCP tutorials", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "primer.toml", env = "PRIMER_CONFIG")]
    config: PathBuf,

    /// Directory that relative paths in the configuration are resolved against
    #[arg(short, long, default_value = ".", env = "PRIMER_BASE_DIR")]
    base_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered tools and readable resources
    Catalog,

    /// Call one tool
    Call {
        /// Tool name, e.g. read_file
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Read one resource by URI, e.g. doc://intro
    Read { uri: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout carries only results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "primer=info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = PrimerConfig::load(&args.config, args.base_dir)?;
    let server = PrimerServer::from_config(&config)?;

    match args.command {
        Command::Catalog => {
            println!("Tools:");
            for (schema, tier) in server.list_tools() {
                println!("  {:<24} [{}] {}", schema.name, tier, schema.description);
            }

            println!("\nResource templates:");
            for template in server.resource_templates() {
                println!("  {:<24} {}", template.uri_template, template.description);
            }

            println!("\nResources:");
            for resource in server.list_resources()? {
                println!("  {:<32} {}", resource.uri, resource.mime_type);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Call { tool, args } => {
            let arguments: serde_json::Value =
                serde_json::from_str(&args).context("Tool arguments must be valid JSON")?;
            let result = server.call_tool(&tool, arguments).await?;
            println!("{}", result.joined_text());
            Ok(if result.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Read { uri } => match server.read_resource(&uri) {
            Ok(contents) => {
                println!("{}", contents.text);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
