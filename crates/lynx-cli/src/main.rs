//! CLI entry point for the lynx-gremlin diagnostics tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use lynx_core::GremlinConfig;
use lynx_gremlin::TypeTag;

use lynx_cli::commands::{self, Operation};

#[derive(Parser)]
#[command(name = "lynx-gremlin")]
#[command(about = "Decode GraphSON v1 payloads and inspect generated Gremlin scripts")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: lynx).
    #[arg(short, long, default_value = "lynx", global = true)]
    config: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a GraphSON v1 payload file and print the result as JSON.
    Decode {
        file: PathBuf,

        /// Element type to decode as: vertex, edge, vertexProperty, property.
        #[arg(long)]
        hint: Option<TypeTag>,
    },
    /// Print the script an operation would submit, without sending it.
    Compile {
        #[command(subcommand)]
        op: Operation,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Command::Decode { file, hint } => {
            let decoded = commands::decode_file(&file, hint)?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        Command::Compile { op } => {
            let config = GremlinConfig::load(&cli.config)?;
            tracing::info!(url = %config.url(), alias = %config.traversal_source, "Compiling dry run");
            for script in commands::compile(&op, &config).await? {
                println!("{script}");
            }
        }
    }

    Ok(())
}
