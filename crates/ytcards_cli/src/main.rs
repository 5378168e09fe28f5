use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ytcards_cli::fetch::HttpSource;
use ytcards_cli::generate::{GenerateArgs, run_generate};
use ytcards_cli::server::{ServerOpts, run_server};

#[derive(Debug, Parser)]
#[command(name = "ytcards", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Print card snippets for a channel or playlist and patch the readme.")]
    Generate(GenerateArgs),
    #[command(about = "Serve SVG cards over HTTP.")]
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => {
            let config = args.into_config()?;
            let outcome = run_generate(&config, &HttpSource::new())?;
            println!("{}", outcome.snippet);
            Ok(())
        }
        Command::Serve { host, port } => {
            run_server(ServerOpts { host, port }, Arc::new(HttpSource::new()))
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("YTCARDS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
