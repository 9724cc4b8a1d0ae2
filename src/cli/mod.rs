pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "marketplace")]
#[command(about = "Marketplace CLI - bulk actions and category tools for the Marketplace API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output raw JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a signed JWT for a user and role")]
    Token(commands::token::TokenArgs),

    #[command(about = "Apply one action to many records")]
    Bulk(commands::bulk::BulkArgs),

    #[command(about = "Print the category tree")]
    Tree(commands::tree::TreeArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::Bulk(args) => commands::bulk::handle(args, output_format).await,
        Commands::Tree(args) => commands::tree::handle(args, output_format).await,
    }
}
