use crate::config::{get_config_path, load_config, save_config, Config};
use crate::slack::SlackClient;
use crate::workflows::thought;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "otterbot")]
#[command(about = "Slack workflow bot", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (default: ~/.otterbot/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot (Socket Mode + scheduler)
    Start,
    /// Run the markup rewriter on the given text (or stdin) and print the result
    Rewrite {
        /// Text to rewrite; reads stdin when omitted
        text: Option<String>,
    },
    /// Post one thought-of-the-day now
    Thought,
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default config file if none exists
    Init,
    /// Print the config file path
    Path,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => {
            let config = load_config(cli.config.as_deref())?;
            crate::gateway::run(config).await
        }
        Commands::Rewrite { text } => {
            let input = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };
            println!("{}", crate::markup::rewrite(&input));
            Ok(())
        }
        Commands::Thought => {
            let config = load_config(cli.config.as_deref())?;
            if config.slack.bot_token.is_empty() {
                anyhow::bail!("Slack botToken not configured");
            }
            let slack = SlackClient::new(config.slack.bot_token.clone());
            match thought::run(&slack, &config.workflows.thought).await? {
                Some(ts) => println!("Posted (ts {})", ts),
                None => println!("Nothing posted — check channelId and thoughts in config"),
            }
            Ok(())
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Init => {
                let path = match cli.config {
                    Some(path) => path,
                    None => get_config_path()?,
                };
                if path.exists() {
                    println!("Config already exists at {}", path.display());
                } else {
                    save_config(&Config::default(), Some(&path))?;
                    println!("Wrote default config to {}", path.display());
                    println!("Secrets can also be provided via environment variables:");
                    for (name, env) in crate::config::credentials::CREDENTIAL_ENV_VARS {
                        println!("  {} ({})", env, name);
                    }
                }
                Ok(())
            }
            ConfigCommands::Path => {
                let path = match cli.config {
                    Some(path) => path,
                    None => get_config_path()?,
                };
                println!("{}", path.display());
                Ok(())
            }
        },
    }
}
