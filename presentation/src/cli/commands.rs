//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use consensus_domain::ProviderId;
use std::path::PathBuf;

/// Output format for consensus results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Verdict, claims, conflicts and every raw answer
    Full,
    /// Score and summary only
    Summary,
    /// The final payload as JSON
    Json,
}

/// CLI arguments for llm-consensus
#[derive(Parser, Debug)]
#[command(name = "llm-consensus")]
#[command(author, version, about = "Ask several LLM providers and synthesize a consensus verdict")]
#[command(long_about = r#"
llm-consensus sends one question to several LLM providers and asks a judge
model to cross-reference their answers.

The process has two phases:
1. Fan-out: every configured provider answers the question
2. Synthesis: the highest-priority responder scores the agreement and
   attributes each claim to the providers that support or dispute it

Configuration files are loaded from (in priority order):
1. CONSENSUS_* environment variables
2. --config <path>     Explicit config file
3. ./consensus.toml    Project-level config
4. ~/.config/llm-consensus/config.toml   Global config

Example:
  llm-consensus serve --port 8080
  llm-consensus ask "Is coffee healthy?"
  llm-consensus ask --key openai=sk-... --output json "Is coffee healthy?"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides [server].host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides [server].port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one consensus round locally and print the result
    Ask {
        /// The question to put to every provider
        question: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "full")]
        output: OutputFormat,

        /// Query providers one at a time instead of concurrently
        #[arg(long)]
        sequential: bool,

        /// Provider key for this run, as provider=secret (repeatable)
        #[arg(short, long = "key", value_name = "PROVIDER=SECRET", value_parser = parse_key)]
        keys: Vec<(ProviderId, String)>,

        /// Suppress progress indicators
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show configuration file locations and the effective settings
    Config,
}

/// Parse a `provider=secret` pair
pub fn parse_key(raw: &str) -> Result<(ProviderId, String), String> {
    let (name, secret) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PROVIDER=SECRET, got '{raw}'"))?;
    let provider = name.parse::<ProviderId>().map_err(|e| e.to_string())?;
    if secret.trim().is_empty() {
        return Err(format!("empty key for {provider}"));
    }
    Ok((provider, secret.trim().to_string()))
}
