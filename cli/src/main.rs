//! CLI entrypoint for llm-consensus
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use consensus_application::{
    ConsensusConfig, LlmGateway, ProgressNotifier, RunConsensusInput, RunConsensusUseCase,
};
use consensus_domain::{Credentials, FanOutStrategy, Question};
use consensus_infrastructure::{
    ConfigLoader, FileConfig, HttpLlmGateway, JsonSchemaVerdictValidator, ProviderDescriptor,
};
use consensus_presentation::{
    AppState, Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, ProviderInfo,
    router,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting llm-consensus");

    // === Load Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };
    let consensus_config = file_config
        .validate()
        .context("invalid configuration")?;

    match cli.command {
        Command::Config => {
            print_config(&cli.config, &file_config, &consensus_config)?;
            Ok(())
        }
        Command::Serve { host, port } => serve(file_config, consensus_config, host, port).await,
        Command::Ask {
            question,
            output,
            sequential,
            keys,
            quiet,
        } => {
            let consensus_config = if sequential {
                consensus_config.with_strategy(FanOutStrategy::Sequential {
                    delay: Duration::from_millis(file_config.consensus.sequential_delay_ms),
                })
            } else {
                consensus_config
            };
            let credentials = keys
                .into_iter()
                .fold(Credentials::new(), |creds, (provider, secret)| {
                    creds.with_key(provider, secret)
                });
            ask(
                &file_config,
                consensus_config,
                question,
                credentials,
                output,
                quiet,
            )
            .await
        }
    }
}

// === Dependency Injection ===
fn build_gateway(
    file_config: &FileConfig,
    consensus_config: &ConsensusConfig,
) -> Result<HttpLlmGateway> {
    let settings = file_config
        .providers
        .to_settings(consensus_config.policy().providers());
    HttpLlmGateway::from_settings(settings).context("failed to create provider gateway")
}

fn build_use_case(
    gateway: Arc<dyn LlmGateway>,
    consensus_config: ConsensusConfig,
) -> Arc<RunConsensusUseCase<dyn LlmGateway>> {
    Arc::new(RunConsensusUseCase::new(
        gateway,
        Arc::new(JsonSchemaVerdictValidator),
        consensus_config,
    ))
}

fn provider_info(descriptor: ProviderDescriptor) -> ProviderInfo {
    ProviderInfo {
        provider: descriptor.provider,
        model: descriptor.model,
        has_default_key: descriptor.has_default_key,
    }
}

async fn serve(
    file_config: FileConfig,
    consensus_config: ConsensusConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut server = file_config.server.clone();
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }

    let gateway = build_gateway(&file_config, &consensus_config)?;
    let providers = gateway
        .describe(consensus_config.policy().providers())
        .into_iter()
        .map(provider_info)
        .collect::<Vec<_>>();
    for info in &providers {
        info!(
            "Provider {} -> {} (default key: {})",
            info.provider, info.model, info.has_default_key
        );
    }

    let use_case = build_use_case(Arc::new(gateway), consensus_config);
    let state = AppState::new(use_case, providers).with_version(env!("CARGO_PKG_VERSION"));
    let app = router(Arc::new(state), server.body_limit_bytes);

    let address = server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

async fn ask(
    file_config: &FileConfig,
    consensus_config: ConsensusConfig,
    question: String,
    credentials: Credentials,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let question = Question::try_new(question).context("question must not be empty")?;

    let gateway = build_gateway(file_config, &consensus_config)?;
    let use_case = build_use_case(Arc::new(gateway), consensus_config);
    let input = RunConsensusInput::new(question.clone()).with_credentials(credentials);

    // JSON output stays machine-readable: no progress bars
    let progress: Option<ProgressReporter> =
        (!quiet && output != OutputFormat::Json).then(ProgressReporter::new);
    let result = match &progress {
        Some(reporter) => {
            use_case
                .execute_with_progress(input, reporter as &dyn ProgressNotifier)
                .await
        }
        None => use_case.execute(input).await,
    };

    let payload = match result {
        Ok(payload) => payload,
        Err(e) => {
            for failure in e.failures() {
                eprintln!("  {failure}");
            }
            return Err(e.into());
        }
    };

    let rendered = match output {
        OutputFormat::Full => ConsoleFormatter::format(question.content(), &payload),
        OutputFormat::Summary => ConsoleFormatter::format_summary(question.content(), &payload),
        OutputFormat::Json => ConsoleFormatter::format_json(&payload),
    };
    println!("{}", rendered);

    Ok(())
}

fn print_config(
    config_path: &Option<std::path::PathBuf>,
    file_config: &FileConfig,
    consensus_config: &ConsensusConfig,
) -> Result<()> {
    for line in ConfigLoader::describe_sources(config_path.as_ref()) {
        println!("{}", line);
    }

    let policy = consensus_config.policy();
    println!();
    println!("Effective settings:");
    println!("  server:         {}", file_config.server.bind_address());
    println!("  body limit:     {} bytes", file_config.server.body_limit_bytes);
    println!("  strategy:       {}", policy.strategy());
    println!("  min successes:  {}", policy.min_successes());
    println!("  banding:        {}", policy.banding().description());
    println!(
        "  judge priority: {}",
        policy
            .judge_priority()
            .order()
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(" > ")
    );
    println!(
        "  timeout:        {}s",
        consensus_config.execution().request_timeout.as_secs()
    );

    let gateway = build_gateway(file_config, consensus_config)?;
    println!();
    println!("Providers:");
    for descriptor in gateway.describe(policy.providers()) {
        println!(
            "  {:<10} {:<28} default key: {}",
            descriptor.provider.as_str(),
            descriptor.model,
            if descriptor.has_default_key { "set" } else { "not set" }
        );
    }

    Ok(())
}
