//! `bcscan` — real-time blockchain transaction risk-detection engine
//! (SPEC_FULL §4.10). Wires configuration, logging, the Redis/Postgres
//! adapters, and the rule engine together; every layer below this binary
//! stays collaborator-agnostic.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bcscan_application::{Executor, HookRegistry, Pipeline, RuleManager};
use bcscan_domain::ports::TransactionSource;
use bcscan_infrastructure::{logging, Config};
use bcscan_providers::{PostgresRiskEventSink, RedisRuleCache, RedisTransactionSource};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

/// Real-time blockchain transaction risk-detection engine.
#[derive(Parser)]
#[command(name = "bcscan")]
#[command(about = "Real-time blockchain transaction risk-detection engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Optional TOML config file, layered over compiled-in defaults and
    /// `BCSCAN_`-prefixed environment variables (§4.8).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the worker pool and rule-reload subscription; runs until
    /// SIGINT/SIGTERM.
    Run,
    /// Load rules from disk, write them to the cache, and publish a
    /// reload notice, then exit (§4.10).
    Reload,
    /// Print the currently active enabled rules, one per line (§4.10).
    ListRules,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init(config.environment);

    match cli.command {
        Commands::Run => run(config).await,
        Commands::Reload => reload(config).await,
        Commands::ListRules => list_rules(config).await,
    }
}

async fn build_manager(config: &Config) -> Result<RuleManager> {
    let cache = Arc::new(
        RedisRuleCache::connect(&config.redis_url)
            .await
            .context("failed to connect to redis for rule cache")?,
    );
    Ok(RuleManager::new(
        config.rules_dir.clone(),
        cache.clone(),
        cache,
    ))
}

async fn reload(config: Config) -> Result<()> {
    let manager = build_manager(&config).await?;
    manager
        .publish_update()
        .await
        .context("failed to reload and publish rule update")?;
    tracing::info!("rules reloaded and update published");
    Ok(())
}

async fn list_rules(config: Config) -> Result<()> {
    let manager = build_manager(&config).await?;
    manager.load().await.context("failed to load rules")?;
    let rules = manager.get();
    for rule in rules.iter() {
        println!(
            "{}\t{}\t{}",
            rule.metadata.name, rule.config.severity, rule.metadata.enabled
        );
    }
    Ok(())
}

async fn run(config: Config) -> Result<()> {
    let manager = Arc::new(build_manager(&config).await?);
    manager.load().await.context("failed to load initial rule set")?;

    let sink = Arc::new(
        PostgresRiskEventSink::connect(&config.database_url)
            .await
            .context("failed to connect to postgres for risk event sink")?,
    );
    let executor = Arc::new(Executor::new(sink));
    let registry = Arc::new(HookRegistry::with_builtins());

    let transaction_source = Arc::new(
        RedisTransactionSource::connect(&config.redis_url, &config.bus_topic)
            .await
            .context("failed to subscribe to the transaction bus")?,
    );

    let cancellation = CancellationToken::new();

    let reload_manager = manager.clone();
    let reload_cancellation = cancellation.clone();
    let reload_task =
        tokio::spawn(async move { reload_manager.subscribe_updates(reload_cancellation).await });

    let mut worker_tasks = Vec::with_capacity(config.worker_concurrency);
    for worker_id in 0..config.worker_concurrency {
        let manager = manager.clone();
        let registry = registry.clone();
        let executor = executor.clone();
        let transaction_source = transaction_source.clone();
        let cancellation = cancellation.clone();
        worker_tasks.push(tokio::spawn(async move {
            worker_loop(
                worker_id,
                &manager,
                &registry,
                &executor,
                transaction_source.as_ref(),
                cancellation,
            )
            .await;
        }));
    }

    wait_for_shutdown_signal().await;
    tracing::info!("shutdown signal received, cancelling workers");
    cancellation.cancel();

    for task in worker_tasks {
        let _ = task.await;
    }
    let _ = reload_task.await;

    Ok(())
}

async fn worker_loop(
    worker_id: usize,
    manager: &RuleManager,
    registry: &HookRegistry,
    executor: &Executor,
    transaction_source: &dyn TransactionSource,
    cancellation: CancellationToken,
) {
    let pipeline = Pipeline::new(registry, executor);
    loop {
        let message = tokio::select! {
            () = cancellation.cancelled() => {
                tracing::info!(worker_id, "worker cancelled, exiting");
                return;
            }
            message = transaction_source.next_message() => message,
        };

        let payload = match message {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::info!(worker_id, "transaction source closed, exiting");
                return;
            }
            Err(err) => {
                tracing::warn!(worker_id, error = %err, "transient error reading transaction");
                continue;
            }
        };

        let transaction = match serde_json::from_slice(&payload) {
            Ok(transaction) => transaction,
            Err(err) => {
                tracing::warn!(worker_id, error = %err, "malformed transaction payload, skipping");
                continue;
            }
        };

        let rules = manager.get();
        let outcomes = pipeline.process(transaction, &rules).await;
        tracing::debug!(worker_id, matches = outcomes.len(), "transaction processed");
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
