mod cli;
mod commands;
mod config;

use std::{io, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use berth_core::{EngineRegistry, MeteredEngine, OpContext};
use berth_engine::{docker::register_docker_engine, memory::register_memory_engine};
use berth_observe::init_logger;
use berth_prometheus::{Encoder, PrometheusMetrics, TextEncoder};

use crate::{
    cli::Cli,
    config::{AgentConfig, BackendKind},
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = cli.resolve_config()?;

    // Local-offset timestamps must be resolved before any worker threads exist.
    init_logger(&cfg.logger)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run(cli, cfg))
}

async fn run(cli: Cli, cfg: AgentConfig) -> anyhow::Result<()> {
    // 1) engines
    let mut registry = EngineRegistry::new();
    register_memory_engine(&mut registry, BackendKind::Memory.as_str())?;
    match register_docker_engine(&mut registry, BackendKind::Docker.as_str(), &cfg.engine.docker) {
        Ok(()) => {}
        Err(e) if cfg.engine.backend == BackendKind::Docker => {
            return Err(e).context("docker backend unavailable");
        }
        Err(e) => debug!(error = %e, "docker backend not registered"),
    }

    let engine = registry.get(cfg.engine.backend.as_str())?;
    let metrics = PrometheusMetrics::new()?;
    let engine = MeteredEngine::new(engine, Arc::new(metrics.clone()));
    info!(backend = %cfg.engine.backend, "engine ready");

    // 2) context: Ctrl-C cancels the in-flight call
    let mut ctx = OpContext::new();
    if let Some(timeout) = cfg.engine.timeout() {
        ctx = ctx.with_timeout(timeout);
    }
    let token = ctx.token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            token.cancel();
        }
    });

    // 3) command
    let mut stdout = io::stdout().lock();
    let res = commands::execute(&engine, &ctx, cli.command, &mut stdout).await;

    if cli.print_metrics {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&metrics.gather(), &mut buf)?;
        eprint!("{}", String::from_utf8_lossy(&buf));
    }
    res
}
