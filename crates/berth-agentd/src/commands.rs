use std::io::Write;

use anyhow::{Context, ensure};
use tracing::info;

use berth_core::{Engine, OpContext};
use berth_model::{LABEL_MANAGED_BY, LabelFilter, ServiceSpec};

use crate::cli::Command;

const MANAGER: &str = "berthctl";

/// Execute one subcommand against `engine`, writing user-facing output to `out`.
pub async fn execute(
    engine: &dyn Engine,
    ctx: &OpContext,
    command: Command,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Command::Create {
            name,
            image,
            entrypoint,
            command,
            labels,
        } => {
            let mut spec = ServiceSpec::new(image)
                .with_entrypoint(entrypoint)
                .with_command(command)
                .with_label(LABEL_MANAGED_BY, MANAGER);
            for (k, v) in labels {
                spec = spec.with_label(k, v);
            }
            let id = engine
                .create(ctx, &name, &spec)
                .await
                .with_context(|| format!("create {name}"))?;
            writeln!(out, "{id}")?;
        }
        Command::Start { id } => {
            engine.start(ctx, &id).await.with_context(|| format!("start {id}"))?;
        }
        Command::List { filters, all, json } => {
            let filter = LabelFilter::parse_exprs(&filters)?;
            let instances = engine.list(ctx, &filter, all).await.context("list")?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &instances)?;
                writeln!(out)?;
            } else {
                for inst in &instances {
                    writeln!(out, "{inst}")?;
                }
            }
        }
        Command::Stop { id } => {
            engine.stop(ctx, &id).await.with_context(|| format!("stop {id}"))?;
        }
        Command::Remove { id } => {
            engine.remove(ctx, &id).await.with_context(|| format!("remove {id}"))?;
        }
        Command::Demo { image } => demo(engine, ctx, &image, out).await?,
    }
    Ok(())
}

/// Create, start, stop and remove one instance, checking listings between steps.
async fn demo(
    engine: &dyn Engine,
    ctx: &OpContext,
    image: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let name = format!("berth-demo-{}", std::process::id());
    let spec = ServiceSpec::new(image)
        .with_command(["sleep", "300"])
        .with_label("app", &name)
        .with_label(LABEL_MANAGED_BY, MANAGER);
    let by_app = LabelFilter::new().has_value("app", &name);

    let id = engine.create(ctx, &name, &spec).await.context("demo: create")?;
    info!(%id, name = %name, backend = engine.name(), "demo instance created");
    writeln!(out, "created {id}")?;

    let listed = engine.list(ctx, &by_app, true).await?;
    ensure!(listed.len() == 1, "expected one instance after create, got {}", listed.len());
    ensure!(!listed[0].running, "instance must be stopped after create");

    engine.start(ctx, &id).await.context("demo: start")?;
    let running = engine.list(ctx, &by_app, false).await?;
    ensure!(
        running.iter().any(|i| i.id == id && i.running),
        "instance {id} not listed as running after start"
    );
    writeln!(out, "started {id}")?;

    engine.stop(ctx, &id).await.context("demo: stop")?;
    engine.remove(ctx, &id).await.context("demo: remove")?;
    let left = engine.list(ctx, &by_app, true).await?;
    ensure!(left.is_empty(), "instance {id} still listed after remove");
    writeln!(out, "removed {id}")?;

    Ok(())
}
