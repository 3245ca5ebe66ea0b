//! Engine contract checks against a real Docker daemon.
//!
//! Requires Docker and the `alpine:latest` image. Set RUN_DOCKER_TESTS=1 to run.
//!
//! Example:
//!   RUN_DOCKER_TESTS=1 cargo test -p berth-engine --test docker_engine
#![cfg(feature = "docker")]

use std::time::Duration;

use berth_core::{Engine, OpContext};
use berth_engine::docker::DockerEngine;
use berth_model::{LabelFilter, ServiceSpec};

const IMAGE: &str = "alpine:latest";

fn should_run_docker_tests() -> bool {
    std::env::var("RUN_DOCKER_TESTS")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{prefix}-{}-{nanos}", std::process::id())
}

fn ctx() -> OpContext {
    OpContext::new().with_timeout(Duration::from_secs(60))
}

#[tokio::test]
async fn lifecycle_scenario() {
    if !should_run_docker_tests() {
        eprintln!("skipping: RUN_DOCKER_TESTS not set");
        return;
    }
    let engine = DockerEngine::new().expect("docker client");
    engine.ping(&ctx()).await.expect("docker daemon reachable");

    let marker = unique("berth-test");
    let spec = ServiceSpec::new(IMAGE)
        .with_command(["sleep", "300"])
        .with_label("app", &marker);
    let by_app = LabelFilter::new().has_value("app", &marker);

    let id = engine.create(&ctx(), &marker, &spec).await.unwrap();
    assert!(!id.is_empty());

    let listed = engine.list(&ctx(), &by_app, true).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert!(!listed[0].running);
    assert!(engine.list(&ctx(), &by_app, false).await.unwrap().is_empty());

    engine.start(&ctx(), &id).await.unwrap();
    let listed = engine.list(&ctx(), &by_app, false).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].running);

    engine.stop(&ctx(), &id).await.unwrap();
    engine.remove(&ctx(), &id).await.unwrap();
    assert!(engine.list(&ctx(), &by_app, true).await.unwrap().is_empty());

    assert!(engine.remove(&ctx(), &id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    if !should_run_docker_tests() {
        eprintln!("skipping: RUN_DOCKER_TESTS not set");
        return;
    }
    let engine = DockerEngine::new().expect("docker client");
    let ghost = unique("berth-ghost");

    assert!(engine.start(&ctx(), &ghost).await.unwrap_err().is_not_found());
    assert!(engine.stop(&ctx(), &ghost).await.unwrap_err().is_not_found());
    assert!(engine.remove(&ctx(), &ghost).await.unwrap_err().is_not_found());
}
