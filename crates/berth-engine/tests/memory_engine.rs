//! Engine contract checks against the in-memory backend.
#![cfg(feature = "memory")]

use std::{sync::Arc, time::Duration};

use berth_core::{Engine, EngineError, MeteredEngine, OpContext};
use berth_engine::memory::MemoryEngine;
use berth_model::{LabelFilter, ServiceSpec};

fn svc(labels: &[(&str, &str)]) -> ServiceSpec {
    labels
        .iter()
        .fold(ServiceSpec::new("alpine:latest"), |s, (k, v)| s.with_label(*k, *v))
}

#[tokio::test]
async fn lifecycle_scenario() {
    let engine = MemoryEngine::new();
    let ctx = OpContext::new();
    let by_app = LabelFilter::new().has_value("app", "x");

    let id = engine.create(&ctx, "svc1", &svc(&[("app", "x")])).await.unwrap();
    assert!(!id.is_empty());

    let listed = engine.list(&ctx, &by_app, true).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert!(!listed[0].running);

    engine.start(&ctx, &id).await.unwrap();
    let listed = engine.list(&ctx, &by_app, true).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].running);

    engine.stop(&ctx, &id).await.unwrap();
    engine.remove(&ctx, &id).await.unwrap();
    let listed = engine.list(&ctx, &LabelFilter::new(), true).await.unwrap();
    assert!(listed.iter().all(|i| i.id != id));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let engine = MemoryEngine::new();
    let ctx = OpContext::new();

    assert!(engine.start(&ctx, "ghost").await.unwrap_err().is_not_found());
    assert!(engine.stop(&ctx, "ghost").await.unwrap_err().is_not_found());
    assert!(engine.remove(&ctx, "ghost").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn remove_twice_reports_not_found_the_second_time() {
    let engine = MemoryEngine::new();
    let ctx = OpContext::new();
    let id = engine.create(&ctx, "once", &svc(&[])).await.unwrap();

    engine.remove(&ctx, &id).await.unwrap();
    match engine.remove(&ctx, &id).await {
        Err(EngineError::InstanceNotFound { id: missing }) => assert_eq!(missing, id),
        other => panic!("expected InstanceNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn list_applies_every_filter() {
    let engine = MemoryEngine::new();
    let ctx = OpContext::new();

    let both = engine
        .create(&ctx, "both", &svc(&[("app", "x"), ("managed", "yes")]))
        .await
        .unwrap();
    engine
        .create(&ctx, "wrong-value", &svc(&[("app", "y"), ("managed", "yes")]))
        .await
        .unwrap();
    engine
        .create(&ctx, "missing-key", &svc(&[("app", "x")]))
        .await
        .unwrap();

    let filter = LabelFilter::new().has_key("managed").has_value("app", "x");
    let listed = engine.list(&ctx, &filter, true).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, both);
    assert!(listed.iter().all(|i| filter.matches(&i.labels)));

    let everything = engine.list(&ctx, &LabelFilter::new(), true).await.unwrap();
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn stopped_instances_need_include_stopped() {
    let engine = MemoryEngine::new();
    let ctx = OpContext::new();
    let running = engine.create(&ctx, "up", &svc(&[])).await.unwrap();
    let stopped = engine.create(&ctx, "down", &svc(&[])).await.unwrap();
    engine.start(&ctx, &running).await.unwrap();

    let only_running = engine.list(&ctx, &LabelFilter::new(), false).await.unwrap();
    assert!(only_running.iter().all(|i| i.running));
    assert_eq!(only_running.len(), 1);

    let all = engine.list(&ctx, &LabelFilter::new(), true).await.unwrap();
    let ids: Vec<_> = all.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec![running.as_str(), stopped.as_str()]);
}

#[tokio::test]
async fn names_are_unique_and_specs_are_validated() {
    let engine = MemoryEngine::new();
    let ctx = OpContext::new();
    engine.create(&ctx, "svc1", &svc(&[])).await.unwrap();

    let err = engine.create(&ctx, "svc1", &svc(&[])).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let err = engine
        .create(&ctx, "svc2", &ServiceSpec::new(" "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidSpec(_)));
    assert_eq!(engine.len(), 1);
}

#[tokio::test]
async fn running_instances_cannot_be_removed() {
    let engine = MemoryEngine::new();
    let ctx = OpContext::new();
    let id = engine.create(&ctx, "busy", &svc(&[])).await.unwrap();
    engine.start(&ctx, &id).await.unwrap();

    let err = engine.remove(&ctx, &id).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    engine.stop(&ctx, &id).await.unwrap();
    engine.remove(&ctx, &id).await.unwrap();
}

#[tokio::test]
async fn canceled_context_short_circuits() {
    let engine = MemoryEngine::new();
    let ctx = OpContext::new().with_timeout(Duration::from_secs(5));
    ctx.cancel();

    let err = engine.create(&ctx, "never", &svc(&[])).await.unwrap_err();
    assert!(matches!(err, EngineError::Canceled));
    assert!(engine.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_engine() {
    let engine = Arc::new(MeteredEngine::unmetered(MemoryEngine::new()));
    let mut handles = Vec::new();

    for n in 0..16 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let ctx = OpContext::new();
            let id = engine
                .create(&ctx, &format!("svc-{n}"), &svc(&[("batch", "1")]))
                .await?;
            engine.start(&ctx, &id).await?;
            Ok::<_, EngineError>(id)
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let listed = engine
        .list(&OpContext::new(), &LabelFilter::new().has_value("batch", "1"), false)
        .await
        .unwrap();
    assert_eq!(listed.len(), 16);
    assert_eq!(engine.inner().len(), 16);
}
