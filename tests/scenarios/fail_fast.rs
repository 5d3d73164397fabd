//! The first failure, explicit or faulted, stops the run

use crate::helpers::*;
use std::sync::Arc;
use ticket_pipeline::{CancelSignal, PipelineExecutor, PipelineStatus, StepContext, StepRegistry};

fn registry(b: Behaviour, log: &CallLog) -> StepRegistry {
    StepRegistry::new()
        .with_step(MockStep::new("a", &[], Behaviour::Succeed, log))
        .with_step(MockStep::new("b", &[], b, log))
        .with_step(MockStep::new("c", &[], Behaviour::Succeed, log))
}

#[tokio::test]
async fn test_explicit_failure_halts_remaining_steps() {
    let log = call_log();
    let executor = PipelineExecutor::new(Arc::new(registry(Behaviour::Fail("build broken"), &log)));

    let mut ctx = StepContext::new("ticket");
    let result = executor
        .execute(&classification_for(&["a", "b", "c"]), &mut ctx, &CancelSignal::new())
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.status, PipelineStatus::Failed);
    assert_eq!(ids(&result.step_results), vec!["a", "b"]);
    assert!(result.step_results[0].success);
    assert!(!result.step_results[1].success);
    assert_eq!(result.error.as_deref(), Some("Step 'b' failed: build broken"));
    assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
}

#[tokio::test]
async fn test_fault_is_converted_and_halts() {
    let log = call_log();
    let observer = Arc::new(RecordingObserver::default());
    let executor = PipelineExecutor::new(Arc::new(registry(Behaviour::Fault("connection reset"), &log)))
        .with_observer(observer.clone());

    let mut ctx = StepContext::new("ticket");
    let result = executor
        .execute(&classification_for(&["a", "b", "c"]), &mut ctx, &CancelSignal::new())
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("connection reset"));
    assert_eq!(ids(&result.step_results), vec!["a", "b"]);
    assert_eq!(result.step_results[1].error.as_deref(), Some("connection reset"));
    assert_eq!(result.failed_step().map(|r| r.step_id.as_str()), Some("b"));
    assert!(!log.lock().unwrap().contains(&"c".to_string()));
    assert_eq!(observer.events().last().map(String::as_str), Some("finished Failed"));
}

#[tokio::test]
async fn test_failed_dependency_stops_dependent() {
    let log = call_log();
    let registry = StepRegistry::new()
        .with_step(MockStep::new("data-analysis", &[], Behaviour::Fail("schema unreadable"), &log))
        .with_step(MockStep::new("api-analysis", &["data-analysis"], Behaviour::Succeed, &log));
    let executor = PipelineExecutor::new(Arc::new(registry));

    let mut ctx = StepContext::new("ticket");
    let result = executor
        .execute(&classification_for(&["api-analysis"]), &mut ctx, &CancelSignal::new())
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(*log.lock().unwrap(), vec!["data-analysis"]);
    assert_eq!(ctx.current_step_index, 1);
}

#[tokio::test]
async fn test_cycle_fails_before_any_step_runs() {
    let log = call_log();
    let registry = StepRegistry::new()
        .with_step(MockStep::new("a", &["b"], Behaviour::Succeed, &log))
        .with_step(MockStep::new("b", &["a"], Behaviour::Succeed, &log));
    let executor = PipelineExecutor::new(Arc::new(registry));

    let mut ctx = StepContext::new("ticket");
    let err = executor
        .execute(&classification_for(&["a"]), &mut ctx, &CancelSignal::new())
        .await
        .err()
        .unwrap();

    assert!(err.to_string().contains("a -> b -> a"));
    assert!(log.lock().unwrap().is_empty());
}
