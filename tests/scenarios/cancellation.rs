//! Cancellation reaches the running step and stops the pipeline

use crate::helpers::*;
use std::sync::Arc;
use std::time::Duration;
use ticket_pipeline::{CancelSignal, PipelineExecutor, StepContext, StepRegistry};

#[tokio::test]
async fn test_cancel_reaches_running_step() {
    let log = call_log();
    let registry = StepRegistry::new()
        .with_step(MockStep::new("analyse", &[], Behaviour::WaitForCancel, &log))
        .with_step(MockStep::new("implement", &["analyse"], Behaviour::Succeed, &log));
    let executor = PipelineExecutor::new(Arc::new(registry));

    let cancel = CancelSignal::new();
    let _timer = cancel.cancel_after(Duration::from_millis(50));

    let mut ctx = StepContext::new("ticket");
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        executor.execute(&classification_for(&["implement"]), &mut ctx, &cancel),
    )
    .await
    .expect("pipeline should stop once cancelled")
    .unwrap();

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Step 'analyse' failed: cancelled"));
    assert_eq!(*log.lock().unwrap(), vec!["analyse"]);
}

#[tokio::test]
async fn test_cancelled_signal_prevents_first_step() {
    let log = call_log();
    let observer = Arc::new(RecordingObserver::default());
    let registry = StepRegistry::new().with_step(MockStep::new("a", &[], Behaviour::Succeed, &log));
    let executor = PipelineExecutor::new(Arc::new(registry)).with_observer(observer.clone());

    let cancel = CancelSignal::new();
    cancel.cancel();

    let mut ctx = StepContext::new("ticket");
    let result = executor
        .execute(&classification_for(&["a"]), &mut ctx, &cancel)
        .await
        .unwrap();

    assert!(!result.success);
    assert!(result.step_results.is_empty());
    assert_eq!(result.error.as_deref(), Some("Pipeline cancelled before step 'a'"));
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(observer.events(), vec!["plan", "finished Failed"]);
}

#[tokio::test]
async fn test_agent_sees_cancellation() {
    let agent = Arc::new(MockAgent::new(vec!["unused"]));
    let registry = Arc::new(ticket_pipeline::builtin_registry(agent.clone()));
    let executor = PipelineExecutor::new(registry);

    let cancel = CancelSignal::new();
    cancel.cancel();

    let mut ctx = StepContext::new("ticket");
    let result = executor
        .execute_step("data-analysis", &mut ctx, &cancel)
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Assistant call was cancelled"));
    assert_eq!(agent.current_index(), 0);
}
