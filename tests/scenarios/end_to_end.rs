//! Full runs: dependency expansion, skip tracking and context updates

use crate::helpers::*;
use std::sync::Arc;
use ticket_pipeline::{CancelSignal, PipelineExecutor, PipelineStatus, StepContext, StepRegistry};

fn analysis_registry(log: &CallLog) -> StepRegistry {
    StepRegistry::new()
        .with_step(MockStep::new("data-analysis", &[], Behaviour::Succeed, log))
        .with_step(MockStep::new("api-analysis", &["data-analysis"], Behaviour::Succeed, log))
        .with_step(MockStep::new("frontend-analysis", &["api-analysis"], Behaviour::Succeed, log))
        .with_step(MockStep::new("implement", &[], Behaviour::Succeed, log))
}

#[tokio::test]
async fn test_pulled_in_dependency_still_counts_as_skipped() {
    let log = call_log();
    let observer = Arc::new(RecordingObserver::default());
    let executor =
        PipelineExecutor::new(Arc::new(analysis_registry(&log))).with_observer(observer.clone());

    let mut ctx = StepContext::new("Expose invoices over the API");
    let result = executor
        .execute(&classification_for(&["api-analysis", "implement"]), &mut ctx, &CancelSignal::new())
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.status, PipelineStatus::Succeeded);
    assert_eq!(result.execution_order, vec!["data-analysis", "api-analysis", "implement"]);
    assert_eq!(ids(&result.step_results), vec!["data-analysis", "api-analysis", "implement"]);
    assert_eq!(result.skipped_steps, vec!["data-analysis", "frontend-analysis"]);
    assert_eq!(*log.lock().unwrap(), vec!["data-analysis", "api-analysis", "implement"]);

    let plans = observer.plans.lock().unwrap();
    assert_eq!(plans[0].requested, vec!["api-analysis", "implement"]);
    assert_eq!(plans[0].pulled_in(), vec!["data-analysis"]);
}

#[tokio::test]
async fn test_context_tracks_progress_and_skips() {
    let log = call_log();
    let executor = PipelineExecutor::new(Arc::new(analysis_registry(&log)));

    let mut ctx = StepContext::new("Add a dashboard page");
    let classification = classification_for(&["frontend-analysis"]);
    executor
        .execute(&classification, &mut ctx, &CancelSignal::new())
        .await
        .unwrap();

    assert_eq!(ctx.current_step_index, 3);
    assert_eq!(ctx.skipped_steps, vec!["data-analysis", "api-analysis", "implement"]);
    assert_eq!(ctx.classification.as_ref(), Some(&classification));
    assert_eq!(ctx.metadata("frontend-analysis.ran"), Some(&serde_json::json!(true)));
}

#[tokio::test]
async fn test_declared_order_is_advisory() {
    let log = call_log();
    let executor = PipelineExecutor::new(Arc::new(analysis_registry(&log)));

    // implement declared first, api-analysis still waits for data-analysis
    let mut ctx = StepContext::new("ticket");
    let result = executor
        .execute(
            &classification_for(&["implement", "api-analysis", "data-analysis"]),
            &mut ctx,
            &CancelSignal::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.execution_order, vec!["implement", "data-analysis", "api-analysis"]);
    assert_eq!(result.skipped_steps, vec!["frontend-analysis"]);
}

#[tokio::test]
async fn test_unknown_requested_step_is_ignored() {
    let log = call_log();
    let executor = PipelineExecutor::new(Arc::new(analysis_registry(&log)));

    let mut ctx = StepContext::new("ticket");
    let result = executor
        .execute(&classification_for(&["deploy", "IMPLEMENT"]), &mut ctx, &CancelSignal::new())
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(ids(&result.step_results), vec!["implement"]);
    assert!(!result.skipped_steps.contains(&"implement".to_string()));
}

#[tokio::test]
async fn test_observer_sees_events_in_order() {
    let log = call_log();
    let observer = Arc::new(RecordingObserver::default());
    let executor =
        PipelineExecutor::new(Arc::new(analysis_registry(&log))).with_observer(observer.clone());

    let mut ctx = StepContext::new("ticket");
    executor
        .execute(&classification_for(&["api-analysis"]), &mut ctx, &CancelSignal::new())
        .await
        .unwrap();

    assert_eq!(
        observer.events(),
        vec![
            "plan",
            "started data-analysis 1/2",
            "succeeded data-analysis",
            "started api-analysis 2/2",
            "succeeded api-analysis",
            "finished Succeeded",
        ]
    );
}
