//! Dry runs resolve the plan and touch nothing

use crate::helpers::*;
use std::sync::Arc;
use ticket_pipeline::{PipelineExecutor, PipelineStatus, RegistryError, StepRegistry};

#[test]
fn test_dry_run_invokes_nothing() {
    let log = call_log();
    let observer = Arc::new(RecordingObserver::default());
    let registry = StepRegistry::new()
        .with_step(MockStep::new("data-analysis", &[], Behaviour::Succeed, &log))
        .with_step(MockStep::new("api-analysis", &["data-analysis"], Behaviour::Succeed, &log))
        .with_step(MockStep::new("validate", &[], Behaviour::Succeed, &log));
    let executor = PipelineExecutor::new(Arc::new(registry)).with_observer(observer.clone());

    let result = executor.dry_run(&classification_for(&["api-analysis"])).unwrap();

    assert!(result.success);
    assert_eq!(result.status, PipelineStatus::Planned);
    assert!(result.step_results.is_empty());
    assert_eq!(result.execution_order, vec!["data-analysis", "api-analysis"]);
    assert_eq!(result.skipped_steps, vec!["data-analysis", "validate"]);
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(observer.events(), vec!["plan", "finished Planned"]);
}

#[test]
fn test_dry_run_is_repeatable() {
    let log = call_log();
    let registry = StepRegistry::new()
        .with_step(MockStep::new("c", &["b"], Behaviour::Succeed, &log))
        .with_step(MockStep::new("b", &["a"], Behaviour::Succeed, &log))
        .with_step(MockStep::new("a", &[], Behaviour::Succeed, &log));
    let executor = PipelineExecutor::new(Arc::new(registry));
    let classification = classification_for(&["c"]);

    let first = executor.dry_run(&classification).unwrap();
    let second = executor.dry_run(&classification).unwrap();

    assert_eq!(first.execution_order, vec!["a", "b", "c"]);
    assert_eq!(first.execution_order, second.execution_order);
    assert_eq!(first.skipped_steps, second.skipped_steps);
}

#[test]
fn test_dry_run_reports_cycle() {
    let log = call_log();
    let registry = StepRegistry::new()
        .with_step(MockStep::new("x", &["y"], Behaviour::Succeed, &log))
        .with_step(MockStep::new("y", &["z"], Behaviour::Succeed, &log))
        .with_step(MockStep::new("z", &["x"], Behaviour::Succeed, &log));
    let executor = PipelineExecutor::new(Arc::new(registry));

    let err = executor.dry_run(&classification_for(&["x"])).err().unwrap();

    assert_eq!(
        err,
        RegistryError::CyclicDependency {
            step_id: "x".to_string(),
            path: vec!["x".into(), "y".into(), "z".into(), "x".into()],
        }
    );
}

#[test]
fn test_empty_classification_plans_nothing() {
    let log = call_log();
    let registry = StepRegistry::new().with_step(MockStep::new("a", &[], Behaviour::Succeed, &log));
    let executor = PipelineExecutor::new(Arc::new(registry));

    let result = executor.dry_run(&classification_for(&[])).unwrap();

    assert!(result.execution_order.is_empty());
    assert_eq!(result.skipped_steps, vec!["a"]);
}
