//! Classification feeding the built-in steps

use crate::helpers::*;
use std::sync::Arc;
use ticket_pipeline::{
    builtin_registry, classify_or_fallback, steps::output_key, AgentClassifier, CancelSignal,
    LayerScope, PipelineExecutor, StepContext,
};

const FRONTEND_BUG: &str = r#"Here is my analysis.

```json
{
  "type": "BugFix",
  "scope": ["Frontend"],
  "complexity": "Simple",
  "steps": [
    {"stepId": "implement", "order": 2, "required": true},
    {"stepId": "frontend-analysis", "order": 1, "reason": "button lives in the UI"}
  ],
  "tasks": ["Fix the login button colour"],
  "summary": "Login button uses the wrong colour"
}
```"#;

#[tokio::test]
async fn test_classified_ticket_runs_through_builtin_steps() {
    let agent = Arc::new(MockAgent::new(vec![
        FRONTEND_BUG,
        "data model notes",
        "endpoint notes",
        "component notes",
        "done",
    ]));
    let registry = Arc::new(builtin_registry(agent.clone()));
    let classifier = AgentClassifier::new(agent.clone(), &registry);
    let cancel = CancelSignal::new();

    let mut ctx = StepContext::new("The login button is the wrong colour");
    let classification = classify_or_fallback(&classifier, &mut ctx, &cancel).await;

    assert_eq!(classification.scope, LayerScope::FRONTEND);
    assert_eq!(classification.ordered_step_ids(), vec!["frontend-analysis", "implement"]);
    assert_eq!(ctx.tasks, vec!["Fix the login button colour"]);

    let result = PipelineExecutor::new(registry)
        .execute(&classification, &mut ctx, &cancel)
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(
        result.execution_order,
        vec!["data-analysis", "api-analysis", "frontend-analysis", "implement"]
    );
    assert_eq!(agent.current_index(), 5);
    assert_eq!(ctx.metadata_str(&output_key("api-analysis")), Some("endpoint notes"));
    assert_eq!(result.step_results[3].tasks, vec!["Fix the login button colour"]);
}

#[tokio::test]
async fn test_unparseable_answer_falls_back_to_full_plan() {
    let agent = Arc::new(MockAgent::new(vec!["Sorry, I can't classify this ticket."]));
    let registry = builtin_registry(agent.clone());
    let classifier = AgentClassifier::new(agent.clone(), &registry);

    let mut ctx = StepContext::new("Something vague");
    let classification = classify_or_fallback(&classifier, &mut ctx, &CancelSignal::new()).await;

    assert!(classification.summary.starts_with("Fallback: "));
    assert_eq!(
        classification.ordered_step_ids(),
        vec![
            "data-analysis",
            "api-analysis",
            "frontend-analysis",
            "project-structure",
            "skill-mapping",
            "implement",
        ]
    );
    assert_eq!(classification.scope, LayerScope::all());
    assert!(ctx.is_classified());
}

#[tokio::test]
async fn test_assistant_error_fails_the_step_explicitly() {
    // only the classification answer is scripted, so the first step gets an error
    let agent = Arc::new(MockAgent::new(vec![FRONTEND_BUG]));
    let registry = Arc::new(builtin_registry(agent.clone()));
    let classifier = AgentClassifier::new(agent.clone(), &registry);
    let cancel = CancelSignal::new();

    let mut ctx = StepContext::new("ticket");
    let classification = classify_or_fallback(&classifier, &mut ctx, &cancel).await;
    let result = PipelineExecutor::new(registry)
        .execute(&classification, &mut ctx, &cancel)
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(ids(&result.step_results), vec!["data-analysis"]);
    let error = result.error.unwrap();
    assert!(error.starts_with("Step 'data-analysis' failed: Assistant exited with code 1"));
    assert_eq!(agent.current_index(), 2);
}
