//! Test doubles shared by the scenario tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use ticket_pipeline::{
    AgentError, AgentExecutor, AgentResponse, CancelSignal, Classification, ExecutableStep,
    ExecutionPlan, LayerScope, PipelineObserver, PipelineResult, PlannedStep, StepContext,
    StepResult,
};

/// Order in which mock steps were invoked
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Clone)]
pub enum Behaviour {
    Succeed,
    Fail(&'static str),
    Fault(&'static str),
    /// Wait for cancellation and report it as a failure
    WaitForCancel,
}

/// Step that records its invocation and behaves as scripted
pub struct MockStep {
    id: String,
    dependencies: Vec<String>,
    behaviour: Behaviour,
    log: CallLog,
}

impl MockStep {
    pub fn new(id: &str, deps: &[&str], behaviour: Behaviour, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            behaviour,
            log: log.clone(),
        })
    }
}

#[async_trait]
impl ExecutableStep for MockStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.id
    }

    fn affected_layers(&self) -> LayerScope {
        LayerScope::all()
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    async fn execute(&self, ctx: &mut StepContext, cancel: &CancelSignal) -> anyhow::Result<StepResult> {
        self.log.lock().unwrap().push(self.id.clone());
        ctx.set_metadata(format!("{}.ran", self.id), true);

        match self.behaviour {
            Behaviour::Succeed => Ok(StepResult::ok(&self.id, &self.id)),
            Behaviour::Fail(msg) => Ok(StepResult::failed(&self.id, &self.id, msg)),
            Behaviour::Fault(msg) => Err(anyhow::anyhow!(msg)),
            Behaviour::WaitForCancel => {
                cancel.cancelled().await;
                Ok(StepResult::failed(&self.id, &self.id, "cancelled"))
            }
        }
    }
}

/// Mock agent that returns predefined responses in order
pub struct MockAgent {
    responses: Arc<Vec<String>>,
    index: Arc<AtomicUsize>,
}

impl MockAgent {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(responses.into_iter().map(String::from).collect()),
            index: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many responses have been used
    pub fn current_index(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgentExecutor for MockAgent {
    async fn execute(&self, _prompt: &str, cancel: &CancelSignal) -> Result<AgentResponse, AgentError> {
        if cancel.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(idx) {
            Some(content) => Ok(AgentResponse::new(content.clone())),
            None => Err(AgentError::Exit {
                code: 1,
                stderr: format!("MockAgent: no response available for request {}", idx + 1),
            }),
        }
    }
}

/// Observer that keeps a textual trace of every event
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
    pub plans: Mutex<Vec<ExecutionPlan>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_plan_computed(&self, plan: &ExecutionPlan) {
        self.plans.lock().unwrap().push(plan.clone());
        self.events.lock().unwrap().push("plan".to_string());
    }

    fn on_step_started(&self, step: &dyn ExecutableStep, index: usize, total: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("started {} {}/{}", step.id(), index, total));
    }

    fn on_step_succeeded(&self, step: &dyn ExecutableStep, _result: &StepResult) {
        self.events.lock().unwrap().push(format!("succeeded {}", step.id()));
    }

    fn on_step_failed(&self, step: &dyn ExecutableStep, _result: &StepResult) {
        self.events.lock().unwrap().push(format!("failed {}", step.id()));
    }

    fn on_pipeline_finished(&self, result: &PipelineResult) {
        self.events.lock().unwrap().push(format!("finished {}", result.status));
    }
}

/// Classification requesting `ids` in the given declared order
pub fn classification_for(ids: &[&str]) -> Classification {
    let mut classification = Classification::fallback("scenario");
    classification.steps = ids
        .iter()
        .zip(1..)
        .map(|(id, order)| PlannedStep::new(*id, order))
        .collect();
    classification
}

pub fn ids(results: &[StepResult]) -> Vec<String> {
    results.iter().map(|r| r.step_id.clone()).collect()
}
