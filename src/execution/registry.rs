//! Step registry and dependency ordering

use crate::core::step::{normalize_step_id, ExecutableStep};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while resolving an execution order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The dependency graph reachable from the requested steps has a cycle
    #[error("Cyclic dependency at step '{step_id}': {}", path.join(" -> "))]
    CyclicDependency { step_id: String, path: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Catalog of known steps, keyed by case-insensitive id
///
/// Populated once at startup. Registering an id twice replaces the earlier
/// step in place, so registration order is that of the first registration.
#[derive(Default, Clone)]
pub struct StepRegistry {
    steps: Vec<Arc<dyn ExecutableStep>>,
    index: HashMap<String, usize>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a step, replacing any step already registered under the same id
    pub fn register(&mut self, step: Arc<dyn ExecutableStep>) {
        let key = normalize_step_id(step.id());
        match self.index.get(&key) {
            Some(&position) => {
                debug!("Replacing registered step '{}'", step.id());
                self.steps[position] = step;
            }
            None => {
                self.index.insert(key, self.steps.len());
                self.steps.push(step);
            }
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_step(mut self, step: Arc<dyn ExecutableStep>) -> Self {
        self.register(step);
        self
    }

    pub fn get_step(&self, id: &str) -> Option<Arc<dyn ExecutableStep>> {
        self.position(id).map(|position| Arc::clone(&self.steps[position]))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// All steps in registration order
    pub fn all_steps(&self) -> &[Arc<dyn ExecutableStep>] {
        &self.steps
    }

    /// All step ids in registration order
    pub fn all_step_ids(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.id().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.index.get(&normalize_step_id(id)).copied()
    }

    /// Registered step ids that are not in `requested`, in registration order
    pub fn unrequested_step_ids<S: AsRef<str>>(&self, requested: &[S]) -> Vec<String> {
        let requested: HashSet<String> = requested
            .iter()
            .map(|id| normalize_step_id(id.as_ref()))
            .collect();

        self.steps
            .iter()
            .filter(|s| !requested.contains(&normalize_step_id(s.id())))
            .map(|s| s.id().to_string())
            .collect()
    }

    /// Resolve the requested steps into a dependency-respecting order
    ///
    /// Requested ids are deduplicated case-insensitively, keeping the first
    /// occurrence; their iteration order decides the order of independent
    /// steps. Registered dependencies are pulled in even when not requested.
    /// Unknown ids, requested or depended on, are logged and left out. A
    /// cycle fails the whole resolution.
    pub fn build_execution_order<I, S>(
        &self,
        requested: I,
    ) -> Result<Vec<Arc<dyn ExecutableStep>>, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let roots: Vec<String> = requested
            .into_iter()
            .map(|id| normalize_step_id(id.as_ref()))
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let mut marks: HashMap<usize, Mark> = HashMap::new();
        let mut order = Vec::new();

        for root in &roots {
            let Some(root_position) = self.index.get(root).copied() else {
                warn!("Step '{}' is not registered, skipping it", root);
                continue;
            };
            if marks.contains_key(&root_position) {
                continue;
            }

            // Each frame is (step position, index of the next dependency to visit)
            marks.insert(root_position, Mark::InProgress);
            let mut stack: Vec<(usize, usize)> = vec![(root_position, 0)];

            while let Some(frame) = stack.last_mut() {
                let (position, next) = *frame;
                let step = &self.steps[position];

                let Some(dependency) = step.dependencies().get(next) else {
                    stack.pop();
                    marks.insert(position, Mark::Done);
                    order.push(Arc::clone(step));
                    continue;
                };
                frame.1 += 1;

                let Some(dep_position) = self.position(dependency) else {
                    warn!(
                        "Step '{}' depends on unregistered step '{}', ignoring the dependency",
                        step.id(),
                        dependency
                    );
                    continue;
                };

                match marks.get(&dep_position) {
                    Some(Mark::Done) => {}
                    Some(Mark::InProgress) => {
                        return Err(self.cycle_error(&stack, dep_position));
                    }
                    None => {
                        marks.insert(dep_position, Mark::InProgress);
                        stack.push((dep_position, 0));
                    }
                }
            }
        }

        debug!(
            "Resolved execution order: {}",
            order.iter().map(|s| s.id()).collect::<Vec<_>>().join(" -> ")
        );
        Ok(order)
    }

    fn cycle_error(&self, stack: &[(usize, usize)], repeated: usize) -> RegistryError {
        let start = stack
            .iter()
            .position(|(position, _)| *position == repeated)
            .unwrap_or(0);

        let mut path: Vec<String> = stack[start..]
            .iter()
            .map(|(position, _)| self.steps[*position].id().to_string())
            .collect();
        let step_id = self.steps[repeated].id().to_string();
        path.push(step_id.clone());

        RegistryError::CyclicDependency { step_id, path }
    }
}

impl std::fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRegistry")
            .field("steps", &self.all_step_ids())
            .finish()
    }
}
