// Test double that records actions instead of running them

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::runner::{Action, ActionRunner};

type FailWhen = Arc<dyn Fn(&Action) -> bool + Send + Sync>;

/// Clones share the same action log
#[derive(Clone, Default)]
pub(crate) struct RecordingRunner {
    actions: Arc<Mutex<Vec<Action>>>,
    fail_when: Option<FailWhen>,
}

impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record every action, failing those matching `predicate`
    pub(crate) fn failing_when(predicate: impl Fn(&Action) -> bool + Send + Sync + 'static) -> Self {
        Self {
            actions: Arc::default(),
            fail_when: Some(Arc::new(predicate)),
        }
    }

    pub(crate) fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionRunner for RecordingRunner {
    async fn execute(&self, action: &Action) -> Result<()> {
        self.actions.lock().unwrap().push(action.clone());
        if self.fail_when.as_ref().is_some_and(|fail| fail(action)) {
            bail!("simulated failure: {}", action);
        }
        Ok(())
    }
}
