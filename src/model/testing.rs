//! Test doubles for [`ModelClient`](super::ModelClient).
//!
//! Real trait implementations the test suite drives directly, rather than
//! a mocking framework.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{ModelClient, ModelError, ModelRole};

/// Returns a fixed, pre-programmed sequence of responses, one per call, in
/// order. Panics if exhausted — tests should script exactly as many
/// responses as the scenario needs, so running out means the scenario
/// diverged from what was expected.
pub struct ScriptedModelClient {
    role: ModelRole,
    responses: Mutex<std::collections::VecDeque<Result<String, ModelError>>>,
}

impl ScriptedModelClient {
    #[must_use]
    pub fn new(role: ModelRole, responses: Vec<String>) -> Self {
        Self {
            role,
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
        }
    }

    /// Build a client whose scripted responses can include failures, for
    /// exercising the retry/terminal-error paths.
    #[must_use]
    pub fn with_results(role: ModelRole, responses: Vec<Result<String, ModelError>>) -> Self {
        Self {
            role,
            responses: Mutex::new(responses.into()),
        }
    }

    /// Number of responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    fn role(&self) -> ModelRole {
        self.role
    }

    async fn invoke(&self, _prompt: &str) -> Result<String, ModelError> {
        let mut queue = self.responses.lock().expect("lock poisoned");
        queue
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedModelClient({}) exhausted its scripted responses", self.role))
    }
}

/// Always fails with [`ModelError::InvocationFailed`]. Used to exercise
/// failure paths without scripting a specific message.
pub struct FailingModelClient {
    role: ModelRole,
}

impl FailingModelClient {
    #[must_use]
    pub fn new(role: ModelRole) -> Self {
        Self { role }
    }
}

#[async_trait]
impl ModelClient for FailingModelClient {
    fn role(&self) -> ModelRole {
        self.role
    }

    async fn invoke(&self, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError::InvocationFailed {
            role: self.role,
            message: "simulated failure".into(),
        })
    }
}
