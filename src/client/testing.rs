//! Scripted executor used by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use crate::client::{ApiRequest, RequestExecutor};
use crate::error::{ClientError, Result};

/// Replays queued outcomes in order, then falls back to a fixed response.
#[derive(Default)]
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<Result<Value>>>,
    fallback: Option<Value>,
    requests: Mutex<Vec<(ApiRequest, Instant)>>,
}

impl ScriptedExecutor {
    pub fn new(script: Vec<Result<Value>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    /// Answers every call with `value`.
    pub fn repeating(value: Value) -> Self {
        Self {
            fallback: Some(value),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(req, _)| req.clone())
            .collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.requests.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(&self, request: &ApiRequest) -> Result<Value> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), Instant::now()));

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(outcome) => outcome,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| ClientError::Unknown("script exhausted".into())),
        }
    }
}
