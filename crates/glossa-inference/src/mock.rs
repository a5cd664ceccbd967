//! Mock generator for deterministic testing.
//!
//! Scripted per schema name: each `request_json` call pops the next scripted
//! response for that schema. Always compiled so pipeline tests in other
//! crates can use it.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use glossa_core::{Error, JsonGenerator, Result};

#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Failure(String),
}

/// One recorded call to the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub schema_name: String,
    pub input: String,
}

/// Deterministic [`JsonGenerator`] for tests.
#[derive(Clone, Default)]
pub struct MockGenerator {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for the given schema name.
    pub fn with_response(self, schema_name: &str, text: impl Into<String>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(schema_name.to_string())
            .or_default()
            .push_back(Scripted::Text(text.into()));
        self
    }

    /// Queue an upstream failure for the given schema name.
    pub fn with_failure(self, schema_name: &str, message: impl Into<String>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(schema_name.to_string())
            .or_default()
            .push_back(Scripted::Failure(message.into()));
        self
    }

    /// All calls recorded so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls recorded for one schema name.
    pub fn call_count(&self, schema_name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.schema_name == schema_name)
            .count()
    }
}

#[async_trait]
impl JsonGenerator for MockGenerator {
    async fn request_json(
        &self,
        input: &str,
        schema_name: &str,
        _schema: &Value,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            schema_name: schema_name.to_string(),
            input: input.to_string(),
        });

        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(schema_name)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Failure(message)) => Err(Error::Upstream(message)),
            None => Err(Error::Upstream(format!(
                "no scripted response for schema '{}'",
                schema_name
            ))),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
