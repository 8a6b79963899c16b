//! The parsing pipeline: workout text in, exercise records out.
//!
//! ```text
//! text ──trim──> Gateway::call ──> sanitize::clean ──> validate ──> records
//! ```
//!
//! Blank input short-circuits to an empty list without touching the
//! gateway.  Each call is independent: no caching, no deduplication.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, info, warn};

use liftnote_agent::{Gateway, GatewayConfig, LlmClient, LlmGateway};

use crate::error::{ParserError, Result};
use crate::prompt::system_prompt;
use crate::record::ExerciseRecord;
use crate::sanitize::clean;
use crate::validate::validate;

/// Parse `text` using `gateway`.
pub async fn parse_workout(gateway: &dyn Gateway, text: &str) -> Result<Vec<ExerciseRecord>> {
    let text = text.trim();
    if text.is_empty() {
        debug!("blank workout text, skipping gateway");
        return Ok(Vec::new());
    }

    debug!(chars = text.len(), "parsing workout text");

    let result = run(gateway, text).await;
    match &result {
        Ok(records) => info!(count = records.len(), "workout text parsed"),
        Err(e) => warn!(kind = e.kind(), error = %e, "workout text rejected"),
    }
    result
}

async fn run(gateway: &dyn Gateway, text: &str) -> Result<Vec<ExerciseRecord>> {
    let raw = AssertUnwindSafe(gateway.call(system_prompt(), text))
        .catch_unwind()
        .await
        .map_err(|payload| ParserError::Internal {
            reason: "gateway call panicked".into(),
            source: Some(panic_message(payload).into()),
        })??;

    let records = validate(clean(&raw))?;
    Ok(records)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

// ---------------------------------------------------------------------------
// WorkoutParser
// ---------------------------------------------------------------------------

/// A parser bound to one gateway.
///
/// Cheap to clone; clones share the gateway.
#[derive(Clone)]
pub struct WorkoutParser {
    gateway: Arc<dyn Gateway>,
}

impl WorkoutParser {
    /// Create a parser that sends requests through `gateway`.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Create a parser backed by the HTTP gateway described by `config`.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let client = LlmClient::new(config)?;
        Ok(Self::new(Arc::new(LlmGateway::new(client))))
    }

    /// Parse one piece of workout text.
    pub async fn parse(&self, text: &str) -> Result<Vec<ExerciseRecord>> {
        parse_workout(self.gateway.as_ref(), text).await
    }
}

impl std::fmt::Debug for WorkoutParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkoutParser").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
