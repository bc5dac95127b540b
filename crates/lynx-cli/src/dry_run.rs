//! A transport that records scripts instead of sending them.

use std::sync::{Mutex, PoisonError};

use lynx_gremlin::{ResultSet, Transport, TransportError};

/// Records every submitted script and answers with an empty result set.
#[derive(Debug, Default)]
pub struct DryRunTransport {
    scripts: Mutex<Vec<String>>,
}

impl DryRunTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts submitted so far, oldest first.
    pub fn scripts(&self) -> Vec<String> {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, script: &str) {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(script.to_string());
    }
}

impl Transport for DryRunTransport {
    async fn submit(&self, script: &str) -> Result<ResultSet, TransportError> {
        tracing::debug!(script = %script, "Dry run, script not sent");
        self.record(script);
        Ok(ResultSet::default())
    }
}
