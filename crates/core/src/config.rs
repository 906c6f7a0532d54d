//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! services. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent
//! behaviour in multi-threaded runtimes and test harnesses.

use crate::constants::DEFAULT_SYSTEM_NAME;
use crate::error::{BcdError, BcdResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    system_name: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            system_name: DEFAULT_SYSTEM_NAME.to_owned(),
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(system_name: String) -> BcdResult<Self> {
        if system_name.trim().is_empty() {
            return Err(BcdError::Validation("system_name cannot be empty".into()));
        }

        Ok(Self { system_name })
    }

    /// Organisation name stamped into the report footer copyright line.
    pub fn system_name(&self) -> &str {
        &self.system_name
    }
}
