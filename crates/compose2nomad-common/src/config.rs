//! Conversion options shared by the library entry points and the CLI.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DATACENTER, DEFAULT_JOB_NAME, DEFAULT_JOB_TYPE};
use crate::error::{ConvertError, Result};

/// Job-level settings applied to every conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Label of the emitted `job` block.
    pub job_name: String,
    /// Value of the job's `datacenters` attribute.
    pub datacenters: Vec<String>,
    /// Value of the job's `type` attribute.
    pub job_type: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            job_name: DEFAULT_JOB_NAME.to_owned(),
            datacenters: vec![DEFAULT_DATACENTER.to_owned()],
            job_type: DEFAULT_JOB_TYPE.to_owned(),
        }
    }
}

impl ConvertOptions {
    /// Checks that the options can produce a usable job.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Config`] if the job name is blank or no
    /// non-blank datacenter is configured.
    pub fn validate(&self) -> Result<()> {
        if self.job_name.trim().is_empty() {
            return Err(ConvertError::Config {
                message: "job name must not be empty".into(),
            });
        }
        if self.datacenters.is_empty() || self.datacenters.iter().any(|dc| dc.trim().is_empty()) {
            return Err(ConvertError::Config {
                message: "at least one non-empty datacenter is required".into(),
            });
        }
        Ok(())
    }
}
