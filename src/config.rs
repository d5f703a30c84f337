//! Run configuration.
//!
//! Which native configuration exists is fixed at build time by `build.rs`.
//! Everything else a run can vary lives in [`CheckConfig`]: what the host
//! does after an elementwise mismatch, and which configurations of a set to
//! run.

use std::env;
use std::str::FromStr;

use crate::error::{invalid_policy, HarnessError, Result};
use crate::simd::AbiKind;

/// Environment variable selecting the [`MismatchPolicy`].
pub const ENV_ON_MISMATCH: &str = "LANECHECK_ON_MISMATCH";

/// Environment variable holding a comma separated ABI filter.
pub const ENV_ABIS: &str = "LANECHECK_ABIS";

/// What the host checker does once an elementwise mismatch has been reported.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// Terminate the process immediately.
    #[default]
    Abort,
    /// Unwind with the failure report, so in-process tests can observe it.
    Panic,
}

impl FromStr for MismatchPolicy {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(MismatchPolicy::Abort),
            "panic" => Ok(MismatchPolicy::Panic),
            _ => Err(invalid_policy(s.trim())),
        }
    }
}

/// Settings for one verification run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckConfig {
    pub on_mismatch: MismatchPolicy,
    /// When set, only these configurations run.
    pub abi_filter: Option<Vec<AbiKind>>,
}

impl CheckConfig {
    pub fn with_policy(mut self, on_mismatch: MismatchPolicy) -> Self {
        self.on_mismatch = on_mismatch;
        self
    }

    pub fn with_abis(mut self, abis: impl IntoIterator<Item = AbiKind>) -> Self {
        self.abi_filter = Some(abis.into_iter().collect());
        self
    }

    /// Reads [`ENV_ON_MISMATCH`] and [`ENV_ABIS`]; unset variables, and an
    /// [`ENV_ABIS`] that names no ABI, keep their defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = CheckConfig::default();

        if let Ok(policy) = env::var(ENV_ON_MISMATCH) {
            config.on_mismatch = policy.parse()?;
        }

        if let Ok(abis) = env::var(ENV_ABIS) {
            let kinds = abis
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(str::parse)
                .collect::<Result<Vec<AbiKind>>>()?;
            // a value naming nothing counts as unset, not as "select nothing"
            if !kinds.is_empty() {
                config.abi_filter = Some(kinds);
            }
        }

        Ok(config)
    }

    /// The configurations of `set` that this run covers, in `set`'s order.
    ///
    /// Errors if the filter is empty or names an ABI that `set` does not
    /// contain, so a filtered run never silently checks nothing.
    pub fn select(&self, set: &[AbiKind], context: &'static str) -> Result<Vec<AbiKind>> {
        let Some(filter) = &self.abi_filter else {
            return Ok(set.to_vec());
        };

        if filter.is_empty() {
            return Err(HarnessError::EmptyAbiFilter { context });
        }

        if let Some(missing) = filter.iter().find(|kind| !set.contains(kind)) {
            return Err(HarnessError::UnsupportedAbi {
                name: missing.name(),
                context,
            });
        }

        Ok(set
            .iter()
            .copied()
            .filter(|kind| filter.contains(kind))
            .collect())
    }
}
