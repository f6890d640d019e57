//! Codec configuration

use serde::{Deserialize, Serialize};

/// Default upper bound for a collected request body (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// How a present `data` field is bound to the handler argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamsMode {
    /// Unwrap the first element of the positional `data` array.
    #[default]
    Positional,
    /// Reject any non-null `data` with a "missing params field" error.
    ///
    /// Only `data: null` (or an absent field) is accepted. Kept for hosts
    /// migrating from deployments that relied on that rejection.
    Legacy,
}

/// Configuration shared by every request produced from one codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub params_mode: ParamsMode,
    /// Maximum body size accepted when collecting an HTTP body
    pub max_body_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            params_mode: ParamsMode::default(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}
