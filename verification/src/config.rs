//! Quality gate configuration.

use serde::{Deserialize, Serialize};

/// Smallest accepted capture: 60 KiB. Anything smaller is unusably low quality.
pub const DEFAULT_MIN_IMAGE_BYTES: usize = 60 * 1024;

/// Largest accepted capture: 8 MiB, below the oracle's upload limit.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Byte-length bounds enforced before any upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_min_bytes")]
    pub min_bytes: usize,

    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_min_bytes() -> usize {
    DEFAULT_MIN_IMAGE_BYTES
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_IMAGE_BYTES
}

impl GateConfig {
    /// Whether the bounds admit at least one size.
    pub fn is_valid(&self) -> bool {
        self.min_bytes <= self.max_bytes
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_bytes: default_min_bytes(),
            max_bytes: default_max_bytes(),
        }
    }
}
