pub mod fast;
pub mod general;

use crate::config::Config;
use crate::error::EngineError;
use crate::report::EngineId;
use crate::surface::Surface;
use crate::symbology::FormatSet;

pub use fast::FastQrEngine;
pub use general::GeneralEngine;

/// A barcode decoding capability. `Ok(None)` means nothing was found;
/// `Err` is recorded as a failed attempt and never aborts the scan.
pub trait DecodeEngine: Send + Sync {
    fn id(&self) -> EngineId;

    /// Whether this engine has anything to do for the requested formats.
    /// Engines that return false are skipped without an attempt entry.
    fn supports(&self, formats: &FormatSet) -> bool;

    fn decode(&self, surface: &Surface, formats: &FormatSet) -> Result<Option<String>, EngineError>;
}

/// Engines in priority order. The scanner tries them front to back and
/// stops at the first decoded text.
pub struct EngineChain {
    engines: Vec<Box<dyn DecodeEngine>>,
}

impl EngineChain {
    pub fn new(engines: Vec<Box<dyn DecodeEngine>>) -> Self {
        Self { engines }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let mut engines: Vec<Box<dyn DecodeEngine>> = Vec::new();
        if cfg.engines.fast_enabled {
            engines.push(Box::new(FastQrEngine::new()));
        }
        if cfg.engines.general_enabled {
            engines.push(Box::new(GeneralEngine::new(cfg.engines.not_found_as_error)));
        }
        Self { engines }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DecodeEngine> {
        self.engines.iter().map(|e| e.as_ref())
    }

    pub fn ids(&self) -> Vec<EngineId> {
        self.iter().map(|e| e.id()).collect()
    }
}
