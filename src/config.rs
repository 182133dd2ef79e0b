use crate::raster::DEFAULT_RENDER_SCALE;
use crate::symbology::Symbology;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: Scan,
    #[serde(default)]
    pub engines: Engines,
    #[serde(default)]
    pub pdf: Pdf,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub output: Output,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.scan.default_scale.is_finite() && self.scan.default_scale > 0.0) {
            anyhow::bail!("scan.default_scale must be > 0: {}", self.scan.default_scale);
        }
        if self.scan.default_formats.is_empty() {
            anyhow::bail!("scan.default_formats must name at least one format");
        }
        if !self.engines.fast_enabled && !self.engines.general_enabled {
            anyhow::bail!("at least one of engines.fast_enabled / engines.general_enabled must be set");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    /// Formats used when a request names none.
    pub default_formats: Vec<Symbology>,
    pub default_scale: f32,
}
impl Default for Scan {
    fn default() -> Self {
        Self {
            default_formats: vec![Symbology::QR_CODE],
            default_scale: DEFAULT_RENDER_SCALE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engines {
    pub fast_enabled: bool,
    pub general_enabled: bool,
    pub not_found_as_error: bool,
}
impl Default for Engines {
    fn default() -> Self {
        Self {
            fast_enabled: true,
            general_enabled: true,
            not_found_as_error: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pdf {
    /// Empty means: env var, executable dir, then system paths.
    pub pdfium_library_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    pub max_input_bytes: u64,
    /// Applies when every page of a PDF is scanned.
    pub max_pages: u32,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: 50 * 1024 * 1024,
            max_pages: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "barscan.log".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub pretty: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self { pretty: true }
    }
}
