pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod raster;
pub mod report;
pub mod request;
pub mod scanner;
pub mod surface;
pub mod symbology;
pub mod util;

pub use error::{EngineError, ScanError};
pub use report::{EngineId, ScanAttempt, ScanResult};
pub use request::{CropRect, PdfOptions, ScanOptions};
pub use scanner::Scanner;
