use crate::{
    config::Config,
    engine::EngineChain,
    error::ScanError,
    raster::PdfiumRasterizer,
    request::{ContentType, CropRect, PdfOptions, ScanOptions},
    scanner::Scanner,
    symbology::Symbology,
    util::ensure_dir,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "barscan")]
#[command(about = "Barcode scan orchestrator for images and PDFs")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./barscan.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan an image or PDF and print the result as JSON.
    Scan(ScanArgs),
    /// List the barcode format names a scan accepts.
    Formats {},
    /// Report engine order and whether PDFium can be loaded.
    Doctor {},
}

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    #[arg(long)]
    pub input: PathBuf,

    /// image/png, image/jpeg or application/pdf. Guessed from the extension when omitted.
    #[arg(long)]
    pub content_type: Option<String>,

    /// JSON file with scan options (contentType, formats, crop, pdfOptions).
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Barcode format name; repeatable. Replaces formats from --options.
    #[arg(long = "format")]
    pub formats: Vec<String>,

    /// Crop rectangle as x,y,width,height percentages; repeatable.
    #[arg(long = "crop", allow_hyphen_values = true)]
    pub crops: Vec<CropRect>,

    /// 1-based PDF page; repeatable.
    #[arg(long = "page")]
    pub pages: Vec<u32>,

    /// PDF render scale.
    #[arg(long)]
    pub scale: Option<f32>,
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    match &args.cmd {
        Command::Scan(scan_args) => scan(&cfg, scan_args),
        Command::Formats {} => formats(&cfg),
        Command::Doctor {} => doctor(&cfg),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    ["barscan.toml", "barscan.example.toml"]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the JSON result, so logs go to stderr.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file || cfg.logging.file_path.is_empty() {
        return None;
    }
    Some(PathBuf::from(&cfg.logging.file_path))
}

fn scan(cfg: &Config, args: &ScanArgs) -> Result<()> {
    let bytes = read_input(cfg, &args.input)?;
    let options = build_options(args)?;

    let scanner = Scanner::new(cfg, rasterizer(cfg));
    match scanner.scan(&bytes, &options) {
        Ok(result) => print_json(cfg, &result),
        Err(err) => {
            print_json(cfg, &err.to_body())?;
            Err(scan_failure(err))
        }
    }
}

fn scan_failure(err: ScanError) -> anyhow::Error {
    let status = err.status_code();
    anyhow::Error::new(err).context(format!("scan failed (status {status})"))
}

fn read_input(cfg: &Config, input: &Path) -> Result<Vec<u8>> {
    let meta = std::fs::metadata(input).with_context(|| format!("stat input: {}", input.display()))?;
    if meta.len() > cfg.limits.max_input_bytes {
        anyhow::bail!(
            "input exceeds limits.max_input_bytes: {} > {}",
            meta.len(),
            cfg.limits.max_input_bytes
        );
    }
    std::fs::read(input).with_context(|| format!("reading input: {}", input.display()))
}

/// Options file first, then command-line flags on top of it.
fn build_options(args: &ScanArgs) -> Result<ScanOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading options: {}", path.display()))?;
            serde_json::from_str::<ScanOptions>(&raw).with_context(|| "parsing options JSON")?
        }
        None => ScanOptions::default(),
    };

    if let Some(ct) = &args.content_type {
        options.content_type = ct.clone();
    }
    if options.content_type.is_empty() {
        let guessed = args
            .input
            .extension()
            .and_then(|s| s.to_str())
            .and_then(ContentType::from_extension);
        match guessed {
            Some(ct) => options.content_type = ct.mime().to_string(),
            None => warn!(
                "cannot guess content type from {}; pass --content-type",
                args.input.display()
            ),
        }
    }

    if !args.formats.is_empty() {
        options.formats = args.formats.clone();
    }
    if !args.crops.is_empty() {
        options.crop = args.crops.clone();
    }
    if !args.pages.is_empty() || args.scale.is_some() {
        let pdf = options.pdf_options.get_or_insert_with(PdfOptions::default);
        if !args.pages.is_empty() {
            pdf.pages = Some(args.pages.clone());
        }
        if args.scale.is_some() {
            pdf.scale = args.scale;
        }
    }

    Ok(options)
}

fn rasterizer(cfg: &Config) -> PdfiumRasterizer {
    let path = &cfg.pdf.pdfium_library_path;
    PdfiumRasterizer::new((!path.is_empty()).then(|| PathBuf::from(path)))
}

fn formats(cfg: &Config) -> Result<()> {
    let names: Vec<&str> = Symbology::ALL.iter().map(|s| s.name()).collect();
    print_json(
        cfg,
        &serde_json::json!({
            "formats": names,
            "default": cfg.scan.default_formats,
        }),
    )
}

fn doctor(cfg: &Config) -> Result<()> {
    let engines = EngineChain::from_config(cfg);
    let pdfium = rasterizer(cfg).check();
    if let Err(e) = &pdfium {
        warn!("PDFium unavailable: {e}");
    } else {
        info!("PDFium loaded");
    }
    print_json(
        cfg,
        &serde_json::json!({
            "engines": engines.ids(),
            "defaultFormats": cfg.scan.default_formats,
            "defaultScale": cfg.scan.default_scale,
            "pdfium": {
                "ok": pdfium.is_ok(),
                "error": pdfium.err().map(|e| e.to_string()),
            },
        }),
    )
}

fn print_json<T: Serialize>(cfg: &Config, value: &T) -> Result<()> {
    let out = if cfg.output.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
