use anyhow::Result;
use barscan::{cli, ScanError};
use clap::Parser;
use tracing::error;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    if let Err(err) = cli::dispatch(args) {
        error!("{:#}", err);
        // 2 for a rejected request, 1 for everything else.
        let code = match err.downcast_ref::<ScanError>() {
            Some(scan_err) if scan_err.status_code() < 500 => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
    Ok(())
}
