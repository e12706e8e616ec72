use std::io::{self, Write};

use anyhow::Result;
use waymark_core::{ErrorPayload, WaymarkError};

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Installs the stderr log subscriber; debug events only with `verbose`.
pub(crate) fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Error payload for a failed command. The code comes from the innermost
/// [`WaymarkError`] in the chain; the message keeps every context layer.
pub(super) fn failure_payload(operation: &str, err: &anyhow::Error) -> ErrorPayload {
    let mut payload = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<WaymarkError>())
        .map_or_else(
            || WaymarkError::Internal(err.to_string()).to_payload(operation),
            |cause| cause.to_payload(operation),
        );
    payload.message = format!("{err:#}");
    payload
}

pub(crate) fn report_failure(operation: &str, err: &anyhow::Error) {
    let payload = failure_payload(operation, err);
    match serde_json::to_string(&payload) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{operation} failed: {err:#}"),
    }
}
