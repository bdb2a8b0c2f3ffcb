//! Tracing (logging) initialization for the server binary.

use std::{fs, io, path::Path};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};


#[derive(Debug, Error)]
pub enum TracingInitializationError {
    #[error("unable to create log file output directory {}", .directory_path.display())]
    UnableToCreateLogFileOutputDirectory {
        directory_path: std::path::PathBuf,

        #[source]
        error: io::Error,
    },

    #[error("unable to install the global tracing subscriber")]
    UnableToSetGlobalSubscriber {
        #[from]
        #[source]
        error: TryInitError,
    },
}


/// Initializes the global tracing subscriber with two layers:
/// formatted console output and a daily-rotated log file,
/// each behind its own level filter.
///
/// The returned [`WorkerGuard`] must be kept alive for the duration of
/// the program -- dropping it flushes and shuts down the background
/// log file writer.
pub fn initialize_tracing(
    console_output_level_filter: EnvFilter,
    log_file_output_level_filter: EnvFilter,
    log_file_output_directory: &Path,
    log_file_name_prefix: &str,
) -> Result<WorkerGuard, TracingInitializationError> {
    fs::create_dir_all(log_file_output_directory).map_err(|error| {
        TracingInitializationError::UnableToCreateLogFileOutputDirectory {
            directory_path: log_file_output_directory.to_path_buf(),
            error,
        }
    })?;

    let log_file_appender =
        tracing_appender::rolling::daily(log_file_output_directory, log_file_name_prefix);

    let (non_blocking_log_file_writer, log_file_worker_guard) =
        tracing_appender::non_blocking(log_file_appender);


    let console_output_layer = tracing_subscriber::fmt::layer()
        .with_filter(console_output_level_filter);

    let log_file_output_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_log_file_writer)
        .with_ansi(false)
        .with_filter(log_file_output_level_filter);


    tracing_subscriber::registry()
        .with(console_output_layer)
        .with(log_file_output_layer)
        .try_init()?;

    Ok(log_file_worker_guard)
}
