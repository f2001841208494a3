use std::fs::File;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;
use log::info;
use crate::config::Config;
use crate::error::ExportError;
use crate::models::{Credentials, ReportingPeriod};
use crate::utils::credentials::{acquire, Prompt};
use crate::utils::gradebook::{write_rows, HEADER};
use crate::utils::studentvue::{GradebookSource, StudentVueClient};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub periods_requested: usize,
    pub periods_with_data: usize,
    pub rows_written: usize,
}

// Full run: credentials, one client for every period, output file at the configured path.
pub fn run<P: Prompt>(config: &Config, prompt: &mut P) -> Result<ExportSummary, ExportError> {
    let credentials = acquire(config, prompt).map_err(ExportError::Credentials)?;
    let client = StudentVueClient::new(config.endpoint.clone())?;
    let periods = ReportingPeriod::first(config.periods);

    export_to_path(&config.output, &client, &credentials, periods, config.pause)
}

// Truncates `path` and writes the export into it. Any file failure is reported as a sink error for that path.
pub fn export_to_path<S, I>(
    path: &Path,
    source: &S,
    credentials: &Credentials,
    periods: I,
    pause: Duration,
) -> Result<ExportSummary, ExportError>
where
    S: GradebookSource,
    I: IntoIterator<Item = ReportingPeriod>,
{
    let sink_error = |source: csv::Error| ExportError::Sink { path: path.to_path_buf(), source };

    let file = File::create(path).map_err(|e| sink_error(e.into()))?;
    export(file, source, credentials, periods, pause).map_err(sink_error)
}

// Writes the header, then every row of every period that returned data. Periods without data add nothing.
pub fn export<W, S, I>(
    sink: W,
    source: &S,
    credentials: &Credentials,
    periods: I,
    pause: Duration,
) -> csv::Result<ExportSummary>
where
    W: io::Write,
    S: GradebookSource,
    I: IntoIterator<Item = ReportingPeriod>,
{
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
    writer.write_record(HEADER)?;

    let mut summary = ExportSummary::default();
    for period in periods {
        summary.periods_requested += 1;

        if let Some(gradebook) = source.fetch(credentials, period) {
            summary.periods_with_data += 1;
            let written = write_rows(&mut writer, &gradebook)?;
            info!("  -> Wrote {} rows for {}", written, period);
            summary.rows_written += written;
        }

        thread::sleep(pause);
    }

    writer.flush()?;
    Ok(summary)
}
