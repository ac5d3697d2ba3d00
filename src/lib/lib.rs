//! Re-encodes batch voucher JSON exports into the two fixed-layout flat
//! files the legacy ledger loader ingests, plus a human-readable
//! reconciliation report.

pub mod distrib;
pub mod format;
pub mod invoice;
pub mod io;
pub mod layout;
pub mod profile;
pub mod report;
pub mod transfer;
pub mod types;
mod utils;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};

pub use profile::OutputProfile;
pub use transfer::{
    BatchSource, LocalDirSink, LocalDirSource, LogNotifier, NotificationSink, OutputSink,
};
pub use types::{ExportError, ExportResult, FileIndex, VoucherBatch};

/// Encoded artifacts of one batch. `None` means the batch had nothing to
/// contribute to that file and no file may be created for it.
pub struct BatchArtifacts {
    pub invoice: Option<String>,
    pub distrib: Option<String>,
    pub report: Option<String>,
}

/// Files written for one input batch.
#[derive(Default)]
pub struct ProducedFiles {
    pub invoice: Option<PathBuf>,
    pub distrib: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl ProducedFiles {
    pub fn all(&self) -> Vec<PathBuf> {
        [&self.invoice, &self.distrib, &self.report]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

/// Outcome of a run across every pending input file.
#[derive(Default)]
pub struct ExportSummary {
    pub produced: Vec<PathBuf>,
    pub reports: Vec<PathBuf>,
    pub failed: usize,
}

/// Transforms one already-parsed batch into its encoded artifacts. Pure
/// apart from allocation: no clock reads, no file I/O.
pub fn export_batch(
    batch: &VoucherBatch,
    profile: &OutputProfile,
    run_date: NaiveDate,
) -> ExportResult<BatchArtifacts> {
    let invoice = match invoice::build_invoice_file(batch, profile, run_date) {
        Ok(file) => Some(io::encode_flat_file(&file, profile.quote_char)?),
        Err(ExportError::NoSurvivingRecords) => None,
        Err(e) => return Err(e),
    };
    let distrib = match distrib::build_distrib_file(batch, profile, run_date) {
        Ok(file) => Some(io::encode_flat_file(&file, profile.quote_char)?),
        Err(ExportError::NoSurvivingRecords) => None,
        Err(e) => return Err(e),
    };
    let report = match report::build_report(batch, run_date) {
        Ok(text) => Some(text),
        Err(ExportError::NoSurvivingRecords) => None,
        Err(e) => return Err(e),
    };
    Ok(BatchArtifacts {
        invoice,
        distrib,
        report,
    })
}

/// Processes one input file end to end: load, transform, write whichever
/// artifacts the batch produced.
pub fn process_batch_file(
    input: &Path,
    out_dir: &Path,
    profile: &OutputProfile,
    run_date: NaiveDate,
    index: FileIndex,
) -> ExportResult<ProducedFiles> {
    let batch = io::load_batch(input)?;
    let artifacts = export_batch(&batch, profile, run_date)?;
    let date = run_date.format("%Y-%m-%d");

    let mut produced = ProducedFiles::default();
    match artifacts.invoice {
        Some(text) => {
            let path = out_dir.join(format!("{}_apcinvoice{}.txt", date, index.suffix()));
            fs::write(&path, text)?;
            info!("created {}", path.display());
            produced.invoice = Some(path);
        }
        None => info!(
            "no non-cancelled invoices in {}, skipping invoice file",
            input.display()
        ),
    }
    match artifacts.distrib {
        Some(text) => {
            let path = out_dir.join(format!("{}_apcdistrib{}.txt", date, index.suffix()));
            fs::write(&path, text)?;
            info!("created {}", path.display());
            produced.distrib = Some(path);
        }
        None => info!(
            "no distribution lines in {}, skipping distrib file",
            input.display()
        ),
    }
    if let Some(text) = artifacts.report {
        let path = out_dir.join(format!("{}_voucher_report{}.txt", date, index.suffix()));
        fs::write(&path, text)?;
        info!("created {}", path.display());
        produced.report = Some(path);
    }
    Ok(produced)
}

/// Runs the export over every pending batch the source knows about. Each
/// file is processed in isolation: a malformed document or an overflowing
/// field fails that file alone and leaves it unretired for the operator.
pub fn run_export(
    source: &dyn BatchSource,
    out_dir: &Path,
    profile: &OutputProfile,
    run_date: NaiveDate,
) -> ExportResult<ExportSummary> {
    let batches = source.list_batches()?;
    if batches.is_empty() {
        warn!("no new voucher files found");
        return Ok(ExportSummary::default());
    }

    let mut summary = ExportSummary::default();
    for (i, batch_path) in batches.iter().enumerate() {
        match process_batch_file(batch_path, out_dir, profile, run_date, FileIndex::new(i)) {
            Ok(produced) => {
                summary.reports.extend(produced.report.clone());
                summary.produced.extend(produced.all());
                source.retire(batch_path)?;
            }
            Err(
                err @ (ExportError::MalformedBatch { .. } | ExportError::FieldOverflow { .. }),
            ) => {
                warn!("skipping {}: {}", batch_path.display(), err);
                summary.failed += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}
