use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::types::ExportResult;

/// Where batch voucher files come from. The engine only ever asks for the
/// pending batches and retires the ones it has consumed; FTP and SFTP
/// providers implement this same trait in the transfer layer.
pub trait BatchSource {
    fn list_batches(&self) -> ExportResult<Vec<PathBuf>>;
    /// Marks a batch as consumed so the next run does not pick it up again.
    fn retire(&self, batch: &Path) -> ExportResult<()>;
}

/// Where finished loader files and reports go.
pub trait OutputSink {
    fn publish(&self, files: &[PathBuf]) -> ExportResult<()>;
}

/// Delivers reconciliation reports to the stakeholders.
pub trait NotificationSink {
    fn send_reports(&self, reports: &[PathBuf], recipients: &[String]) -> ExportResult<()>;
}

/// Batch source over a local directory: picks up files matching the batch
/// export naming convention and retires them under an `old.` prefix.
pub struct LocalDirSource {
    dir: PathBuf,
    site_code: String,
}

impl LocalDirSource {
    pub fn new(dir: PathBuf, site_code: String) -> Self {
        Self { dir, site_code }
    }
}

impl BatchSource for LocalDirSource {
    fn list_batches(&self) -> ExportResult<Vec<PathBuf>> {
        let mut batches: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|name| is_batch_export_name(name, &self.site_code))
                    .unwrap_or(false)
            })
            .collect();
        // Directory order is arbitrary; sort so file indices are stable.
        batches.sort();
        Ok(batches)
    }

    fn retire(&self, batch: &Path) -> ExportResult<()> {
        let name = batch
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let retired = self.dir.join(format!("old.{}", name));
        fs::rename(batch, &retired)?;
        info!("retired {} to {}", batch.display(), retired.display());
        Ok(())
    }
}

/// Output sink for deployments whose loader polls the output directory
/// itself: the files are already in place, so publishing only records them.
pub struct LocalDirSink;

impl OutputSink for LocalDirSink {
    fn publish(&self, files: &[PathBuf]) -> ExportResult<()> {
        for file in files {
            info!("published {}", file.display());
        }
        Ok(())
    }
}

/// Notification sink that records what would be mailed. The SMTP sink lives
/// with the transfer collaborator.
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn send_reports(&self, reports: &[PathBuf], recipients: &[String]) -> ExportResult<()> {
        for report in reports {
            info!(
                "report {} ready for {}",
                report.display(),
                recipients.join(", ")
            );
        }
        Ok(())
    }
}

/// Matches the exporter's filename convention: `bv_`, a 12-character export
/// id, `_<site>_`, then the batch date as `YYYY-MM-DD`.
pub fn is_batch_export_name(name: &str, site_code: &str) -> bool {
    let rest = match name.strip_prefix("bv_") {
        Some(r) => r,
        None => return false,
    };
    let chars: Vec<char> = rest.chars().collect();
    if chars.len() <= 12 {
        return false;
    }
    let after_id: String = chars[12..].iter().collect();
    let date_part = match after_id
        .strip_prefix('_')
        .and_then(|s| s.strip_prefix(site_code))
        .and_then(|s| s.strip_prefix('_'))
    {
        Some(s) => s,
        None => return false,
    };
    let date: Vec<char> = date_part.chars().take(10).collect();
    date.len() == 10
        && date.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == '-',
            _ => c.is_ascii_digit(),
        })
}
