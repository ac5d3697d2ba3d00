use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::{ControlHeader, ExportError, ExportResult};

/// Site-specific knobs of the export engine. The two historical loader
/// feeds differed only in these values, so one engine runs both: the
/// defaults reproduce the current site and a JSON profile file overrides
/// them per deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputProfile {
    /// Site token inside the batch export filename convention.
    pub site_code: String,
    /// Logical client name carried in every control header.
    pub client_name: String,
    /// Operator identifier the loader records against the upload.
    pub operator: String,
    pub header_marker: String,
    pub approval_flag: String,
    pub system_code: String,
    pub invoice_purpose: String,
    pub distrib_purpose: String,
    /// Institutional VIN prefix to strip, when the vendor file carries one.
    pub vin_prefix: Option<String>,
    pub quote_char: char,
    /// Where the reconciliation reports are mailed.
    pub report_recipients: Vec<String>,
}

impl Default for OutputProfile {
    fn default() -> Self {
        Self {
            site_code: "MHC".to_string(),
            client_name: "LibraryFolio".to_string(),
            operator: "AADAMS".to_string(),
            header_marker: "$$$".to_string(),
            approval_flag: "Y".to_string(),
            system_code: "AP".to_string(),
            invoice_purpose: "FOLIO UPLOAD FOR APCINVOICE".to_string(),
            distrib_purpose: "FOLIO UPLOAD FOR APCDISTRIB".to_string(),
            vin_prefix: Some("MH".to_string()),
            quote_char: '"',
            report_recipients: Vec::new(),
        }
    }
}

impl OutputProfile {
    pub fn load(path: &Path) -> ExportResult<Self> {
        let file = File::open(path)?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ExportError::InvalidProfile { source })
    }

    /// Control header for one output file; `control_total` is stored as its
    /// absolute value since the loader validates an unsigned total.
    pub fn control_header(
        &self,
        purpose: &str,
        run_date: NaiveDate,
        record_count: usize,
        total: Decimal,
    ) -> ControlHeader {
        ControlHeader {
            marker: self.header_marker.clone(),
            client_name: self.client_name.clone(),
            run_date: run_date.format("%Y%m%d").to_string(),
            purpose: purpose.to_string(),
            approval_flag: self.approval_flag.clone(),
            system_code: self.system_code.clone(),
            record_count,
            control_total: total.abs(),
            operator: self.operator.clone(),
        }
    }
}
