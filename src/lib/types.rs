use rust_decimal::Decimal;
use thiserror::Error;

/// One batch voucher export document, after cancelled vouchers have been
/// discarded. Immutable once loaded; one batch per input file.
#[derive(Debug)]
pub struct VoucherBatch {
    pub vouchers: Vec<Voucher>,
}

/// One vendor invoice within a batch, carrying one aggregate amount and the
/// fund-distribution lines it splits into.
#[derive(Debug)]
pub struct Voucher {
    pub accounting_code: String,
    pub amount: Decimal,
    pub invoice_date: String,
    pub vendor_invoice_no: String,
    pub vendor_name: String,
    pub folio_invoice_no: String,
    pub voucher_number: String,
    pub lines: Vec<VoucherLine>,
}

/// A split of a voucher's amount across an external accounting segment.
#[derive(Debug)]
pub struct VoucherLine {
    pub amount: Decimal,
    pub external_account_number: String,
}

/// The summary record the ledger loader validates data rows against. Written
/// as the first physical line of each flat file.
#[derive(Debug)]
pub struct ControlHeader {
    pub marker: String,
    pub client_name: String,
    /// Run date as `YYYYMMDD`.
    pub run_date: String,
    pub purpose: String,
    pub approval_flag: String,
    pub system_code: String,
    pub record_count: usize,
    /// Absolute value; the loader expects an unsigned control total.
    pub control_total: Decimal,
    pub operator: String,
}

/// A fully rendered flat file: control header plus data rows whose cells
/// already carry their quoting and padding.
#[derive(Debug)]
pub struct FlatFile {
    pub header: ControlHeader,
    pub rows: Vec<Vec<String>>,
}

/// Position of an input file within a same-day run, used to keep output
/// filenames distinct when several batches arrive together.
#[derive(Default, Clone, Copy)]
pub struct FileIndex(usize);

impl FileIndex {
    pub fn new(value: usize) -> Self {
        Self(value)
    }

    /// Empty for the first file, `-1`, `-2`, ... for the rest.
    pub fn suffix(&self) -> String {
        if self.0 > 0 {
            format!("-{}", self.0)
        } else {
            String::new()
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    /// The input document lacks the batch voucher list or a required field.
    /// Fatal for that file; remaining files are still processed.
    #[error("malformed batch voucher document: {source}")]
    MalformedBatch {
        #[source]
        source: serde_json::Error,
    },
    /// A source value is wider than its fixed output column. The whole file
    /// is rejected rather than truncating or dropping the row.
    #[error("{value:?} does not fit in {field} (width {width})")]
    FieldOverflow {
        field: &'static str,
        value: String,
        width: usize,
    },
    /// Every voucher in the batch was cancelled, or no voucher had any
    /// distribution line. Signals "skip file creation", not a failure.
    #[error("batch contains no surviving records")]
    NoSurvivingRecords,
    #[error("invalid output profile: {source}")]
    InvalidProfile {
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
