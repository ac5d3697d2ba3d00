use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ::serde::Deserialize;
use rust_decimal::Decimal;

use crate::layout::render_control_header;
use crate::types::{ExportError, ExportResult, FlatFile, Voucher, VoucherBatch, VoucherLine};

const CANCELLED_STATUS: &str = "Cancelled";

/// Wire shape of one batch voucher export document. Batch metadata the
/// engine never uses (`created`, `totalRecords`) is parsed and dropped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchVoucherDocEntity {
    batched_vouchers: Vec<VoucherEntity>,
    #[serde(default)]
    #[allow(dead_code)]
    created: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    total_records: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoucherEntity {
    status: String,
    accounting_code: String,
    amount: Decimal,
    invoice_date: String,
    vendor_invoice_no: String,
    vendor_name: String,
    folio_invoice_no: String,
    voucher_number: String,
    #[serde(default)]
    batched_voucher_lines: Vec<VoucherLineEntity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoucherLineEntity {
    amount: Decimal,
    external_account_number: String,
}

impl BatchVoucherDocEntity {
    /// Cancelled vouchers are dropped here, before any builder sees the
    /// batch, so no downstream total or sequence number can include them.
    fn into_domain(self) -> VoucherBatch {
        VoucherBatch {
            vouchers: self
                .batched_vouchers
                .into_iter()
                .filter(|v| v.status != CANCELLED_STATUS)
                .map(VoucherEntity::into_domain)
                .collect(),
        }
    }
}

impl VoucherEntity {
    fn into_domain(self) -> Voucher {
        Voucher {
            accounting_code: self.accounting_code,
            amount: self.amount,
            invoice_date: self.invoice_date,
            vendor_invoice_no: self.vendor_invoice_no,
            vendor_name: self.vendor_name,
            folio_invoice_no: self.folio_invoice_no,
            voucher_number: self.voucher_number,
            lines: self
                .batched_voucher_lines
                .into_iter()
                .map(|l| VoucherLine {
                    amount: l.amount,
                    external_account_number: l.external_account_number,
                })
                .collect(),
        }
    }
}

/// Parses one batch voucher document. Pure parse: no filtering beyond the
/// cancelled-voucher rule, no aggregation.
pub fn load_batch(path: &Path) -> ExportResult<VoucherBatch> {
    let file = File::open(path)?;
    let entity: BatchVoucherDocEntity = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| ExportError::MalformedBatch { source })?;
    Ok(entity.into_domain())
}

/// Parses a batch voucher document already held in memory.
pub fn parse_batch(doc: &str) -> ExportResult<VoucherBatch> {
    let entity: BatchVoucherDocEntity =
        serde_json::from_str(doc).map_err(|source| ExportError::MalformedBatch { source })?;
    Ok(entity.into_domain())
}

/// Serializes a flat file: control header first, then the data rows. Cell
/// values already carry their quoting, so the writer never quotes or
/// escapes anything itself.
pub fn encode_flat_file(file: &FlatFile, quote_char: char) -> ExportResult<String> {
    // flexible: the nine-cell control header shares the file with wider
    // data rows.
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .flexible(true)
        .from_writer(vec![]);

    wtr.write_record(&render_control_header(&file.header, quote_char))?;
    for row in &file.rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    let data = String::from_utf8(wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))?)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{encode_flat_file, parse_batch};
    use crate::types::{ControlHeader, ExportError, FlatFile};

    #[test]
    fn batch_documents_parse_into_the_domain_model() {
        let doc = r#"{
            "batchedVouchers": [{
                "status": "Paid",
                "accountingCode": "100_05",
                "amount": 12.5,
                "invoiceDate": "2024-01-15T00:00:00.000+00:00",
                "vendorInvoiceNo": "MH1001",
                "vendorName": "Vendor Co",
                "folioInvoiceNo": "10023",
                "voucherNumber": "3042",
                "batchedVoucherLines": [
                    {"amount": 12.5, "externalAccountNumber": "11-22-33-4456-"}
                ]
            }],
            "totalRecords": 1,
            "created": "2024-01-16T02:00:00.000+00:00"
        }"#;
        let batch = parse_batch(doc).unwrap();
        assert_eq!(batch.vouchers.len(), 1);
        assert_eq!(batch.vouchers[0].vendor_invoice_no, "MH1001");
        assert_eq!(batch.vouchers[0].lines.len(), 1);
        assert_eq!(
            batch.vouchers[0].lines[0].external_account_number,
            "11-22-33-4456-"
        );
    }

    #[test]
    fn cancelled_vouchers_never_reach_the_domain() {
        let doc = r#"{
            "batchedVouchers": [
                {
                    "status": "Cancelled",
                    "accountingCode": "100_05",
                    "amount": 99.0,
                    "invoiceDate": "2024-01-15T00:00:00.000+00:00",
                    "vendorInvoiceNo": "MH9999",
                    "vendorName": "Vendor Co",
                    "folioInvoiceNo": "10024",
                    "voucherNumber": "3043",
                    "batchedVoucherLines": [
                        {"amount": 99.0, "externalAccountNumber": "1-2-3-4-5"}
                    ]
                },
                {
                    "status": "Paid",
                    "accountingCode": "200",
                    "amount": 1.0,
                    "invoiceDate": "2024-01-15T00:00:00.000+00:00",
                    "vendorInvoiceNo": "MH1001",
                    "vendorName": "Vendor Co",
                    "folioInvoiceNo": "10025",
                    "voucherNumber": "3044",
                    "batchedVoucherLines": []
                }
            ]
        }"#;
        let batch = parse_batch(doc).unwrap();
        assert_eq!(batch.vouchers.len(), 1);
        assert_eq!(batch.vouchers[0].vendor_invoice_no, "MH1001");
    }

    #[test]
    fn missing_voucher_list_is_malformed() {
        let err = parse_batch(r#"{"vouchers": []}"#).unwrap_err();
        assert!(matches!(err, ExportError::MalformedBatch { .. }));
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let doc = r#"{"batchedVouchers": [{"status": "Paid", "amount": 1.0}]}"#;
        let err = parse_batch(doc).unwrap_err();
        assert!(matches!(err, ExportError::MalformedBatch { .. }));
    }

    #[test]
    fn encoder_writes_header_then_rows_without_its_own_quoting() {
        let file = FlatFile {
            header: ControlHeader {
                marker: "$$$".to_string(),
                client_name: "LibraryFolio".to_string(),
                run_date: "20240201".to_string(),
                purpose: "FOLIO UPLOAD FOR APCINVOICE".to_string(),
                approval_flag: "Y".to_string(),
                system_code: "AP".to_string(),
                record_count: 1,
                control_total: Decimal::new(1250, 2),
                operator: "AADAMS".to_string(),
            },
            rows: vec![vec![
                "\"10\"".to_string(),
                "".to_string(),
                "12.50".to_string(),
            ]],
        };
        let encoded = encode_flat_file(&file, '"').unwrap();
        assert_eq!(
            encoded,
            "\"$$$\",\"LibraryFolio\",20240201,\"FOLIO UPLOAD FOR APCINVOICE\",\"Y\",\"AP\",00001,0000012.50,\"AADAMS\"\n\"10\",,12.50\n"
        );
    }
}
