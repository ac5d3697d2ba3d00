use serde_json::{json, Value};

/// Builds one voucher of a batch export document. Metadata fields that the
/// assertions rarely care about get stable defaults; tests that need a
/// specific accounting code or date overwrite the returned value.
pub fn voucher(status: &str, vin: &str, amount: f64, lines: Vec<(f64, &str)>) -> Value {
    let lines: Vec<Value> = lines
        .into_iter()
        .map(|(amount, account)| {
            json!({
                "amount": amount,
                "externalAccountNumber": account,
            })
        })
        .collect();
    json!({
        "status": status,
        "accountingCode": "100_05",
        "amount": amount,
        "invoiceDate": "2024-01-15T00:00:00.000+00:00",
        "vendorInvoiceNo": vin,
        "vendorName": "Acme Periodicals",
        "folioInvoiceNo": "10023",
        "voucherNumber": "3042",
        "batchedVoucherLines": lines,
    })
}

/// Wraps vouchers into a batch export document string.
pub fn batch_doc(vouchers: Vec<Value>) -> String {
    json!({
        "batchedVouchers": vouchers,
        "totalRecords": 1,
        "created": "2024-01-16T02:00:00.000+00:00",
    })
    .to_string()
}

/// First physical line of an encoded flat file: the control header.
pub fn control_line(encoded: &str) -> &str {
    encoded.lines().next().unwrap_or_default()
}

/// Everything after the control header.
pub fn data_lines(encoded: &str) -> Vec<&str> {
    encoded.lines().skip(1).collect()
}
