use std::fmt::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{ExportError, ExportResult, Voucher, VoucherBatch};

const BANNER: &str = "******** INVOICE REPORT TOTALED BY EXTERNAL FUND CODE ********";
const SUMMARY_BANNER: &str = "******** BATCH TOTALS ********";
const FUND_HEADING: &str = "    External Fund                       Amount     ";
const FUND_RULE: &str = "    ------------------------------      ------------";

/// Renders the reconciliation report: one block per surviving voucher, then
/// the batch totals. The grand total keeps its sign, unlike the flat files'
/// control totals.
pub fn build_report(batch: &VoucherBatch, run_date: NaiveDate) -> ExportResult<String> {
    if batch.vouchers.is_empty() {
        return Err(ExportError::NoSurvivingRecords);
    }

    let mut out = String::new();
    for voucher in &batch.vouchers {
        voucher_block(&mut out, voucher, run_date);
    }
    batch_summary(&mut out, batch);
    Ok(out)
}

fn voucher_block(out: &mut String, voucher: &Voucher, run_date: NaiveDate) {
    // The stakeholders match this against the vendor's paper invoice, so the
    // VIN is shown exactly as exported, prefix and all.
    let credit_debit = if voucher.amount >= Decimal::ZERO { "D" } else { "C" };
    let invoice_date: String = voucher.invoice_date.chars().take(10).collect();

    writeln!(out, "{}", BANNER).ok();
    field(out, "Vendor Invoice Number:", &voucher.vendor_invoice_no);
    field(out, "Vendor:", &voucher.vendor_name);
    field(out, "Accounting Code:", &voucher.accounting_code);
    field(out, "FOLIO Voucher Number:", &voucher.voucher_number);
    field(out, "FOLIO Invoice Number:", &voucher.folio_invoice_no);
    field(out, "Report Date:", &run_date.format("%Y-%m-%d").to_string());
    field(out, "Invoice Date:", &invoice_date);
    field(out, "Invoice Total:", &voucher.amount.to_string());
    field(out, "Credit/Debit:", credit_debit);
    writeln!(out, "{}", FUND_HEADING).ok();
    writeln!(out, "{}", FUND_RULE).ok();
    for line in &voucher.lines {
        writeln!(out, "    {:<35} {}", line.external_account_number, line.amount).ok();
    }
    out.push_str("\n\n");
}

fn batch_summary(out: &mut String, batch: &VoucherBatch) {
    let grand_total: Decimal = batch.vouchers.iter().map(|v| v.amount).sum();
    writeln!(out, "{}", SUMMARY_BANNER).ok();
    field(out, "Total Invoices:", &batch.vouchers.len().to_string());
    field(out, "Grand Total:", &grand_total.to_string());
}

fn field(out: &mut String, label: &str, value: &str) {
    writeln!(out, "    {:<31}{}", label, value).ok();
}
