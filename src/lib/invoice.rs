use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::format::{
    accounting_code_prefix, accounting_code_suffix, compress_invoice_date, format_amount,
    merge_vin_and_inv_date, pad_right, strip_vin_prefix,
};
use crate::layout::{self, INVOICE_LAYOUT};
use crate::profile::OutputProfile;
use crate::types::{ExportError, ExportResult, FlatFile, Voucher, VoucherBatch};

const VIN_WIDTH: usize = 15;
const MERGE_WIDTH: usize = 22;

/// Builds the invoice file: one row per surviving voucher plus the control
/// header. The control total is the absolute sum of voucher amounts; the
/// record count is the number of surviving vouchers.
pub fn build_invoice_file(
    batch: &VoucherBatch,
    profile: &OutputProfile,
    run_date: NaiveDate,
) -> ExportResult<FlatFile> {
    if batch.vouchers.is_empty() {
        return Err(ExportError::NoSurvivingRecords);
    }

    let rows = batch
        .vouchers
        .iter()
        .map(|voucher| {
            invoice_cells(voucher, profile)
                .map(|cells| layout::render_row(&INVOICE_LAYOUT, &cells, profile.quote_char))
        })
        .collect::<ExportResult<Vec<_>>>()?;

    let total: Decimal = batch.vouchers.iter().map(|v| v.amount).sum();
    let header = profile.control_header(
        &profile.invoice_purpose,
        run_date,
        batch.vouchers.len(),
        total,
    );
    Ok(FlatFile { header, rows })
}

fn invoice_cells(
    voucher: &Voucher,
    profile: &OutputProfile,
) -> ExportResult<HashMap<&'static str, String>> {
    let vin = strip_vin_prefix(&voucher.vendor_invoice_no, profile.vin_prefix.as_deref());
    let inv_date = compress_invoice_date(&voucher.invoice_date);
    // Header marker is per-row; the report uses a separate D/C convention.
    let credit_debit = if voucher.amount < Decimal::ZERO { "C" } else { "" };

    Ok([
        (
            layout::ACCOUNTING_CODE,
            accounting_code_prefix(&voucher.accounting_code),
        ),
        (
            layout::VENDOR_INVOICE_NO,
            pad_right(layout::VENDOR_INVOICE_NO, vin, VIN_WIDTH)?,
        ),
        (layout::CREDIT_DEBIT, credit_debit.to_string()),
        (layout::INVOICE_DATE, inv_date.clone()),
        (
            layout::VIN_AND_INV_DATE,
            merge_vin_and_inv_date(layout::VIN_AND_INV_DATE, vin, &inv_date, MERGE_WIDTH)?,
        ),
        (layout::AMOUNT, format_amount(voucher.amount)),
        (
            layout::ACCOUNTING_CODE_SUFFIX,
            accounting_code_suffix(&voucher.accounting_code),
        ),
    ]
    .into_iter()
    .collect())
}
