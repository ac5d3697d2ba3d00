use std::collections::HashMap;

use chrono::NaiveDate;
use im::HashMap as ImHashMap;
use rust_decimal::Decimal;

use crate::format::{
    accounting_code_prefix, compress_invoice_date, format_amount, merge_vin_and_inv_date,
    pad_right, strip_vin_prefix,
};
use crate::layout::{self, DISTRIB_LAYOUT};
use crate::profile::OutputProfile;
use crate::types::{ExportError, ExportResult, FlatFile, Voucher, VoucherBatch, VoucherLine};
use crate::utils::OrDefault;

const VIN_WIDTH: usize = 14;
const MERGE_WIDTH: usize = 23;
const EAN5_FILLER: &str = "      ";

/// Builds the distribution file: each surviving voucher explodes into one
/// row per fund-distribution line. The control total is the absolute sum of
/// line amounts, not voucher amounts.
pub fn build_distrib_file(
    batch: &VoucherBatch,
    profile: &OutputProfile,
    run_date: NaiveDate,
) -> ExportResult<FlatFile> {
    let exploded: Vec<(&Voucher, &VoucherLine)> = batch
        .vouchers
        .iter()
        .flat_map(|voucher| voucher.lines.iter().map(move |line| (voucher, line)))
        .collect();
    if exploded.is_empty() {
        return Err(ExportError::NoSurvivingRecords);
    }

    let total: Decimal = exploded.iter().map(|(_, line)| line.amount).sum();

    // The VIN sequence counts repeats of the same stripped VIN across the
    // whole file in row order. It never resets per voucher, so two vouchers
    // sharing a VIN continue the same sequence.
    let init: (Vec<Vec<String>>, ImHashMap<String, u32>) =
        (Vec::with_capacity(exploded.len()), ImHashMap::new());
    let (rows, _) = exploded
        .iter()
        .try_fold(init, |(mut rows, seen), (voucher, line)| {
            let vin = strip_vin_prefix(&voucher.vendor_invoice_no, profile.vin_prefix.as_deref())
                .to_string();
            let vin_index = seen.get_or_default(&vin) + 1;
            let cells = distrib_cells(voucher, line, profile, vin_index)?;
            rows.push(layout::render_row(&DISTRIB_LAYOUT, &cells, profile.quote_char));
            Ok::<_, ExportError>((rows, seen.update(vin, vin_index)))
        })?;

    let header = profile.control_header(&profile.distrib_purpose, run_date, rows.len(), total);
    Ok(FlatFile { header, rows })
}

fn distrib_cells(
    voucher: &Voucher,
    line: &VoucherLine,
    profile: &OutputProfile,
    vin_index: u32,
) -> ExportResult<HashMap<&'static str, String>> {
    let vin = strip_vin_prefix(&voucher.vendor_invoice_no, profile.vin_prefix.as_deref());
    let inv_date = compress_invoice_date(&voucher.invoice_date);
    let segments = split_account_segments(&line.external_account_number);
    let ean5 = if segments[4].is_empty() {
        EAN5_FILLER.to_string()
    } else {
        segments[4].clone()
    };

    Ok([
        (
            layout::ACCOUNTING_CODE,
            accounting_code_prefix(&voucher.accounting_code),
        ),
        (
            layout::VENDOR_INVOICE_NO,
            pad_right(layout::VENDOR_INVOICE_NO, vin, VIN_WIDTH)?,
        ),
        (layout::VIN_INDEX, vin_index.to_string()),
        (layout::AMOUNT, format_amount(line.amount)),
        (layout::EAN2, segments[1].clone()),
        (layout::EAN3, segments[2].clone()),
        (layout::EAN4, last_two(&segments[3])),
        (
            layout::VIN_AND_INV_DATE,
            merge_vin_and_inv_date(layout::VIN_AND_INV_DATE, vin, &inv_date, MERGE_WIDTH)?,
        ),
        (layout::EAN5, ean5),
    ]
    .into_iter()
    .collect())
}

/// Splits a hyphen-delimited external account number into its five ordered
/// segments. Missing segments stay empty; pieces past the fifth are dropped.
fn split_account_segments(account: &str) -> [String; 5] {
    let mut segments: [String; 5] = Default::default();
    for (i, piece) in account.split('-').take(5).enumerate() {
        segments[i] = piece.to_string();
    }
    segments
}

fn last_two(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    chars[chars.len().saturating_sub(2)..].iter().collect()
}
