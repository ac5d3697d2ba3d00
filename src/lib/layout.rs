use std::collections::HashMap;

use crate::format::{format_amount, quote, zero_pad_left};
use crate::types::ControlHeader;

// Cell names shared between the layouts and the record builders.
pub const ACCOUNTING_CODE: &str = "accounting_code";
pub const ACCOUNTING_CODE_SUFFIX: &str = "accounting_code_suffix";
pub const AMOUNT: &str = "amount";
pub const CREDIT_DEBIT: &str = "credit_debit";
pub const EAN2: &str = "ean2";
pub const EAN3: &str = "ean3";
pub const EAN4: &str = "ean4";
pub const EAN5: &str = "ean5";
pub const INVOICE_DATE: &str = "invoice_date";
pub const VENDOR_INVOICE_NO: &str = "vendor_invoice_no";
pub const VIN_AND_INV_DATE: &str = "vin_and_inv_date";
pub const VIN_INDEX: &str = "vin_index";

/// Where a cell's value comes from: a constant baked into the layout, or a
/// value the record builder derives per row under the column's name.
pub enum CellSource {
    Constant(&'static str),
    Derived,
}

/// One column of a flat-file layout, in loader order. The order of these
/// descriptors is the loader's column contract; nothing may reindex them.
pub struct ColumnDef {
    pub name: &'static str,
    pub quoted: bool,
    pub source: CellSource,
}

const fn filler(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        quoted: false,
        source: CellSource::Constant(""),
    }
}

const fn constant(name: &'static str, value: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        quoted: true,
        source: CellSource::Constant(value),
    }
}

const fn quoted(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        quoted: true,
        source: CellSource::Derived,
    }
}

const fn bare(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        quoted: false,
        source: CellSource::Derived,
    }
}

/// Column contract of the invoice file: one row per surviving voucher.
pub static INVOICE_LAYOUT: [ColumnDef; 35] = [
    constant("company", "10"),
    quoted(ACCOUNTING_CODE),
    filler("filler_03"),
    quoted(VENDOR_INVOICE_NO),
    filler("filler_05"),
    filler("filler_06"),
    filler("filler_07"),
    constant("process_level", "LBR"),
    constant("pay_group", "10"),
    filler("filler_10"),
    quoted(CREDIT_DEBIT),
    filler("filler_12"),
    filler("filler_13"),
    bare(INVOICE_DATE),
    filler("filler_15"),
    filler("filler_16"),
    filler("filler_17"),
    filler("filler_18"),
    filler("filler_19"),
    filler("filler_20"),
    quoted(VIN_AND_INV_DATE),
    filler("filler_22"),
    bare(AMOUNT),
    filler("filler_24"),
    filler("filler_25"),
    filler("filler_26"),
    filler("filler_27"),
    filler("filler_28"),
    filler("filler_29"),
    filler("filler_30"),
    filler("filler_31"),
    filler("filler_32"),
    filler("filler_33"),
    filler("filler_34"),
    quoted(ACCOUNTING_CODE_SUFFIX),
];

/// Column contract of the distribution file: one row per voucher line.
pub static DISTRIB_LAYOUT: [ColumnDef; 19] = [
    constant("company", "10"),
    quoted(ACCOUNTING_CODE),
    filler("filler_03"),
    quoted(VENDOR_INVOICE_NO),
    filler("filler_05"),
    bare(VIN_INDEX),
    bare(AMOUNT),
    filler("filler_08"),
    constant("dist_company", "10"),
    filler("filler_10"),
    quoted(EAN2),
    quoted(EAN3),
    quoted(EAN4),
    filler("filler_14"),
    filler("filler_15"),
    filler("filler_16"),
    quoted(VIN_AND_INV_DATE),
    filler("filler_18"),
    quoted(EAN5),
];

/// Renders one data row in layout order, applying the baked-in quoting.
/// Builders must supply a value for every derived column.
pub fn render_row(
    layout: &[ColumnDef],
    cells: &HashMap<&'static str, String>,
    quote_char: char,
) -> Vec<String> {
    layout
        .iter()
        .map(|col| {
            let value = match col.source {
                CellSource::Constant(v) => v.to_string(),
                CellSource::Derived => cells
                    .get(col.name)
                    .unwrap_or_else(|| panic!("no cell value derived for column {}", col.name))
                    .clone(),
            };
            if col.quoted {
                quote(&value, quote_char)
            } else {
                value
            }
        })
        .collect()
}

/// Renders the nine-cell control header that precedes the data rows.
pub fn render_control_header(header: &ControlHeader, quote_char: char) -> Vec<String> {
    vec![
        quote(&header.marker, quote_char),
        quote(&header.client_name, quote_char),
        header.run_date.clone(),
        quote(&header.purpose, quote_char),
        quote(&header.approval_flag, quote_char),
        quote(&header.system_code, quote_char),
        zero_pad_left(&header.record_count.to_string(), 5),
        zero_pad_left(&format_amount(header.control_total), 10),
        quote(&header.operator, quote_char),
    ]
}
