use rust_decimal::Decimal;

use crate::types::{ExportError, ExportResult};

/// Right-pads `value` with spaces to exactly `width` characters. A value
/// already wider than the column is an overflow, never a truncation.
pub fn pad_right(field: &'static str, value: &str, width: usize) -> ExportResult<String> {
    let len = value.chars().count();
    if len > width {
        return Err(ExportError::FieldOverflow {
            field,
            value: value.to_string(),
            width,
        });
    }
    Ok(format!("{}{}", value, " ".repeat(width - len)))
}

/// Merges a vendor invoice number and an 8-digit invoice date into one field
/// of exactly `width` characters, padding between the two so the total width
/// is fixed regardless of VIN length.
pub fn merge_vin_and_inv_date(
    field: &'static str,
    vin: &str,
    inv_date: &str,
    width: usize,
) -> ExportResult<String> {
    let used = vin.chars().count() + inv_date.chars().count();
    if used > width {
        return Err(ExportError::FieldOverflow {
            field,
            value: format!("{}{}", vin, inv_date),
            width,
        });
    }
    Ok(format!("{}{}{}", vin, " ".repeat(width - used), inv_date))
}

/// Left-pads with zeros to `width`. Values already at or past the width are
/// returned unchanged; the control header fields this feeds are validated by
/// the loader, not clipped here.
pub fn zero_pad_left(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    format!("{}{}", "0".repeat(width - len), value)
}

/// Two-decimal rendering used by every amount cell and control total.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Wraps a cell value in the profile's quote character. The encoder writes
/// cells verbatim, so quoting happens here or not at all.
pub fn quote(value: &str, quote_char: char) -> String {
    format!("{}{}{}", quote_char, value, quote_char)
}

/// Drops the institutional prefix (e.g. `MH`) from the front of a VIN when
/// configured and present. The stripped value feeds every VIN field of the
/// loader files.
pub fn strip_vin_prefix<'a>(vin: &'a str, prefix: Option<&str>) -> &'a str {
    match prefix {
        Some(p) if !p.is_empty() => vin.strip_prefix(p).unwrap_or(vin),
        _ => vin,
    }
}

/// Keeps the text before the first `_` of an accounting code, with the one
/// leading space the loader column expects.
pub fn accounting_code_prefix(code: &str) -> String {
    let prefix = code.split('_').next().unwrap_or(code);
    format!(" {}", prefix)
}

/// The final digit of a `_NN` accounting-code suffix, or two literal spaces
/// when there is none. The spaces are a positional filler, not a blank.
pub fn accounting_code_suffix(code: &str) -> String {
    let bytes = code.as_bytes();
    let has_suffix = bytes.len() >= 3
        && bytes[bytes.len() - 3] == b'_'
        && bytes[bytes.len() - 2].is_ascii_digit()
        && bytes[bytes.len() - 1].is_ascii_digit();
    if has_suffix {
        code[code.len() - 1..].to_string()
    } else {
        "  ".to_string()
    }
}

/// First ten characters of the exported invoice date with the dashes
/// removed: `2024-01-15T00:00:00` becomes `20240115`.
pub fn compress_invoice_date(raw: &str) -> String {
    raw.chars().take(10).filter(|c| *c != '-').collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        accounting_code_prefix, accounting_code_suffix, compress_invoice_date, format_amount,
        merge_vin_and_inv_date, pad_right, quote, strip_vin_prefix, zero_pad_left,
    };
    use crate::types::ExportError;

    #[test]
    fn pad_right_fills_to_width() {
        assert_eq!(pad_right("vin", "1001", 15).unwrap(), "1001           ");
    }

    #[test]
    fn pad_right_keeps_exact_width_value() {
        assert_eq!(pad_right("vin", "123456789012345", 15).unwrap().len(), 15);
    }

    #[test]
    fn pad_right_rejects_overflow() {
        let err = pad_right("vin", "1234567890123456", 15).unwrap_err();
        assert!(matches!(
            err,
            ExportError::FieldOverflow { field: "vin", width: 15, .. }
        ));
    }

    #[test]
    fn merge_is_always_the_configured_width() {
        let merged = merge_vin_and_inv_date("merge", "1001", "20240115", 22).unwrap();
        assert_eq!(merged, "1001          20240115");
        assert_eq!(merged.len(), 22);
    }

    #[test]
    fn merge_width_twenty_three_adds_one_more_space() {
        let merged = merge_vin_and_inv_date("merge", "1001", "20240115", 23).unwrap();
        assert_eq!(merged, "1001           20240115");
    }

    #[test]
    fn merge_rejects_negative_padding() {
        let err = merge_vin_and_inv_date("merge", "123456789012345", "20240115", 22).unwrap_err();
        assert!(matches!(err, ExportError::FieldOverflow { width: 22, .. }));
    }

    #[test]
    fn zero_pad_builds_control_fields() {
        assert_eq!(zero_pad_left("3", 5), "00003");
        assert_eq!(zero_pad_left("12.50", 10), "0000012.50");
    }

    #[test]
    fn zero_pad_leaves_wide_values_alone() {
        assert_eq!(zero_pad_left("1234567890.12", 10), "1234567890.12");
    }

    #[test]
    fn amounts_render_at_two_decimals() {
        assert_eq!(format_amount(Decimal::new(125, 1)), "12.50");
        assert_eq!(format_amount(Decimal::new(-300, 2)), "-3.00");
    }

    #[test]
    fn quote_wraps_value() {
        assert_eq!(quote("LBR", '"'), "\"LBR\"");
        assert_eq!(quote("", '"'), "\"\"");
    }

    #[test]
    fn vin_prefix_is_stripped_when_present() {
        assert_eq!(strip_vin_prefix("MH1001", Some("MH")), "1001");
    }

    #[test]
    fn vin_without_prefix_is_unchanged() {
        assert_eq!(strip_vin_prefix("1001", Some("MH")), "1001");
        assert_eq!(strip_vin_prefix("MH1001", None), "MH1001");
    }

    #[test]
    fn accounting_code_keeps_prefix_with_leading_space() {
        assert_eq!(accounting_code_prefix("100_05"), " 100");
        assert_eq!(accounting_code_prefix("100"), " 100");
    }

    #[test]
    fn suffix_is_final_digit_of_two_digit_tail() {
        assert_eq!(accounting_code_suffix("100_05"), "5");
    }

    #[test]
    fn suffix_without_numeric_tail_is_two_spaces() {
        assert_eq!(accounting_code_suffix("100"), "  ");
        assert_eq!(accounting_code_suffix("100_5"), "  ");
        assert_eq!(accounting_code_suffix("100_a5"), "  ");
    }

    #[test]
    fn invoice_date_is_compressed_to_eight_digits() {
        assert_eq!(compress_invoice_date("2024-01-15T00:00:00.000+00:00"), "20240115");
        assert_eq!(compress_invoice_date("2024-01-15"), "20240115");
    }
}
