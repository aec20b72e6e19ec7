//! Human-readable ticket codes: `<PREFIX>-<YYYY>-<NNN>`.
//!
//! `NNN` is a per-(prefix, year) sequence allocated by the store, zero-padded
//! to three digits and allowed to grow past 999.

use crate::work_item::WorkItemKind;

/// Minimum width of the sequence part.
const SEQUENCE_WIDTH: usize = 3;

/// Format a code from its parts.
pub fn format_code(prefix: &str, year: i32, sequence: i64) -> String {
    format!("{prefix}-{year:04}-{sequence:0width$}", width = SEQUENCE_WIDTH)
}

/// Format the code for a work item of `kind`.
pub fn code_for(kind: WorkItemKind, year: i32, sequence: i64) -> String {
    format_code(kind.code_prefix(), year, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_sequence_to_three_digits() {
        assert_eq!(code_for(WorkItemKind::DamageReport, 2026, 7), "DR-2026-007");
        assert_eq!(code_for(WorkItemKind::Inspection, 2026, 42), "INSP-2026-042");
    }

    #[test]
    fn sequence_grows_past_three_digits() {
        assert_eq!(code_for(WorkItemKind::Maintenance, 2027, 1234), "MT-2027-1234");
    }
}
