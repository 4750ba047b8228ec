//! Cursor control sequences used by the ANSI screen writer.
//!
//! These return owned `String`s (or static slices) so callers can splice them
//! into a larger write without extra buffering.

const CSI: &str = "\x1b[";

/// Move the cursor to an absolute 1-based `row` and `column`.
pub fn move_to(row: u16, column: u16) -> String {
    format!("{CSI}{row};{column}H")
}

/// Clear from the cursor to the end of the line.
pub fn clear_to_line_end() -> &'static str {
    "\x1b[K"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_position_is_well_formed() {
        assert_eq!(move_to(3, 5), "\x1b[3;5H");
        assert_eq!(move_to(1, 1), "\x1b[1;1H");
    }
}
