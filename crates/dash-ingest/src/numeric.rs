//! Numeric normalization for formatted CSV cells.

/// Outcome of normalizing a raw numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell {
    Value(f64),
    Missing,
    /// Not a number after separator stripping; loaders keep the record and
    /// store `NaN` in its place.
    Invalid,
}

impl NumericCell {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Strips every `,` thousands separator and parses the remainder.
pub fn normalize_numeric(raw: &str) -> NumericCell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NumericCell::Missing;
    }
    let plain: String = trimmed.chars().filter(|ch| *ch != ',').collect();
    match plain.parse::<f64>() {
        Ok(v) if v.is_finite() => NumericCell::Value(v),
        _ => NumericCell::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_all_separators() {
        assert_eq!(normalize_numeric("1,234,567"), NumericCell::Value(1_234_567.0));
        assert_eq!(normalize_numeric(" 74,580 "), NumericCell::Value(74_580.0));
        assert_eq!(normalize_numeric("-3.5"), NumericCell::Value(-3.5));
    }

    #[test]
    fn blank_is_missing() {
        assert_eq!(normalize_numeric("   "), NumericCell::Missing);
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(normalize_numeric("n/a"), NumericCell::Invalid);
        assert_eq!(normalize_numeric("NaN"), NumericCell::Invalid);
        assert_eq!(normalize_numeric("inf"), NumericCell::Invalid);
    }
}
