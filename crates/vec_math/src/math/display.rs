//! Human-readable formatting shared by every math type

use std::fmt;

/// Decimal places matching [`super::PRECISION`]
const DISPLAY_DECIMALS: usize = 6;

/// Format a scalar rounded to the library precision.
///
/// Trailing zeros are trimmed so whole numbers print as integers, and a
/// rounded negative zero prints as `0`.
pub(crate) fn scalar(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = format!("{:.*}", DISPLAY_DECIMALS, value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Write a bracketed vector, e.g. `V3[1, 2, 3]`
pub(crate) fn vector(f: &mut fmt::Formatter<'_>, tag: &str, values: &[f64]) -> fmt::Result {
    write!(f, "{tag}[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(&scalar(*value))?;
    }
    f.write_str("]")
}

/// Write a tagged matrix, one row per line separated by two spaces
pub(crate) fn matrix(f: &mut fmt::Formatter<'_>, tag: &str, values: &[f64]) -> fmt::Result {
    f.write_str(tag)?;
    for row in values.chunks_exact(4) {
        f.write_str("\n")?;
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                f.write_str("  ")?;
            }
            f.write_str(&scalar(*value))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_formatting() {
        assert_eq!(scalar(1.0), "1");
        assert_eq!(scalar(10.0), "10");
        assert_eq!(scalar(-2.5), "-2.5");
        assert_eq!(scalar(0.1 + 0.2), "0.3");
        assert_eq!(scalar(1.0 / 3.0), "0.333333");
        assert_eq!(scalar(-1e-9), "0");
        assert_eq!(scalar(f64::INFINITY), "inf");
    }
}
