//! Range shunt codes.

use ccc_core::errors::{CccError, ErrorInfo};

/// Range shunt code to digitisation divisor.
pub const RANGE_SHUNT_DIVISORS: [(&str, u32); 4] = [("0", 512), ("1", 64), ("2", 8), ("3", 1)];

/// Looks up the uncertainty divisor for a `cn_rangeshunt` code.
pub fn range_shunt_divisor(code: &str) -> Result<u32, CccError> {
    let code = code.trim();
    RANGE_SHUNT_DIVISORS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, divisor)| *divisor)
        .ok_or_else(|| {
            CccError::Data(
                ErrorInfo::new("ccc_ratio.range_shunt", "unknown range shunt code")
                    .with_context("code", code)
                    .with_hint("expected one of 0, 1, 2, 3"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(range_shunt_divisor("0").unwrap(), 512);
        assert_eq!(range_shunt_divisor("1").unwrap(), 64);
        assert_eq!(range_shunt_divisor("2").unwrap(), 8);
        assert_eq!(range_shunt_divisor("3").unwrap(), 1);
    }

    #[test]
    fn unknown_code_fails() {
        let err = range_shunt_divisor("7").unwrap_err();
        assert_eq!(err.info().code, "ccc_ratio.range_shunt");
        assert!(range_shunt_divisor("").is_err());
    }
}
