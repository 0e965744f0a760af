//! The CCC resistance ratio equation.

use ccc_core::errors::{CccError, ErrorInfo};
use ccc_core::{UReal, UncertainReal};

/// Quantities entering the CCC resistance ratio equation.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioInputs {
    /// Primary winding turns.
    pub n1: u32,
    /// Secondary winding turns.
    pub n2: u32,
    /// Auxiliary winding turns.
    pub na: u32,
    /// Turns-ratio correction, in turns.
    pub k: UReal,
    /// Bridge voltage difference.
    pub bvd: UReal,
    /// Reference voltage product I2*R2.
    pub i2r2: UReal,
}

/// `R1/R2 = (N1/N2) * (1 + k*Na/N1) * (1 + bvd/I2R2)`.
pub fn compute_ratio(inputs: &RatioInputs) -> Result<UReal, CccError> {
    if inputs.n1 == 0 || inputs.n2 == 0 {
        return Err(CccError::Data(
            ErrorInfo::new("ccc_ratio.turns", "winding turns must be non-zero")
                .with_context("n1", inputs.n1.to_string())
                .with_context("n2", inputs.n2.to_string()),
        ));
    }
    if inputs.i2r2.x() == 0.0 {
        return Err(CccError::Data(ErrorInfo::new(
            "ccc_ratio.i2r2",
            "reference voltage I2*R2 is zero",
        )));
    }
    let n1 = f64::from(inputs.n1);
    let n2 = f64::from(inputs.n2);
    let na = f64::from(inputs.na);

    let turns_term = 1.0 + &inputs.k * na / n1;
    let bvd_term = 1.0 + &inputs.bvd / &inputs.i2r2;
    Ok(((n1 / n2) * turns_term * bvd_term).labelled("ratio"))
}

/// Deviation of a measured ratio from the nominal `R1/R2`.
pub fn deviation_from_nominal(
    ratio: &UReal,
    r1_nominal: f64,
    r2_nominal: f64,
) -> Result<UReal, CccError> {
    if r2_nominal == 0.0 {
        return Err(CccError::Data(ErrorInfo::new(
            "ccc_ratio.nominal",
            "nominal R2 is zero",
        )));
    }
    Ok((ratio - r1_nominal / r2_nominal).labelled("deviation"))
}
