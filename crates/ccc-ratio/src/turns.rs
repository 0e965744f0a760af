//! Turns-ratio correction and its digitisation uncertainty.

use ccc_core::errors::{CccError, ErrorInfo};
use ccc_core::UReal;
use log::warn;

use crate::shunt::range_shunt_divisor;

/// Full-scale steps of the turns-ratio correction DAC.
pub const DIGITISATION_STEPS: f64 = 2048.0;
/// Degrees of freedom assigned to the turns-ratio correction.
pub const TURNS_CORRECTION_DOF: f64 = 8.0;

/// Standard uncertainty of a value limited by digitisation, treated as a
/// rectangular distribution one step wide (GUM F.2.2.1).
pub fn digitisation_uncertainty(divisor: u32) -> f64 {
    (1.0 / 12f64.sqrt()) / DIGITISATION_STEPS / f64::from(divisor)
}

/// Returns the exported milliturn value, or asks `recover` for one when the
/// export holds exactly zero (a known corruption of the bridge export).
pub fn resolve_k_mturns<F>(raw: f64, recover: F) -> Result<(f64, bool), CccError>
where
    F: FnOnce() -> Result<f64, CccError>,
{
    if raw != 0.0 {
        return Ok((raw, false));
    }
    warn!("exported turns correction is zero; requesting a manual value");
    let manual = recover()?;
    if !manual.is_finite() {
        return Err(CccError::Data(
            ErrorInfo::new("ccc_ratio.k_manual", "manual turns correction is not finite")
                .with_context("value", manual.to_string()),
        ));
    }
    Ok((manual, true))
}

/// Builds the turns-ratio correction `k` (in turns) from a milliturn value
/// and the drive's range shunt code.
pub fn turns_correction(k_mturns: f64, range_code: &str) -> Result<UReal, CccError> {
    let divisor = range_shunt_divisor(range_code)?;
    UReal::new(
        k_mturns / 1000.0,
        digitisation_uncertainty(divisor),
        TURNS_CORRECTION_DOF,
        "k_turns",
    )
}
