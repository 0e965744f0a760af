#![deny(missing_docs)]
//! Resistance ratio and uncertainty calculation from CCC bridge runs.

pub mod ratio;
pub mod report;
pub mod shunt;
pub mod turns;

pub use ratio::{compute_ratio, deviation_from_nominal, RatioInputs};
pub use report::{
    calculate, calculate_files, report_to_json, BudgetEntry, QuantitySummary, RatioCalculation,
    RatioOptions, RatioReport,
};
pub use shunt::{range_shunt_divisor, RANGE_SHUNT_DIVISORS};
pub use turns::{
    digitisation_uncertainty, resolve_k_mturns, turns_correction, DIGITISATION_STEPS,
    TURNS_CORRECTION_DOF,
};
