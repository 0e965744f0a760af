//! First-order uncertainty propagation for real-valued quantities.
//!
//! Every elementary quantity created with [`UReal::new`] is an independent
//! input. Derived quantities carry the component of uncertainty contributed
//! by each input (sensitivity coefficient times standard uncertainty), so an
//! input that appears several times in one expression is combined with full
//! correlation rather than counted twice.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::errors::{CccError, ErrorInfo};

static NEXT_INPUT: AtomicU64 = AtomicU64::new(1);

/// Read-only view of a value with an attached standard uncertainty.
pub trait UncertainReal {
    /// Central value.
    fn x(&self) -> f64;
    /// Combined standard uncertainty.
    fn u(&self) -> f64;
    /// Degrees of freedom (effective degrees of freedom for derived values).
    fn df(&self) -> f64;
    /// Optional human readable label.
    fn label(&self) -> Option<&str>;
}

/// Identifier of an independent input quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InputId(u64);

impl InputId {
    fn fresh() -> Self {
        Self(NEXT_INPUT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Contribution of one independent input to a quantity's uncertainty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Label of the originating input, when it had one.
    pub label: Option<String>,
    /// Signed component of uncertainty (sensitivity times input uncertainty).
    pub u: f64,
    /// Degrees of freedom of the originating input.
    pub df: f64,
}

/// Uncertain real number with linearised propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UReal {
    value: f64,
    components: BTreeMap<InputId, Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl UReal {
    /// Creates an independent input from a value, standard uncertainty and
    /// degrees of freedom.
    ///
    /// Degrees of freedom must be at least one; use `f64::INFINITY` for a
    /// quantity known from a type-B evaluation with no sampling error.
    pub fn new(value: f64, uncertainty: f64, df: f64, label: &str) -> Result<Self, CccError> {
        if !value.is_finite() {
            return Err(invalid("ccc_core.ureal_value", "value must be finite", label, value));
        }
        if !uncertainty.is_finite() || uncertainty < 0.0 {
            return Err(invalid(
                "ccc_core.ureal_uncertainty",
                "standard uncertainty must be finite and non-negative",
                label,
                uncertainty,
            ));
        }
        if df.is_nan() || df < 1.0 {
            return Err(invalid(
                "ccc_core.ureal_dof",
                "degrees of freedom must be at least 1",
                label,
                df,
            ));
        }
        let mut components = BTreeMap::new();
        if uncertainty > 0.0 {
            components.insert(
                InputId::fresh(),
                Component {
                    label: Some(label.to_string()),
                    u: uncertainty,
                    df,
                },
            );
        }
        Ok(Self {
            value,
            components,
            label: Some(label.to_string()),
        })
    }

    /// Creates an exact quantity.
    pub fn constant(value: f64) -> Self {
        Self {
            value,
            components: BTreeMap::new(),
            label: None,
        }
    }

    /// Returns a copy of the quantity carrying the given label.
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Uncertainty components keyed by input, in creation order.
    pub fn components(&self) -> impl Iterator<Item = (&InputId, &Component)> {
        self.components.iter()
    }

    /// Magnitude of the component contributed by `other`'s inputs.
    ///
    /// Useful for uncertainty budgets where `other` is an elementary input.
    pub fn component_of(&self, other: &UReal) -> f64 {
        other
            .components
            .keys()
            .filter_map(|id| self.components.get(id))
            .map(|component| component.u * component.u)
            .sum::<f64>()
            .sqrt()
    }

    /// Returns true when no input contributes any uncertainty.
    pub fn is_exact(&self) -> bool {
        self.components.values().all(|component| component.u == 0.0)
    }

    fn combine(&self, other: &UReal, value: f64, da: f64, db: f64) -> UReal {
        let mut components = BTreeMap::new();
        for (id, component) in &self.components {
            components.insert(
                *id,
                Component {
                    u: da * component.u,
                    ..component.clone()
                },
            );
        }
        for (id, component) in &other.components {
            components
                .entry(*id)
                .and_modify(|existing: &mut Component| existing.u += db * component.u)
                .or_insert_with(|| Component {
                    u: db * component.u,
                    ..component.clone()
                });
        }
        UReal {
            value,
            components,
            label: None,
        }
    }

    fn scale(&self, value: f64, factor: f64) -> UReal {
        let components = self
            .components
            .iter()
            .map(|(id, component)| {
                (
                    *id,
                    Component {
                        u: factor * component.u,
                        ..component.clone()
                    },
                )
            })
            .collect();
        UReal {
            value,
            components,
            label: None,
        }
    }
}

impl UncertainReal for UReal {
    fn x(&self) -> f64 {
        self.value
    }

    fn u(&self) -> f64 {
        self.components
            .values()
            .map(|component| component.u * component.u)
            .sum::<f64>()
            .sqrt()
    }

    /// Welch-Satterthwaite effective degrees of freedom.
    fn df(&self) -> f64 {
        let u = self.u();
        if u == 0.0 {
            return f64::INFINITY;
        }
        let denominator: f64 = self
            .components
            .values()
            .filter(|component| component.df.is_finite())
            .map(|component| component.u.powi(4) / component.df)
            .sum();
        if denominator == 0.0 {
            f64::INFINITY
        } else {
            u.powi(4) / denominator
        }
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

fn invalid(code: &str, message: &str, label: &str, value: f64) -> CccError {
    CccError::Uncertainty(
        ErrorInfo::new(code, message)
            .with_context("label", label)
            .with_context("value", value.to_string()),
    )
}

impl<'a> Add<&'a UReal> for &'a UReal {
    type Output = UReal;

    fn add(self, rhs: &'a UReal) -> UReal {
        self.combine(rhs, self.value + rhs.value, 1.0, 1.0)
    }
}

impl<'a> Sub<&'a UReal> for &'a UReal {
    type Output = UReal;

    fn sub(self, rhs: &'a UReal) -> UReal {
        self.combine(rhs, self.value - rhs.value, 1.0, -1.0)
    }
}

impl<'a> Mul<&'a UReal> for &'a UReal {
    type Output = UReal;

    fn mul(self, rhs: &'a UReal) -> UReal {
        self.combine(rhs, self.value * rhs.value, rhs.value, self.value)
    }
}

impl<'a> Div<&'a UReal> for &'a UReal {
    type Output = UReal;

    fn div(self, rhs: &'a UReal) -> UReal {
        let value = self.value / rhs.value;
        self.combine(rhs, value, 1.0 / rhs.value, -value / rhs.value)
    }
}

impl Neg for &UReal {
    type Output = UReal;

    fn neg(self) -> UReal {
        self.scale(-self.value, -1.0)
    }
}

impl Neg for UReal {
    type Output = UReal;

    fn neg(self) -> UReal {
        -&self
    }
}

impl Add<f64> for &UReal {
    type Output = UReal;

    fn add(self, rhs: f64) -> UReal {
        self.scale(self.value + rhs, 1.0)
    }
}

impl Sub<f64> for &UReal {
    type Output = UReal;

    fn sub(self, rhs: f64) -> UReal {
        self.scale(self.value - rhs, 1.0)
    }
}

impl Mul<f64> for &UReal {
    type Output = UReal;

    fn mul(self, rhs: f64) -> UReal {
        self.scale(self.value * rhs, rhs)
    }
}

impl Div<f64> for &UReal {
    type Output = UReal;

    fn div(self, rhs: f64) -> UReal {
        self.scale(self.value / rhs, 1.0 / rhs)
    }
}

impl Add<&UReal> for f64 {
    type Output = UReal;

    fn add(self, rhs: &UReal) -> UReal {
        rhs + self
    }
}

impl Sub<&UReal> for f64 {
    type Output = UReal;

    fn sub(self, rhs: &UReal) -> UReal {
        rhs.scale(self - rhs.value, -1.0)
    }
}

impl Mul<&UReal> for f64 {
    type Output = UReal;

    fn mul(self, rhs: &UReal) -> UReal {
        rhs * self
    }
}

impl Div<&UReal> for f64 {
    type Output = UReal;

    fn div(self, rhs: &UReal) -> UReal {
        let value = self / rhs.value;
        rhs.scale(value, -value / rhs.value)
    }
}

// Owned operands forward to the borrowed implementations.
macro_rules! forward_owned {
    ($($trait:ident :: $method:ident),*) => {$(
        impl $trait<UReal> for UReal {
            type Output = UReal;
            fn $method(self, rhs: UReal) -> UReal {
                <&UReal as $trait<&UReal>>::$method(&self, &rhs)
            }
        }

        impl<'a> $trait<&'a UReal> for UReal {
            type Output = UReal;
            fn $method(self, rhs: &'a UReal) -> UReal {
                <&UReal as $trait<&UReal>>::$method(&self, rhs)
            }
        }

        impl $trait<UReal> for &UReal {
            type Output = UReal;
            fn $method(self, rhs: UReal) -> UReal {
                <&UReal as $trait<&UReal>>::$method(self, &rhs)
            }
        }

        impl $trait<f64> for UReal {
            type Output = UReal;
            fn $method(self, rhs: f64) -> UReal {
                <&UReal as $trait<f64>>::$method(&self, rhs)
            }
        }

        impl $trait<UReal> for f64 {
            type Output = UReal;
            fn $method(self, rhs: UReal) -> UReal {
                <f64 as $trait<&UReal>>::$method(self, &rhs)
            }
        }
    )*};
}

forward_owned!(Add::add, Sub::sub, Mul::mul, Div::div);

impl fmt::Display for UReal {
    /// Concise `value(uncertainty)` notation; the precision selects the
    /// number of significant digits kept in the uncertainty (default 2).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(2).max(1);
        f.write_str(&crate::format::format_concise(
            self.x(),
            self.u(),
            digits,
        ))
    }
}
