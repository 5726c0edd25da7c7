//! Registry of normalization families
//!
//! Every family is a variant of [`Normalization`]. A family pairs an ordered
//! list of [`Statistic`]s (the parameter estimators) with a forward and an
//! inverse elementwise transform. `Robust*` and `Mixed*` families are derived
//! from a base family by swapping its estimators; they share its transforms.

use crate::element::Element;
use crate::errors::NormError;
use crate::statistics::Statistic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Elementwise transform pair shared by one or more families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transform {
    /// `(x - c) / s`
    Standardize,
    /// `1 / (1 + exp(-(x - c) / s))`
    Logistic,
    /// `(x - l) / (u - l)`
    Rescale,
    /// `x - c`
    Shift,
    /// `x / s`
    Scale,
}

impl Transform {
    fn forward<T: Element>(self, x: T, p: &[T]) -> T {
        match self {
            Self::Standardize => (x - p[0]) / p[1],
            Self::Logistic => T::one() / (T::one() + (-(x - p[0]) / p[1]).exp()),
            Self::Rescale => (x - p[0]) / (p[1] - p[0]),
            Self::Shift => x - p[0],
            Self::Scale => x / p[0],
        }
    }

    fn inverse<T: Element>(self, y: T, p: &[T]) -> T {
        match self {
            Self::Standardize => y * p[1] + p[0],
            Self::Logistic => -p[1] * (T::one() / y - T::one()).ln() + p[0],
            Self::Rescale => (p[1] - p[0]) * y + p[0],
            Self::Shift => y + p[0],
            Self::Scale => y * p[0],
        }
    }
}

/// How a family's estimators relate to its base family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Plain,
    Robust,
    Mixed,
}

/// Built-in normalization families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Normalization {
    /// `(x - mean) / std`
    ZScore,
    /// Logistic squashing of the z-score
    Sigmoid,
    /// `(x - min) / (max - min)`
    MinMax,
    /// `x - mean`
    Center,
    /// `x - median`
    RobustCenter,
    /// Z-score with median and robust scale
    RobustZScore,
    /// Sigmoid with median and robust scale
    RobustSigmoid,
    /// Z-score with mixed center and mixed scale
    MixedZScore,
    /// Sigmoid with mixed center and mixed scale
    MixedSigmoid,
    /// `x / sqrt(sum(x^2))`
    UnitEnergy,
    /// `x / sqrt(mean(x^2))`
    UnitPower,
}

impl Normalization {
    /// Every registered family, in registry order.
    pub const ALL: [Normalization; 11] = [
        Self::ZScore,
        Self::Sigmoid,
        Self::MinMax,
        Self::Center,
        Self::RobustCenter,
        Self::RobustZScore,
        Self::RobustSigmoid,
        Self::MixedZScore,
        Self::MixedSigmoid,
        Self::UnitEnergy,
        Self::UnitPower,
    ];

    /// Registry name of the family.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ZScore => "ZScore",
            Self::Sigmoid => "Sigmoid",
            Self::MinMax => "MinMax",
            Self::Center => "Center",
            Self::RobustCenter => "RobustCenter",
            Self::RobustZScore => "RobustZScore",
            Self::RobustSigmoid => "RobustSigmoid",
            Self::MixedZScore => "MixedZScore",
            Self::MixedSigmoid => "MixedSigmoid",
            Self::UnitEnergy => "UnitEnergy",
            Self::UnitPower => "UnitPower",
        }
    }

    /// Look a family up by registry name.
    ///
    /// # Errors
    ///
    /// Returns [`NormError::UnknownNormalization`] if no family has that name.
    pub fn lookup(name: &str) -> Result<Self, NormError> {
        name.parse()
    }

    /// Family whose transforms this one reuses (itself for plain families).
    #[must_use]
    pub const fn base(self) -> Self {
        match self {
            Self::RobustZScore | Self::MixedZScore => Self::ZScore,
            Self::RobustSigmoid | Self::MixedSigmoid => Self::Sigmoid,
            other => other,
        }
    }

    /// Robust variant of a two-parameter family, if one is registered.
    #[must_use]
    pub const fn robust(self) -> Option<Self> {
        match self {
            Self::ZScore => Some(Self::RobustZScore),
            Self::Sigmoid => Some(Self::RobustSigmoid),
            _ => None,
        }
    }

    /// Mixed variant of a two-parameter family, if one is registered.
    #[must_use]
    pub const fn mixed(self) -> Option<Self> {
        match self {
            Self::ZScore => Some(Self::MixedZScore),
            Self::Sigmoid => Some(Self::MixedSigmoid),
            _ => None,
        }
    }

    const fn variant(self) -> Variant {
        match self {
            Self::RobustZScore | Self::RobustSigmoid => Variant::Robust,
            Self::MixedZScore | Self::MixedSigmoid => Variant::Mixed,
            _ => Variant::Plain,
        }
    }

    const fn transform(self) -> Transform {
        match self.base() {
            Self::Sigmoid => Transform::Logistic,
            Self::MinMax => Transform::Rescale,
            Self::Center | Self::RobustCenter => Transform::Shift,
            Self::UnitEnergy | Self::UnitPower => Transform::Scale,
            _ => Transform::Standardize,
        }
    }

    fn base_statistics(self) -> &'static [Statistic] {
        match self {
            Self::MinMax => &[Statistic::Min, Statistic::Max],
            Self::Center => &[Statistic::Mean],
            Self::RobustCenter => &[Statistic::Median],
            Self::UnitEnergy => &[Statistic::Energy],
            Self::UnitPower => &[Statistic::Rms],
            _ => &[Statistic::Mean, Statistic::Std],
        }
    }

    /// Parameter estimators, in parameter order.
    #[must_use]
    pub fn statistics(self) -> Vec<Statistic> {
        let base = self.base().base_statistics().iter().copied();
        match self.variant() {
            Variant::Plain => base.collect(),
            Variant::Robust => base.map(Statistic::robust).collect(),
            Variant::Mixed => base.map(Statistic::mixed).collect(),
        }
    }

    /// Number of parameters (1 or 2).
    #[must_use]
    pub fn arity(self) -> usize {
        self.base().base_statistics().len()
    }

    /// Forward transform of a single value.
    ///
    /// `params` must hold [`arity`](Self::arity) values in parameter order.
    pub fn forward<T: Element>(self, x: T, params: &[T]) -> T {
        self.transform().forward(x, params)
    }

    /// Inverse transform of a single value.
    pub fn inverse<T: Element>(self, y: T, params: &[T]) -> T {
        self.transform().inverse(y, params)
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Normalization {
    type Err = NormError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|family| family.name() == name)
            .ok_or_else(|| NormError::UnknownNormalization {
                name: name.to_string(),
            })
    }
}
