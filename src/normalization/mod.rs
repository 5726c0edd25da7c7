//! Normalization families and fitted instances
//!
//! - [`family`]: the closed registry of [`Normalization`] families
//! - [`normalizer`]: [`Normalizer`], a family bound to axes and parameters

pub mod family;
pub mod normalizer;

pub use family::Normalization;
pub use normalizer::Normalizer;
