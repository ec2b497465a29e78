//! Closed enumerations for the clinical order
//!
//! Every categorical field on the order form is a closed set of values.
//! The four mutually-exclusive dextrose concentration checkboxes are
//! modelled as a single [`DextroseSelection`] so that a committed order can
//! never hold two concentrations at once; the raw checkbox state as it
//! arrives from a form is [`DextroseFlags`], normalized by
//! [`resolve_selection`](crate::engine::resolve_selection) before a pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stock solution used to meet the sodium requirement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SodiumSource {
    /// Ringer lactate stock (CRL)
    Crl,
    /// 3% sodium chloride
    #[default]
    HypertonicSaline,
}

/// Type of oral feed running alongside the infusion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedType {
    /// Expressed breast milk or pasteurized donor human milk
    #[default]
    EbmPdhm,
    /// Preterm formula
    Formula,
    /// Any other feed; contributes no calories or protein
    Other,
}

impl FeedType {
    /// Calories delivered per mL of feed
    pub fn calories_per_ml(&self) -> f64 {
        match self {
            FeedType::EbmPdhm => 0.52,
            FeedType::Formula => 0.78,
            FeedType::Other => 0.0,
        }
    }

    /// Protein delivered per mL of feed
    pub fn protein_per_ml(&self) -> f64 {
        match self {
            FeedType::EbmPdhm => 0.0095,
            FeedType::Formula => 0.019,
            FeedType::Other => 0.0,
        }
    }
}

/// Dilution strength of the feed fortifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FortifierStrength {
    /// No fortifier added
    #[default]
    None,
    Quarter,
    Half,
    Full,
}

impl FortifierStrength {
    /// Additional calories per mL of fortified feed
    pub fn calories_per_ml(&self) -> f64 {
        match self {
            FortifierStrength::None => 0.0,
            FortifierStrength::Quarter => 0.04,
            FortifierStrength::Half => 0.08,
            FortifierStrength::Full => 0.16,
        }
    }

    /// Additional protein per mL of fortified feed
    pub fn protein_per_ml(&self) -> f64 {
        match self {
            FortifierStrength::None => 0.0,
            FortifierStrength::Quarter => 0.003,
            FortifierStrength::Half => 0.006,
            FortifierStrength::Full => 0.012,
        }
    }
}

/// The dextrose concentration chosen for the blend
///
/// Concentrations come in two pairs: the low pair {5%, 10%} and the high
/// pair {25%, 50%}. The blend solver resolves one volume per pair and the
/// committed volume is taken from whichever pair holds the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DextroseSelection {
    /// 5% dextrose
    Five,
    /// 10% dextrose
    #[default]
    Ten,
    /// 25% dextrose
    TwentyFive,
    /// 50% dextrose
    Fifty,
}

impl DextroseSelection {
    /// Whether the selection belongs to the low-concentration pair {5%, 10%}
    pub fn is_low_pair(&self) -> bool {
        matches!(self, DextroseSelection::Five | DextroseSelection::Ten)
    }

    /// Nominal concentration in percent
    pub fn concentration(&self) -> f64 {
        match self {
            DextroseSelection::Five => 5.0,
            DextroseSelection::Ten => 10.0,
            DextroseSelection::TwentyFive => 25.0,
            DextroseSelection::Fifty => 50.0,
        }
    }
}

impl fmt::Display for DextroseSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.concentration())
    }
}

/// Raw dextrose checkbox state as captured from a form
///
/// Forms expose the selection as four independent booleans. This type
/// carries that state verbatim so the guard layer can normalize it; the
/// engine itself only ever consumes a [`DextroseSelection`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DextroseFlags {
    pub five: bool,
    pub ten: bool,
    pub twenty_five: bool,
    pub fifty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_factors() {
        assert_eq!(FeedType::EbmPdhm.calories_per_ml(), 0.52);
        assert_eq!(FeedType::Formula.calories_per_ml(), 0.78);
        assert_eq!(FeedType::Other.calories_per_ml(), 0.0);
        assert_eq!(FeedType::Formula.protein_per_ml(), 0.019);
    }

    #[test]
    fn test_fortifier_factors() {
        assert_eq!(FortifierStrength::None.calories_per_ml(), 0.0);
        assert_eq!(FortifierStrength::Quarter.calories_per_ml(), 0.04);
        assert_eq!(FortifierStrength::Half.protein_per_ml(), 0.006);
        assert_eq!(FortifierStrength::Full.protein_per_ml(), 0.012);
    }

    #[test]
    fn test_selection_pairs() {
        assert!(DextroseSelection::Five.is_low_pair());
        assert!(DextroseSelection::Ten.is_low_pair());
        assert!(!DextroseSelection::TwentyFive.is_low_pair());
        assert!(!DextroseSelection::Fifty.is_low_pair());
    }

    #[test]
    fn test_selection_default_is_ten() {
        assert_eq!(DextroseSelection::default(), DextroseSelection::Ten);
    }
}
