//! Immutable capture of the clinical order
//!
//! An [`InputSnapshot`] freezes every raw field the engine reads at the
//! moment a recalculation is requested. Snapshots are cheap to clone and
//! never mutated by the engine; each edit event produces a fresh one.

use serde::{Deserialize, Serialize};

use super::enums::{DextroseSelection, FeedType, FortifierStrength, SodiumSource};

/// Raw patient and order fields consumed by a recalculation pass
///
/// All volumes are mL, all per-kg requirements are daily. Fields absent
/// from a serialized order fall back to the same defaults a fresh form
/// starts with ([`InputSnapshot::default`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    /// Dosing weight in kg
    pub dosing_weight: f64,
    /// Total fluid rate in mL/kg/day
    pub fluid_rate: f64,
    /// Oral feed volume in mL/kg/day
    pub feed_volume: f64,
    /// Prescribed IVM volume in mL
    pub ivm_volume: f64,

    /// Protein requirement in g/kg/day
    pub protein_req: f64,
    /// Lipid requirement in g/kg/day
    pub lipid_req: f64,
    /// Glucose infusion rate target
    pub gir: f64,
    /// Sodium requirement per kg/day
    pub sodium_req: f64,
    /// Potassium requirement per kg/day
    pub potassium_req: f64,
    /// Calcium requirement per kg/day
    pub calcium_req: f64,
    /// Magnesium requirement per kg/day
    pub magnesium_req: f64,
    /// Phosphate requirement per kg/day
    pub phosphate_req: f64,

    /// Whether a cell-protectant additive is ordered
    pub cell_protectant: bool,
    /// Whether calcium is given through the TPN line
    pub calcium_via_tpn: bool,
    /// Overfill factor recorded with the order; carried for the record,
    /// not consumed by any formula
    pub overfill_factor: f64,

    pub sodium_source: SodiumSource,
    pub feed_type: FeedType,
    pub fortifier: FortifierStrength,
    /// Dextrose concentration selection (exactly one at a time)
    pub dextrose: DextroseSelection,

    /// N/5 saline running as maintenance fluid, mL
    pub saline_fifth_normal: f64,
    /// N/2 saline running as maintenance fluid, mL
    pub saline_half_normal: f64,
    /// Normal saline running as maintenance fluid, mL
    pub normal_saline: f64,
    /// 10% dextrose running as maintenance fluid, mL
    pub dextrose10_ivm: f64,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            dosing_weight: 0.0,
            fluid_rate: 100.0,
            feed_volume: 0.0,
            ivm_volume: 0.0,
            protein_req: 0.0,
            lipid_req: 0.0,
            gir: 0.0,
            sodium_req: 0.0,
            potassium_req: 0.0,
            calcium_req: 0.0,
            magnesium_req: 0.0,
            phosphate_req: 1.0,
            cell_protectant: false,
            calcium_via_tpn: false,
            overfill_factor: 1.0,
            sodium_source: SodiumSource::default(),
            feed_type: FeedType::default(),
            fortifier: FortifierStrength::default(),
            dextrose: DextroseSelection::default(),
            saline_fifth_normal: 0.0,
            saline_half_normal: 0.0,
            normal_saline: 0.0,
            dextrose10_ivm: 0.0,
        }
    }
}

impl InputSnapshot {
    /// Snapshot with the defaults a fresh order form starts with
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dosing weight in kg
    pub fn with_dosing_weight(mut self, kg: f64) -> Self {
        self.dosing_weight = kg;
        self
    }

    /// Set the total fluid rate in mL/kg/day
    pub fn with_fluid_rate(mut self, rate: f64) -> Self {
        self.fluid_rate = rate;
        self
    }

    /// Set the oral feed volume in mL/kg/day
    pub fn with_feed_volume(mut self, feed: f64) -> Self {
        self.feed_volume = feed;
        self
    }

    /// Set the prescribed IVM volume in mL
    pub fn with_ivm_volume(mut self, ivm: f64) -> Self {
        self.ivm_volume = ivm;
        self
    }

    /// Set the protein requirement in g/kg/day
    pub fn with_protein_req(mut self, req: f64) -> Self {
        self.protein_req = req;
        self
    }

    /// Set the lipid requirement in g/kg/day
    pub fn with_lipid_req(mut self, req: f64) -> Self {
        self.lipid_req = req;
        self
    }

    /// Set the glucose infusion rate target
    pub fn with_gir(mut self, gir: f64) -> Self {
        self.gir = gir;
        self
    }

    /// Set the sodium requirement per kg/day
    pub fn with_sodium_req(mut self, req: f64) -> Self {
        self.sodium_req = req;
        self
    }

    /// Set the potassium requirement per kg/day
    pub fn with_potassium_req(mut self, req: f64) -> Self {
        self.potassium_req = req;
        self
    }

    /// Set the calcium requirement per kg/day
    pub fn with_calcium_req(mut self, req: f64) -> Self {
        self.calcium_req = req;
        self
    }

    /// Set the magnesium requirement per kg/day
    pub fn with_magnesium_req(mut self, req: f64) -> Self {
        self.magnesium_req = req;
        self
    }

    /// Set the phosphate requirement per kg/day
    pub fn with_phosphate_req(mut self, req: f64) -> Self {
        self.phosphate_req = req;
        self
    }

    /// Order the cell-protectant additive
    pub fn with_cell_protectant(mut self, enabled: bool) -> Self {
        self.cell_protectant = enabled;
        self
    }

    /// Give calcium through the TPN line
    pub fn with_calcium_via_tpn(mut self, enabled: bool) -> Self {
        self.calcium_via_tpn = enabled;
        self
    }

    pub fn with_overfill_factor(mut self, factor: f64) -> Self {
        self.overfill_factor = factor;
        self
    }

    pub fn with_sodium_source(mut self, source: SodiumSource) -> Self {
        self.sodium_source = source;
        self
    }

    pub fn with_feed_type(mut self, feed_type: FeedType) -> Self {
        self.feed_type = feed_type;
        self
    }

    pub fn with_fortifier(mut self, strength: FortifierStrength) -> Self {
        self.fortifier = strength;
        self
    }

    /// Select the dextrose concentration
    pub fn with_dextrose(mut self, selection: DextroseSelection) -> Self {
        self.dextrose = selection;
        self
    }

    /// Set the maintenance-fluid volumes in mL (N/5 saline, N/2 saline,
    /// normal saline, 10% dextrose)
    pub fn with_maintenance_fluids(mut self, n5: f64, n2: f64, ns: f64, dex10: f64) -> Self {
        self.saline_fifth_normal = n5;
        self.saline_half_normal = n2;
        self.normal_saline = ns;
        self.dextrose10_ivm = dex10;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_fresh_form() {
        let snap = InputSnapshot::default();
        assert_eq!(snap.fluid_rate, 100.0);
        assert_eq!(snap.phosphate_req, 1.0);
        assert_eq!(snap.overfill_factor, 1.0);
        assert_eq!(snap.dextrose, DextroseSelection::Ten);
        assert_eq!(snap.dosing_weight, 0.0);
    }

    #[test]
    fn test_builder_chain() {
        let snap = InputSnapshot::new()
            .with_dosing_weight(2.0)
            .with_fluid_rate(150.0)
            .with_protein_req(3.0)
            .with_maintenance_fluids(5.0, 2.0, 3.0, 10.0);

        assert_eq!(snap.dosing_weight, 2.0);
        assert_eq!(snap.fluid_rate, 150.0);
        assert_eq!(snap.protein_req, 3.0);
        assert_eq!(snap.normal_saline, 3.0);
        assert_eq!(snap.dextrose10_ivm, 10.0);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let snap: InputSnapshot = serde_json::from_str(r#"{"dosing_weight": 1.8}"#).unwrap();
        assert_eq!(snap.dosing_weight, 1.8);
        assert_eq!(snap.fluid_rate, 100.0);
        assert_eq!(snap.dextrose, DextroseSelection::Ten);
    }
}
