//! Guard layer: selector normalization and cross-field checks
//!
//! Runs outside the formula pass. Selector normalization happens before a
//! pass so the engine only ever sees a single [`DextroseSelection`]; the
//! IVM volume check is advisory and never blocks computation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::order::{DextroseFlags, DextroseSelection};

/// Advisory warnings surfaced by the guard layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// The maintenance-fluid components add up to more than the prescribed
    /// IVM volume
    IvmVolumeExceeded {
        /// Sum of the four maintenance-fluid component volumes
        total: f64,
        /// Prescribed IVM volume
        target: f64,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::IvmVolumeExceeded { total, target } => {
                write!(
                    f,
                    "IVM components total {:.1} mL, exceeding the prescribed {:.1} mL",
                    total, target
                )
            }
        }
    }
}

/// Normalize raw dextrose checkbox state to a single selection
///
/// The first set flag wins, in the order 5%, 10%, 25%, 50%; with no flag
/// set the 10% default is forced, matching a freshly initialized form.
/// The returned selection is the only concentration state the engine
/// consumes, so a committed state always holds exactly one concentration.
pub fn resolve_selection(flags: DextroseFlags) -> DextroseSelection {
    if flags.five {
        DextroseSelection::Five
    } else if flags.ten {
        DextroseSelection::Ten
    } else if flags.twenty_five {
        DextroseSelection::TwentyFive
    } else if flags.fifty {
        DextroseSelection::Fifty
    } else {
        DextroseSelection::Ten
    }
}

/// Check the maintenance-fluid volumes against the prescribed IVM volume
///
/// Returns a warning iff the component sum strictly exceeds the target;
/// an exactly-matching sum passes.
pub fn validate_ivm(n5: f64, n2: f64, ns: f64, dex10: f64, ivm_target: f64) -> Option<Warning> {
    let total = n5 + n2 + ns + dex10;
    if total > ivm_target {
        Some(Warning::IvmVolumeExceeded {
            total,
            target: ivm_target,
        })
    } else {
        None
    }
}
