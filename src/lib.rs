pub mod engine;
pub mod error;
pub mod order;

pub use crate::engine::{
    recalculate, resolve_blend, resolve_selection, validate_ivm, Prescription, TpnEngine, Warning,
};
pub use crate::order::{
    DextroseFlags, DextroseSelection, FeedType, FortifierStrength, InputSnapshot, SodiumSource,
};
pub use error::TpnError;

pub mod prelude {
    pub mod engine {
        pub use crate::engine::{
            calc, recalculate, resolve_blend, ComponentVolumes, DextroseBlend, FluidTotals,
            GlucoseParams, InfusionRates, IntakeParams, IvmContribution, Prescription, TpnEngine,
            DEFAULT_SETTLE_PASSES,
        };
    }
    pub mod order {
        pub use crate::order::{
            DextroseFlags, DextroseSelection, FeedType, FortifierStrength, InputSnapshot,
            SodiumSource,
        };
    }

    pub use crate::engine::{
        recalculate, resolve_selection, validate_ivm, Prescription, TpnEngine, Warning,
    };
    pub use crate::error::TpnError;
    pub use crate::order::{
        DextroseFlags, DextroseSelection, FeedType, FortifierStrength, InputSnapshot, SodiumSource,
    };
}
