pub mod enums;
pub mod snapshot;

pub use enums::{DextroseFlags, DextroseSelection, FeedType, FortifierStrength, SodiumSource};
pub use snapshot::InputSnapshot;
