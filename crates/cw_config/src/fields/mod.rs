//! Per-type persistence plans, built once and cached with the object converter.

// -----------------------------------------------------------------------------
// Modules

mod inventory;
mod slot;

// -----------------------------------------------------------------------------
// Exports

pub use self::inventory::{FieldInventory, Instantiator};
pub use slot::{FieldSlot, SlotRole};
