//! Item inventory.
//!
//! - `ItemBoard`: One side's slots
//! - `Inventory`: Both boards with count/grant/consume by side

pub mod board;
pub mod manager;

pub use board::ItemBoard;
pub use manager::Inventory;
