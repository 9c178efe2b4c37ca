//! Chamber deck generation and consumption.

pub mod deck;

pub use deck::{ChamberDeck, DeckSnapshot, Knowledge, Shell};
