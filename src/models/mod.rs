//! Defines data structures for the application.
//!
//! Includes the persisted `Book` row and the `NewBook` input used when
//! inserting into the inventory.

mod book;

pub use book::*;
