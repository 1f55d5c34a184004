//! The `Book` entity as stored in the `book` table, plus the input struct
//! for inserting new inventory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single row of the `book` table.
///
/// The ISBN is the primary key (13 ASCII digits) and is immutable once
/// inserted; there is no update operation in this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub publisher: String,
    pub genre: String,
    pub unit_price: f64,
}

impl fmt::Display for Book {
    /// Formats a book as the pipe-delimited console row:
    /// `isbn | title | publisher | genre | unit_price`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {}",
            self.isbn, self.title, self.publisher, self.genre, self.unit_price
        )
    }
}

/// Input for the add operation. Field-for-field the same shape as `Book`;
/// kept separate so validated user input is distinct from persisted rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub publisher: String,
    pub genre: String,
    pub unit_price: f64,
}
