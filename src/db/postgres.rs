//! Provides PostgreSQL database interaction functionalities using `sqlx`.
//!
//! Includes establishing the connection, bootstrapping the `book` table, and the
//! four inventory operations (list, search by genre, insert, delete).
//! Also contains integration tests for database operations (requires the `integration-tests` feature).

use crate::error::{AppError, Result};
use crate::models::{Book, NewBook};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::{debug, error, info};

/// Represents the database connection and provides methods for inventory operations.
///
/// The underlying `sqlx::Pool` is capped at a single connection: the menu loop
/// performs at most one round trip at a time, so one connection is all the
/// program ever needs.
pub struct Database {
    pool: Pool<Postgres>,
}

impl Database {
    /// Creates a new `Database` instance by establishing the connection.
    ///
    /// # Arguments
    ///
    /// * `database_url` - The connection string for the PostgreSQL database.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the connection cannot be established. This is
    /// the fatal startup path; callers should exit rather than retry.
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(1) // Single synchronous flow, single connection
            .connect(database_url)
            .await
            .map_err(|e| {
                error!("Failed to connect to database: {}", e);
                AppError::Db(e.into())
            })?;

        info!("Connected to database successfully");
        Ok(Self { pool })
    }

    /// Creates the `book` table if it does not already exist.
    ///
    /// Idempotent via `CREATE TABLE IF NOT EXISTS`; safe to run on every startup.
    /// The ISBN primary key is what enforces uniqueness of book identifiers.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn init_schema(&self) -> Result<()> {
        debug!("Initializing book table (if necessary)...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS book (
                isbn TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                publisher TEXT,
                genre TEXT,
                unit_price DOUBLE PRECISION
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to create book table: {}", e);
            AppError::Db(e.into())
        })?;

        debug!("Book table ready");
        Ok(())
    }

    /// Fetches every book in the inventory, ordered by title ascending.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails. Returns an empty Vec when the
    /// table has no rows.
    pub async fn list_all_books(&self) -> Result<Vec<Book>> {
        debug!("Listing all books");

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, title, COALESCE(publisher, '') AS publisher,
                   COALESCE(genre, '') AS genre, COALESCE(unit_price, 0) AS unit_price
            FROM book
            ORDER BY title ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list books: {}", e);
            AppError::Db(e.into())
        })?;

        debug!("Retrieved {} books", books.len());
        Ok(books)
    }

    /// Fetches books matching a genre exactly.
    ///
    /// No `ORDER BY`: results come back in store-returned order. The asymmetry
    /// with `list_all_books` is intentional.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn search_by_genre(&self, genre: &str) -> Result<Vec<Book>> {
        debug!("Searching books with genre '{}'", genre);

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, title, COALESCE(publisher, '') AS publisher,
                   COALESCE(genre, '') AS genre, COALESCE(unit_price, 0) AS unit_price
            FROM book
            WHERE genre = $1
            "#,
        )
        .bind(genre)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to search books by genre '{}': {}", genre, e);
            AppError::Db(e.into())
        })?;

        debug!("Found {} books for genre '{}'", books.len(), genre);
        Ok(books)
    }

    /// Inserts one book into the inventory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insertion fails, including a duplicate-key
    /// violation when the ISBN already exists. The caller reports the store's
    /// message and continues.
    pub async fn insert_book(&self, book: &NewBook) -> Result<()> {
        debug!("Inserting book with ISBN {}", book.isbn);

        sqlx::query(
            r#"
            INSERT INTO book (isbn, title, publisher, genre, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.publisher)
        .bind(&book.genre)
        .bind(book.unit_price)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert book {}: {}", book.isbn, e);
            AppError::Db(e.into())
        })?;

        info!("Inserted book {}", book.isbn);
        Ok(())
    }

    /// Deletes the book with the given ISBN.
    ///
    /// Returns the number of rows affected: 0 means no such book existed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn delete_book(&self, isbn: &str) -> Result<u64> {
        debug!("Deleting book with ISBN {}", isbn);

        let result = sqlx::query("DELETE FROM book WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete book {}: {}", isbn, e);
                AppError::Db(e.into())
            })?;

        let rows = result.rows_affected();
        info!("Delete of {} affected {} rows", isbn, rows);
        Ok(rows)
    }
}

// --- Integration Tests ---
// These tests interact with a real PostgreSQL database.
// They are gated by the `integration-tests` feature flag.
// Run using: `cargo test --features integration-tests`
// Requires a running PostgreSQL instance configured via DATABASE_URL env var.
#[cfg(test)]
#[cfg(feature = "integration-tests")] // Apply feature gate to the whole module
mod tests {
    use super::*;
    use sqlx::PgPool; // PgPool is injected by #[sqlx::test]

    /// Helper to build a `NewBook` for testing purposes.
    fn new_book(isbn: &str, title: &str, genre: &str, unit_price: f64) -> NewBook {
        NewBook {
            isbn: isbn.to_string(),
            title: title.to_string(),
            publisher: "Test Press".to_string(),
            genre: genre.to_string(),
            unit_price,
        }
    }

    /// Tests that `init_schema` creates the book table.
    #[sqlx::test]
    async fn test_init_schema(pool: PgPool) -> Result<()> {
        let db = Database { pool };
        db.init_schema().await?;

        let table_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_schema = 'public' AND table_name = 'book')",
        )
        .fetch_one(&db.pool)
        .await?;
        assert!(table_exists, "book table should exist after init_schema");

        // Running it again must not fail.
        db.init_schema().await?;
        Ok(())
    }

    /// Tests that an inserted book shows up in the title-ordered listing.
    #[sqlx::test]
    async fn test_insert_then_list(pool: PgPool) -> Result<()> {
        let db = Database { pool };
        db.init_schema().await?;

        db.insert_book(&new_book("1234567890123", "Dune", "SciFi", 9.99))
            .await?;
        db.insert_book(&new_book("9780000000001", "Accursed Tomes", "Horror", 4.5))
            .await?;

        let books = db.list_all_books().await?;
        assert_eq!(books.len(), 2);
        // Ordered by title ascending.
        assert_eq!(books[0].title, "Accursed Tomes");
        assert_eq!(books[1].title, "Dune");
        assert_eq!(books[1].isbn, "1234567890123");
        assert_eq!(books[1].unit_price, 9.99);
        Ok(())
    }

    /// Tests that inserting a duplicate ISBN fails with a store error.
    #[sqlx::test]
    async fn test_insert_duplicate_isbn_fails(pool: PgPool) -> Result<()> {
        let db = Database { pool };
        db.init_schema().await?;

        let book = new_book("1234567890123", "Dune", "SciFi", 9.99);
        db.insert_book(&book).await?;

        let result = db.insert_book(&book).await;
        assert!(result.is_err(), "duplicate ISBN must violate the primary key");
        Ok(())
    }

    /// Tests exact-match genre search, including the zero-row case.
    #[sqlx::test]
    async fn test_search_by_genre(pool: PgPool) -> Result<()> {
        let db = Database { pool };
        db.init_schema().await?;

        db.insert_book(&new_book("1234567890123", "Dune", "SciFi", 9.99))
            .await?;
        db.insert_book(&new_book("9780000000001", "Foundation", "SciFi", 7.99))
            .await?;
        db.insert_book(&new_book("9780000000002", "Persuasion", "Romance", 5.99))
            .await?;

        let scifi = db.search_by_genre("SciFi").await?;
        assert_eq!(scifi.len(), 2);
        assert!(scifi.iter().all(|b| b.genre == "SciFi"));

        // Exact match only: no case folding, no substring matching.
        let lower = db.search_by_genre("scifi").await?;
        assert!(lower.is_empty());

        let none = db.search_by_genre("Poetry").await?;
        assert!(none.is_empty());
        Ok(())
    }

    /// Tests deletion by ISBN and the rows-affected contract.
    #[sqlx::test]
    async fn test_delete_book(pool: PgPool) -> Result<()> {
        let db = Database { pool };
        db.init_schema().await?;

        db.insert_book(&new_book("1234567890123", "Dune", "SciFi", 9.99))
            .await?;

        let rows = db.delete_book("1234567890123").await?;
        assert_eq!(rows, 1);

        let books = db.list_all_books().await?;
        assert!(books.is_empty(), "listing after delete must omit the book");

        // Deleting a non-existent ISBN affects zero rows and changes nothing.
        let rows = db.delete_book("9999999999999").await?;
        assert_eq!(rows, 0);
        Ok(())
    }
}
