use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::models::{Book, NewBook};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Input};
use tracing::info;

/// Interactive console inventory manager for a bookstore.
///
/// All interaction happens through the menu; there are no flags or
/// subcommands. Parsing still provides `--help` and `--version`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {}

/// The four inventory operations dispatched from the menu.
#[derive(Debug, Clone)]
pub enum Commands {
    /// List every book, ordered by title.
    List,

    /// List books whose genre matches exactly.
    Search { genre: String },

    /// Insert a new book.
    Add(NewBook),

    /// Delete the book with the given ISBN.
    Delete { isbn: String },
}

/// CLI application state: the single open database handle.
pub struct App {
    db: Database,
}

impl App {
    /// Creates the application: connects to the database and bootstraps the
    /// `book` table.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` when the connection cannot be established; the
    /// caller treats this as fatal.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = Database::new(&config.database_url()).await?;
        db.init_schema().await?;
        Ok(Self { db })
    }

    /// Executes one inventory operation: a single database round trip plus
    /// console output. Always returns to the caller's menu loop.
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::List => {
                let books = self.db.list_all_books().await?;
                // Nothing extra is printed for an empty inventory.
                print_books(&books);
            },
            Commands::Search { genre } => {
                let books = self.db.search_by_genre(&genre).await?;
                if books.is_empty() {
                    println!("Genre of book not found.");
                } else {
                    print_books(&books);
                }
            },
            Commands::Add(book) => {
                self.db.insert_book(&book).await?;
                println!("Book added successfully.");
            },
            Commands::Delete { isbn } => {
                let rows_affected = self.db.delete_book(&isbn).await?;
                if rows_affected == 0 {
                    println!("No book found with that ISBN.");
                } else {
                    println!("Book deleted successfully.");
                    info!("Deleted {} row(s) for ISBN {}", rows_affected, isbn);
                    // Show the remaining inventory after a successful delete.
                    let books = self.db.list_all_books().await?;
                    print_books(&books);
                }
            },
        }

        Ok(())
    }
}

/// Prints books one per line in the pipe-delimited row format.
fn print_books(books: &[Book]) {
    for book in books {
        println!("{}", book);
    }
}

/// Checks that an ISBN is exactly 13 ASCII digits.
pub fn is_valid_isbn(isbn: &str) -> bool {
    isbn.len() == 13 && isbn.bytes().all(|b| b.is_ascii_digit())
}

/// Checks that a title is non-empty after trimming whitespace.
pub fn is_valid_title(title: &str) -> bool {
    !title.trim().is_empty()
}

/// Prompts for a genre to search. Accepted as-is; an empty string is a
/// legitimate exact-match key.
pub fn prompt_genre() -> Result<String> {
    let genre: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter genre to search")
        .allow_empty(true)
        .interact_text()?;
    Ok(genre)
}

/// Prompts for a 13-digit ISBN, re-prompting until the input conforms.
///
/// The validator never gives up: the user must supply a valid ISBN or kill
/// the process.
pub fn prompt_isbn(prompt: &str) -> Result<String> {
    let isbn: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if is_valid_isbn(input) {
                Ok(())
            } else {
                Err("Invalid ISBN format. Please enter exactly 13 digits.")
            }
        })
        .interact_text()?;
    Ok(isbn)
}

/// Prompts for every field of a new book.
///
/// ISBN and title block until valid; publisher and genre are free-form, and
/// the unit price accepts whatever parses as a number.
pub fn prompt_new_book() -> Result<NewBook> {
    let isbn = prompt_isbn("Enter ISBN")?;

    let title: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter Title")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if is_valid_title(input) {
                Ok(())
            } else {
                Err("Title cannot be empty. Please enter a valid title.")
            }
        })
        .interact_text()?;

    let publisher: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter Publisher")
        .allow_empty(true)
        .interact_text()?;

    let genre: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter Genre")
        .allow_empty(true)
        .interact_text()?;

    let unit_price: f64 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter Unit Price")
        .interact_text()?;

    Ok(NewBook {
        isbn,
        title,
        publisher,
        genre,
        unit_price,
    })
}
