mod cli;
mod config;
mod db;
mod error;
mod models;

use clap::Parser;
use cli::{App, Cli, Commands};
use colored::*;
use config::Config;
use dialoguer::{theme::ColorfulTheme, Select};
use error::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // No flags or subcommands; parsing provides --help/--version.
    Cli::parse();

    info!("Initializing bookstore inventory app...");

    let config = Config::from_env();

    // Initialize the application state (DB connection). Failure here is fatal.
    let app = match App::new(&config).await {
        Ok(app) => {
            info!("Application initialized successfully.");
            app
        },
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            println!(
                "{} {}",
                "Error: Failed to connect to the database.".red(),
                e.to_string().red()
            );
            return Err(e);
        },
    };

    println!("{}", "Welcome to the Bookstore Inventory CLI!".cyan().bold());

    // Main interactive loop
    loop {
        let options = &[
            "Listing All Books",
            "Search Books by Genre",
            "Add a Book",
            "Delete a Book",
            "Quit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Choose an option")
            .items(options)
            .default(0)
            .interact_opt()? // Handle potential cancellation (e.g., Ctrl+C)
            .unwrap_or(options.len() - 1); // Default to Quit if cancelled

        println!();

        // Handle the user's choice
        let command_result = match selection {
            0 => app.run_command(Commands::List).await,
            1 => {
                // Prompt for the genre to filter on
                match cli::prompt_genre() {
                    Ok(genre) => app.run_command(Commands::Search { genre }).await,
                    Err(e) => {
                        println!("{} {}", "Failed to get input:".red(), e);
                        continue;
                    },
                }
            },
            2 => {
                // Prompt for all fields of the new book; ISBN and title
                // re-prompt until valid
                match cli::prompt_new_book() {
                    Ok(book) => app.run_command(Commands::Add(book)).await,
                    Err(e) => {
                        println!("{} {}", "Failed to get input:".red(), e);
                        continue;
                    },
                }
            },
            3 => {
                // Show the full inventory before asking which book to delete
                if let Err(e) = app.run_command(Commands::List).await {
                    error!("Listing before delete failed: {:?}", e);
                    println!("{} {}", "Error executing command:".red(), e.to_string().red());
                    continue;
                }
                match cli::prompt_isbn("Enter ISBN of the book to delete") {
                    Ok(isbn) => app.run_command(Commands::Delete { isbn }).await,
                    Err(e) => {
                        println!("{} {}", "Failed to get input:".red(), e);
                        continue;
                    },
                }
            },
            4 => {
                println!("{}", "Quitting the program...".green());
                break; // Exit the loop
            },
            _ => unreachable!(), // Select is bounded by the options list
        };

        // Per-operation failures are recoverable: report and return to the menu
        if let Err(e) = command_result {
            error!("Command execution failed: {:?}", e);
            println!(
                "{} {}",
                "Error executing command:".red(),
                e.to_string().red()
            );
        }

        println!();
    }

    Ok(())
}
