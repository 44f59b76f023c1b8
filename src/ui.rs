// UI layer: the interactive catalog menu built on `dialoguer`.
// The functions are small and synchronous to make the flow easy to follow:
// one handler per menu option, each doing a single round trip to the store.

use crate::store::{MovieDraft, MoviePatch, MovieStore};
use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::thread;
use std::time::Duration;

/// Main interactive menu. Receives a store instance and loops until the
/// user picks "0" or the choice prompt can no longer be read (stdin
/// closed, interrupt); both are an orderly exit.
///
/// Any error inside a handler, whether a store failure or a prompt
/// failure mid-operation, is printed here and the loop carries on;
/// nothing short of the exit choice stops the process.
pub fn main_menu(store: impl MovieStore) -> Result<()> {
    loop {
        // short pause so the previous operation's output stays readable
        thread::sleep(Duration::from_millis(300));

        println!("\n=== Movie catalog ===");
        println!("1. Add a movie");
        println!("2. Update a movie");
        println!("3. Delete a movie");
        println!("4. List movies");
        println!("0. Quit");

        let choice: String = match Input::new().with_prompt("Choose an option").interact_text() {
            Ok(choice) => choice,
            Err(err) => {
                log::debug!("choice prompt closed: {err}");
                println!("\nGoodbye!");
                break;
            }
        };

        let outcome = match choice.as_str() {
            "1" => handle_create(&store),
            "2" => handle_update(&store),
            "3" => handle_delete(&store),
            "4" => handle_list(&store),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => {
                println!("Invalid option, try again.");
                Ok(())
            }
        };

        if let Err(err) = outcome {
            println!("Operation failed: {err}");
        }
    }
    Ok(())
}

/// Collect the four movie fields and insert a new record.
fn handle_create(store: &impl MovieStore) -> Result<()> {
    let title: String = Input::new().with_prompt("Title").interact_text()?;
    let description = optional_text("Description (optional)")?;
    let genre = optional_text("Genre (optional)")?;
    // typed input: dialoguer re-asks until the year parses
    let release_year: i32 = Input::new().with_prompt("Release year").interact_text()?;

    let spinner = saving_spinner();
    let movie = store.insert(MovieDraft { title, description, genre, release_year })?;
    spinner.finish_and_clear();

    println!("Movie created:\n{movie}");
    Ok(())
}

/// Look up a movie by id, show it, and collect replacement values.
/// Blank input keeps the current value of that field.
fn handle_update(store: &impl MovieStore) -> Result<()> {
    let id: String = Input::new().with_prompt("Id of the movie to update").interact_text()?;

    let Some(current) = store.find_by_id(&id)? else {
        println!("Movie not found.");
        return Ok(());
    };
    println!("Current entry:\n{current}");
    println!("Press Enter on any field to keep its current value.");

    let patch = MoviePatch {
        title: optional_text("New title")?,
        description: optional_text("New description")?,
        genre: optional_text("New genre")?,
        release_year: optional_year("New release year")?,
    };

    let spinner = saving_spinner();
    let updated = store.update_by_id(&id, patch)?;
    spinner.finish_and_clear();

    match updated {
        Some(movie) => println!("Movie updated:\n{movie}"),
        // the record vanished between the lookup and the write
        None => println!("Movie not found."),
    }
    Ok(())
}

/// Find-and-remove a movie by id.
fn handle_delete(store: &impl MovieStore) -> Result<()> {
    let id: String = Input::new().with_prompt("Id of the movie to delete").interact_text()?;

    match store.delete_by_id(&id)? {
        Some(movie) => println!("Movie deleted:\n{movie}"),
        None => println!("Movie not found."),
    }
    Ok(())
}

/// Print every movie in the catalog.
fn handle_list(store: &impl MovieStore) -> Result<()> {
    let movies = store.find_all()?;
    if movies.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }
    println!("=== Movies ({}) ===", movies.len());
    for movie in movies {
        println!("{movie}");
        println!();
    }
    Ok(())
}

/// Prompt for a text field that may be left blank. An empty line means
/// "no value" (`None`); anything else, including whitespace, is kept
/// verbatim.
fn optional_text(prompt: &str) -> Result<Option<String>> {
    let input: String = Input::new().with_prompt(prompt).allow_empty(true).interact_text()?;
    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input))
    }
}

/// Prompt for an optional year. A line that is blank after trimming means
/// "no value"; anything else must parse as an integer, and dialoguer
/// re-asks until it does.
fn optional_year(prompt: &str) -> Result<Option<i32>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            let trimmed = input.trim();
            if trimmed.is_empty() || trimmed.parse::<i32>().is_ok() {
                Ok(())
            } else {
                Err("enter a whole number or leave blank")
            }
        })
        .interact_text()?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.parse()?))
    }
}

/// indicatif spinner shown while the catalog file is written, mostly so
/// the save is visible as a distinct step.
fn saving_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Saving...");
    spinner
}
