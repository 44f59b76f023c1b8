// Entrypoint for the CLI application.
// - Keeps `main` small: build the store and hand it to the UI loop.
// - Returns `anyhow::Result` to simplify error handling at the boundary.

use movieshelf::{store::JsonStore, ui::main_menu};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Catalog location comes from the environment variable `MOVIESHELF_DB`
    // or defaults to ~/.movieshelf/catalog.json. See `JsonStore::from_env`.
    let store = JsonStore::from_env();
    log::debug!("catalog file: {}", store.path().display());

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(store)?;
    Ok(())
}
