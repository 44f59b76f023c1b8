// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive catalog.
//
// Module responsibilities:
// - `store`: The movie data model and the persistence boundary (the
//   `MovieStore` trait plus the JSON-file implementation).
// - `ui`: Implements the terminal menu loop and the four catalog
//   operations, delegating persistence to `store`.
//
// Keeping this separation makes it easier to test the store logic or
// swap the storage backend later (for example, a real document database
// behind the same trait).
pub mod store;
pub mod ui;
