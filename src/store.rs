// Persistence module: the movie data model and a small JSON-document
// store that keeps the whole catalog in one file. It is intentionally
// small and synchronous; every operation is a full read-modify-write of
// the catalog file, so there is nothing to keep open between menu
// iterations.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One catalog entry. The `id` is assigned by the store on insert and
/// never changes afterwards; every other field is freely overwritable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub release_year: i32,
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  id:          {}", self.id)?;
        writeln!(f, "  title:       {}", self.title)?;
        writeln!(f, "  description: {}", self.description.as_deref().unwrap_or("-"))?;
        writeln!(f, "  genre:       {}", self.genre.as_deref().unwrap_or("-"))?;
        write!(f, "  year:        {}", self.release_year)
    }
}

/// Field values collected for a new movie. The store assigns the id.
#[derive(Debug, Clone)]
pub struct MovieDraft {
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub release_year: i32,
}

/// A partial update. `None` means "keep the stored value". Blank prompt
/// input is mapped to `None` by the UI before it reaches the store, so
/// empty-string sentinels never appear here.
#[derive(Debug, Clone, Default)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
}

impl MoviePatch {
    /// Overwrite the fields of `movie` for which this patch carries a
    /// value. The id is untouched.
    pub fn apply(&self, movie: &mut Movie) {
        if let Some(title) = &self.title {
            movie.title = title.clone();
        }
        if let Some(description) = &self.description {
            movie.description = Some(description.clone());
        }
        if let Some(genre) = &self.genre {
            movie.genre = Some(genre.clone());
        }
        if let Some(year) = self.release_year {
            movie.release_year = year;
        }
    }
}

/// Errors raised by the store. Ids are typed by the user, so a string
/// that is not a UUID is a store-level error rather than a panic.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("'{0}' is not a valid movie id")]
    MalformedId(String),
    #[error("could not access catalog file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog file {} is not valid JSON: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The persistence boundary the menu loop talks to. Which storage client
/// sits behind it is an implementation detail; the loop only needs
/// insert/find/update/delete by id over movie records.
pub trait MovieStore {
    /// Insert a new movie and return it with its freshly assigned id.
    fn insert(&self, draft: MovieDraft) -> Result<Movie, StoreError>;

    /// Look up one movie. `Ok(None)` means the id resolves to nothing,
    /// which is not an error.
    fn find_by_id(&self, id: &str) -> Result<Option<Movie>, StoreError>;

    /// Every movie in the catalog, in insertion order.
    fn find_all(&self) -> Result<Vec<Movie>, StoreError>;

    /// Apply a partial update and return the merged record, or `None`
    /// if the id is absent.
    fn update_by_id(&self, id: &str, patch: MoviePatch) -> Result<Option<Movie>, StoreError>;

    /// Find-and-remove. Returns the removed record, or `None` if the id
    /// is absent.
    fn delete_by_id(&self, id: &str) -> Result<Option<Movie>, StoreError>;
}

/// File-backed store: the catalog is one pretty-printed JSON array of
/// movies. A missing file reads as an empty catalog.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    /// Create a store configured from the environment variable
    /// `MOVIESHELF_DB`, or fall back to `~/.movieshelf/catalog.json`.
    pub fn from_env() -> Self {
        let path = std::env::var("MOVIESHELF_DB").map(PathBuf::from).unwrap_or_else(|_| {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".movieshelf").join("catalog.json")
        });
        JsonStore::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_id(id: &str) -> Result<Uuid, StoreError> {
        Uuid::parse_str(id.trim()).map_err(|_| StoreError::MalformedId(id.to_string()))
    }

    fn load(&self) -> Result<Vec<Movie>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(StoreError::Io { path: self.path.clone(), source: err });
            }
        };
        serde_json::from_str(&data)
            .map_err(|err| StoreError::Corrupt { path: self.path.clone(), source: err })
    }

    fn save(&self, movies: &[Movie]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| StoreError::Io { path: self.path.clone(), source: err })?;
        }
        let data = serde_json::to_string_pretty(movies)
            .map_err(|err| StoreError::Corrupt { path: self.path.clone(), source: err })?;
        fs::write(&self.path, data)
            .map_err(|err| StoreError::Io { path: self.path.clone(), source: err })
    }
}

impl MovieStore for JsonStore {
    fn insert(&self, draft: MovieDraft) -> Result<Movie, StoreError> {
        let mut movies = self.load()?;
        let movie = Movie {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            genre: draft.genre,
            release_year: draft.release_year,
        };
        movies.push(movie.clone());
        self.save(&movies)?;
        log::debug!("inserted movie {}", movie.id);
        Ok(movie)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Movie>, StoreError> {
        let id = Self::parse_id(id)?;
        let movies = self.load()?;
        Ok(movies.into_iter().find(|movie| movie.id == id))
    }

    fn find_all(&self) -> Result<Vec<Movie>, StoreError> {
        self.load()
    }

    fn update_by_id(&self, id: &str, patch: MoviePatch) -> Result<Option<Movie>, StoreError> {
        let id = Self::parse_id(id)?;
        let mut movies = self.load()?;
        let Some(movie) = movies.iter_mut().find(|movie| movie.id == id) else {
            return Ok(None);
        };
        patch.apply(movie);
        let updated = movie.clone();
        self.save(&movies)?;
        log::debug!("updated movie {}", updated.id);
        Ok(Some(updated))
    }

    fn delete_by_id(&self, id: &str) -> Result<Option<Movie>, StoreError> {
        let id = Self::parse_id(id)?;
        let mut movies = self.load()?;
        let Some(pos) = movies.iter().position(|movie| movie.id == id) else {
            return Ok(None);
        };
        let removed = movies.remove(pos);
        self.save(&movies)?;
        log::debug!("deleted movie {}", removed.id);
        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("catalog.json"));
        (dir, store)
    }

    fn draft(title: &str) -> MovieDraft {
        MovieDraft {
            title: title.to_string(),
            description: Some(format!("about {title}")),
            genre: Some("Drama".to_string()),
            release_year: 2000,
        }
    }

    #[test]
    fn insert_stores_fields_verbatim_and_assigns_fresh_ids() {
        let (_dir, store) = temp_store();
        let first = store
            .insert(MovieDraft {
                title: "Arrival".to_string(),
                description: Some("first contact film".to_string()),
                genre: Some("Sci-Fi".to_string()),
                release_year: 2016,
            })
            .unwrap();
        let second = store.insert(draft("Heat")).unwrap();

        assert_ne!(first.id, second.id);
        assert!(!first.id.is_nil());

        let all = store.find_all().unwrap();
        let stored = all.iter().find(|m| m.id == first.id).unwrap();
        assert_eq!(stored.title, "Arrival");
        assert_eq!(stored.description.as_deref(), Some("first contact film"));
        assert_eq!(stored.genre.as_deref(), Some("Sci-Fi"));
        assert_eq!(stored.release_year, 2016);
    }

    #[test]
    fn find_all_is_empty_for_a_fresh_catalog() {
        let (_dir, store) = temp_store();
        assert!(store.find_all().unwrap().is_empty());
    }

    #[test]
    fn find_all_returns_every_insert_in_order() {
        let (_dir, store) = temp_store();
        let titles = ["Alien", "Blade Runner", "Contact"];
        for title in titles {
            store.insert(draft(title)).unwrap();
        }
        let all = store.find_all().unwrap();
        assert_eq!(all.len(), titles.len());
        for (movie, title) in all.iter().zip(titles) {
            assert_eq!(movie.title, title);
        }
    }

    #[test]
    fn update_keeps_unpatched_fields() {
        let (_dir, store) = temp_store();
        let movie = store.insert(draft("Solaris")).unwrap();

        let patch = MoviePatch { release_year: Some(1972), ..Default::default() };
        let updated = store.update_by_id(&movie.id.to_string(), patch).unwrap().unwrap();

        assert_eq!(updated.id, movie.id);
        assert_eq!(updated.title, movie.title);
        assert_eq!(updated.description, movie.description);
        assert_eq!(updated.genre, movie.genre);
        assert_eq!(updated.release_year, 1972);

        // the merged record is what got persisted
        let reloaded = store.find_by_id(&movie.id.to_string()).unwrap().unwrap();
        assert_eq!(reloaded, updated);
    }

    #[test]
    fn update_with_unknown_id_touches_nothing() {
        let (_dir, store) = temp_store();
        store.insert(draft("Gattaca")).unwrap();
        let before = store.find_all().unwrap();

        let patch = MoviePatch { title: Some("renamed".to_string()), ..Default::default() };
        let result = store.update_by_id(&Uuid::new_v4().to_string(), patch).unwrap();

        assert!(result.is_none());
        assert_eq!(store.find_all().unwrap(), before);
    }

    #[test]
    fn delete_returns_the_removed_record() {
        let (_dir, store) = temp_store();
        let keep = store.insert(draft("Moon")).unwrap();
        let gone = store.insert(draft("Sunshine")).unwrap();

        let removed = store.delete_by_id(&gone.id.to_string()).unwrap().unwrap();
        assert_eq!(removed, gone);

        let all = store.find_all().unwrap();
        assert_eq!(all, vec![keep]);
    }

    #[test]
    fn delete_with_unknown_id_touches_nothing() {
        let (_dir, store) = temp_store();
        store.insert(draft("Primer")).unwrap();
        let before = store.find_all().unwrap();

        assert!(store.delete_by_id(&Uuid::new_v4().to_string()).unwrap().is_none());
        assert_eq!(store.find_all().unwrap(), before);
    }

    #[test]
    fn malformed_id_is_a_store_error() {
        let (_dir, store) = temp_store();
        let err = store.find_by_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, StoreError::MalformedId(_)));
    }

    #[test]
    fn catalog_survives_reopening_the_store() {
        let (_dir, store) = temp_store();
        let movie = store.insert(draft("Stalker")).unwrap();

        let reopened = JsonStore::new(store.path());
        let found = reopened.find_by_id(&movie.id.to_string()).unwrap();
        assert_eq!(found, Some(movie));
    }

    #[test]
    fn corrupt_catalog_file_is_reported() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "{ not json").unwrap();
        let err = store.find_all().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn empty_patch_leaves_a_movie_unchanged() {
        let mut movie = Movie {
            id: Uuid::new_v4(),
            title: "Brazil".to_string(),
            description: None,
            genre: Some("Satire".to_string()),
            release_year: 1985,
        };
        let original = movie.clone();
        MoviePatch::default().apply(&mut movie);
        assert_eq!(movie, original);
    }
}
