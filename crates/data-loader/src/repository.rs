//! Catalog repositories: where movie records and user histories come from.
//!
//! The engine only ever reads through [`CatalogRepository`]. Two
//! implementations live here: a directory of data files and an in-memory
//! store for tests and embedding.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read-only access to the movie catalog and user engagement history.
///
/// `Send + Sync` so one repository can be shared by every request handler.
pub trait CatalogRepository: Send + Sync {
    /// Every movie record, in the store's iteration order
    fn fetch_all_movies(&self) -> Result<Vec<MovieRecord>>;

    /// The user's engaged movies in profile order; empty for unknown users
    fn fetch_user_engaged_ids(&self, user_id: &str) -> Result<Vec<EngagedMovie>>;
}

type Engagements = HashMap<UserId, Vec<EngagedMovie>>;

fn group_engagements(pairs: Vec<(UserId, EngagedMovie)>) -> Engagements {
    let mut grouped: Engagements = HashMap::new();
    for (user_id, entry) in pairs {
        grouped.entry(user_id).or_default().push(entry);
    }
    grouped
}

// =============================================================================
// File-backed repository
// =============================================================================

/// Repository over a data directory:
/// - `movies.dat` or `movies.json` (required)
/// - `engagements.dat` (optional)
///
/// Nothing is cached. Movies are read when the engine is (re)built, and
/// `engagements.dat` is read on every history lookup, so a user's newest
/// engagements count on their next request without a reload.
#[derive(Debug)]
pub struct FileRepository {
    data_dir: PathBuf,
}

impl FileRepository {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.is_dir() {
            return Err(DataLoadError::FileNotFound {
                path: data_dir.display().to_string(),
            });
        }
        let repository = Self { data_dir };

        // Fail fast on a malformed engagements file
        let users = repository.user_ids()?;
        info!(
            "Opened catalog directory {:?} ({} users with history)",
            repository.data_dir,
            users.len()
        );
        Ok(repository)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Users that have at least one engagement on record, sorted
    pub fn user_ids(&self) -> Result<Vec<UserId>> {
        let mut ids: Vec<UserId> = self.load_engagements()?.into_keys().collect();
        ids.sort();
        Ok(ids)
    }

    fn engagements_path(&self) -> PathBuf {
        self.data_dir.join("engagements.dat")
    }

    fn load_engagements(&self) -> Result<Engagements> {
        let path = self.engagements_path();
        if !path.exists() {
            debug!("No engagements.dat in {:?}", self.data_dir);
            return Ok(HashMap::new());
        }
        Ok(group_engagements(parser::parse_engagements(&path)?))
    }
}

impl CatalogRepository for FileRepository {
    fn fetch_all_movies(&self) -> Result<Vec<MovieRecord>> {
        let dat = self.data_dir.join("movies.dat");
        let json = self.data_dir.join("movies.json");

        let movies = if dat.exists() {
            parser::parse_movies(&dat)?
        } else if json.exists() {
            parser::parse_movies_json(&json)?
        } else {
            return Err(DataLoadError::FileNotFound {
                path: dat.display().to_string(),
            });
        };

        info!("Read {} movie records from {:?}", movies.len(), self.data_dir);
        Ok(movies)
    }

    fn fetch_user_engaged_ids(&self, user_id: &str) -> Result<Vec<EngagedMovie>> {
        let path = self.engagements_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let history: Vec<EngagedMovie> = parser::parse_engagements(&path)?
            .into_iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, engaged)| engaged)
            .collect();
        debug!("Read {} engagements for user {}", history.len(), user_id);
        Ok(history)
    }
}

// =============================================================================
// In-memory repository
// =============================================================================

/// Repository held entirely in memory.
///
/// ```ignore
/// let repo = InMemoryRepository::new(movies)
///     .with_user("u1", vec![EngagedMovie::new(1)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    movies: Vec<MovieRecord>,
    engagements: Engagements,
}

impl InMemoryRepository {
    pub fn new(movies: Vec<MovieRecord>) -> Self {
        Self {
            movies,
            engagements: HashMap::new(),
        }
    }

    /// Add (or replace) a user's history (builder pattern)
    pub fn with_user(mut self, user_id: impl Into<UserId>, history: Vec<EngagedMovie>) -> Self {
        self.engagements.insert(user_id.into(), history);
        self
    }
}

impl CatalogRepository for InMemoryRepository {
    fn fetch_all_movies(&self) -> Result<Vec<MovieRecord>> {
        Ok(self.movies.clone())
    }

    fn fetch_user_engaged_ids(&self, user_id: &str) -> Result<Vec<EngagedMovie>> {
        Ok(self.engagements.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId) -> MovieRecord {
        MovieRecord {
            id,
            title: format!("Movie {id}"),
            genres: vec![],
            keywords: String::new(),
            overview: String::new(),
            rating: 7.0,
            vote_count: 10,
        }
    }

    #[test]
    fn test_in_memory_unknown_user_is_empty() {
        let repo = InMemoryRepository::new(vec![movie(1)]);
        assert!(repo.fetch_user_engaged_ids("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_in_memory_preserves_profile_order() {
        let repo = InMemoryRepository::new(vec![movie(1), movie(2)]).with_user(
            "u1",
            vec![EngagedMovie::new(2), EngagedMovie::new(1)],
        );

        let history = repo.fetch_user_engaged_ids("u1").unwrap();
        let ids: Vec<MovieId> = history.iter().map(|e| e.movie_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(repo.fetch_all_movies().unwrap().len(), 2);
    }

    #[test]
    fn test_group_engagements_keeps_file_order() {
        let grouped = group_engagements(vec![
            ("a".to_string(), EngagedMovie::new(3)),
            ("b".to_string(), EngagedMovie::new(1)),
            ("a".to_string(), EngagedMovie::new(2)),
        ]);

        let a: Vec<MovieId> = grouped["a"].iter().map(|e| e.movie_id).collect();
        assert_eq!(a, vec![3, 2]);
        assert_eq!(grouped["b"].len(), 1);
    }

    #[test]
    fn test_open_missing_directory() {
        let result = FileRepository::open("/definitely/not/a/catalog/dir");
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }

    const MOVIES: &str = "1::A::7.0::2000::Action::hero::a soldier
2::B::6.0::1500::Action::hero::a fighter
";

    fn write_catalog(dir: &Path, engagements: &str) {
        std::fs::write(dir.join("movies.dat"), MOVIES).unwrap();
        std::fs::write(dir.join("engagements.dat"), engagements).unwrap();
    }

    #[test]
    fn test_history_reflects_engagements_written_after_open() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "u1::1\n");

        let repo = FileRepository::open(dir.path()).unwrap();
        assert!(repo.fetch_user_engaged_ids("u2").unwrap().is_empty());

        std::fs::write(dir.path().join("engagements.dat"), "u1::1\nu2::2\nu2::1::4.5\n").unwrap();

        let history = repo.fetch_user_engaged_ids("u2").unwrap();
        let ids: Vec<MovieId> = history.iter().map(|e| e.movie_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(history[1].rating, Some(4.5));
        assert_eq!(repo.user_ids().unwrap(), vec!["u1", "u2"]);
    }

    #[test]
    fn test_fetch_all_movies_leaves_histories_alone() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "u1::1\n");
        let repo = FileRepository::open(dir.path()).unwrap();

        // A catalog that fails validation must not disturb history lookups
        let duplicated = format!("{MOVIES}1::A2::7.0::2000::Action::hero::dup\n");
        std::fs::write(dir.path().join("movies.dat"), duplicated).unwrap();
        let movies = repo.fetch_all_movies().unwrap();
        assert!(Catalog::from_records(movies).is_err());

        let ids: Vec<MovieId> = repo
            .fetch_user_engaged_ids("u1")
            .unwrap()
            .iter()
            .map(|e| e.movie_id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_missing_engagements_file_means_no_history() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path(), "");
        std::fs::remove_file(dir.path().join("engagements.dat")).unwrap();

        let repo = FileRepository::open(dir.path()).unwrap();
        assert!(repo.fetch_user_engaged_ids("u1").unwrap().is_empty());
        assert!(repo.user_ids().unwrap().is_empty());
    }

    #[test]
    fn test_sample_dataset() {
        // Uses the sample dataset shipped at the workspace root when present
        let data_dir = Path::new("../../data/sample");

        if data_dir.exists() {
            let repo = FileRepository::open(data_dir).unwrap();
            let movies = repo.fetch_all_movies().unwrap();
            let catalog = Catalog::from_records(movies).unwrap();

            assert!(catalog.len() >= 3);
            assert!(!repo.user_ids().unwrap().is_empty());
        }
    }
}
