use crate::core::Matcher;
use crate::models::{CandidateProfile, OpportunityRecord, ScoredOpportunity};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while reading the catalog document
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable snapshot of the opportunity catalog
pub type Catalog = Vec<OpportunityRecord>;

/// Read a catalog document: a JSON array of opportunity records
pub fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Shared holder of the current catalog snapshot
///
/// Readers clone the `Arc` and rank against it without holding the lock.
/// A reload builds a complete new catalog first and then swaps the pointer, so
/// a ranking pass never sees a half-loaded catalog.
pub struct CatalogStore {
    path: Option<PathBuf>,
    snapshot: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    /// Build a store around records already in memory
    pub fn from_records(records: Catalog) -> Self {
        Self {
            path: None,
            snapshot: RwLock::new(Arc::new(records)),
        }
    }

    /// Load the catalog from disk
    ///
    /// A missing or malformed document yields an empty catalog; ranking then
    /// returns no results instead of failing.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let records = match read_catalog(&path) {
            Ok(records) => {
                tracing::info!("Loaded {} opportunities from {}", records.len(), path.display());
                records
            }
            Err(e) => {
                tracing::warn!("{}. Using empty catalog.", e);
                Vec::new()
            }
        };

        Self {
            path: Some(path),
            snapshot: RwLock::new(Arc::new(records)),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn len(&self) -> usize {
        self.snapshot.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swap in a new set of records
    pub fn replace(&self, records: Catalog) {
        let next = Arc::new(records);
        *self.snapshot.write() = next;
    }

    /// Re-read the catalog document and swap it in
    ///
    /// On failure the previous snapshot stays in place.
    pub fn reload(&self) -> Result<usize, CatalogError> {
        let Some(path) = &self.path else {
            return Ok(self.len());
        };

        let records = read_catalog(path)?;
        let count = records.len();
        self.replace(records);

        tracing::info!("Reloaded catalog from {} ({} opportunities)", path.display(), count);
        Ok(count)
    }
}

/// Matcher bound to the live catalog
///
/// This is what request handlers call. Each call ranks against whichever
/// snapshot is current when it starts.
pub struct Recommender {
    matcher: Matcher,
    catalog: Arc<CatalogStore>,
}

impl Recommender {
    pub fn new(matcher: Matcher, catalog: Arc<CatalogStore>) -> Self {
        Self { matcher, catalog }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// Top `top_n` catalog entries for the profile
    pub fn rank(&self, profile: &CandidateProfile, top_n: usize) -> Vec<ScoredOpportunity> {
        let snapshot = self.catalog.snapshot();
        self.matcher.rank(profile, &snapshot, top_n)
    }

    /// Distinct sectors in the current catalog
    pub fn available_sectors(&self) -> Vec<String> {
        Matcher::available_sectors(&self.catalog.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(id: &str, sector: &str) -> OpportunityRecord {
        OpportunityRecord {
            id: id.to_string(),
            sector: sector.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_file_gives_empty_catalog() {
        let store = CatalogStore::load("/definitely/not/here/internships.json");
        assert!(store.is_empty());

        let recommender = Recommender::new(Matcher::default(), Arc::new(store));
        assert!(recommender.rank(&CandidateProfile::default(), 5).is_empty());
        assert!(recommender.available_sectors().is_empty());
    }

    #[test]
    fn test_load_and_reload_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "1", "sector": "Finance"}}]"#).unwrap();

        let store = CatalogStore::load(file.path());
        assert_eq!(store.len(), 1);

        let mut handle = file.reopen().unwrap();
        handle.set_len(0).unwrap();
        write!(handle, r#"[{{"id": "1"}}, {{"id": "2"}}]"#).unwrap();

        assert_eq!(store.reload().unwrap(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "1"}}]"#).unwrap();
        let store = CatalogStore::load(file.path());

        let mut handle = file.reopen().unwrap();
        handle.set_len(0).unwrap();
        write!(handle, "not json").unwrap();

        assert!(matches!(store.reload(), Err(CatalogError::Parse { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let store = CatalogStore::from_records(vec![record("1", "Finance")]);
        let held = store.snapshot();

        store.replace(vec![record("2", "Technology"), record("3", "Design")]);

        assert_eq!(held.len(), 1);
        assert_eq!(held[0].id, "1");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_recommender_reads_current_snapshot() {
        let store = Arc::new(CatalogStore::from_records(vec![record("1", "Finance")]));
        let recommender = Recommender::new(Matcher::default(), Arc::clone(&store));
        assert_eq!(recommender.available_sectors(), vec!["Finance"]);

        store.replace(vec![record("2", "Design")]);
        assert_eq!(recommender.available_sectors(), vec!["Design"]);
    }
}
