//! Named raster storage.
//!
//! The pipeline keeps its inputs, output, and every intermediate surface in a
//! [`RasterStore`] under string names, the way a GIS mapset holds named maps.
//! Intermediates get run-private names from a [`Scratch`] allocator so that
//! two runs sharing one store can never collide, and the allocator's sweep is
//! invoked on every exit path so no intermediate outlives its run.

use std::collections::HashMap;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{FillError, Result};
use crate::raster::Raster;

/// Monotonic run counter, combined with the pid for scratch-name uniqueness.
static RUN_SEQ: AtomicU64 = AtomicU64::new(0);

/// An in-memory store of named rasters.
#[derive(Debug, Default)]
pub struct RasterStore {
    rasters: HashMap<String, Raster>,
}

impl RasterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the raster stored under `name`.
    pub fn write(&mut self, name: &str, raster: Raster) {
        self.rasters.insert(name.to_string(), raster);
    }

    /// Look up the raster stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FillError::RasterNotFound`] if no raster has that name.
    pub fn read(&self, name: &str) -> Result<&Raster> {
        self.rasters.get(name).ok_or_else(|| FillError::RasterNotFound {
            name: name.to_string(),
        })
    }

    /// Rename a stored raster, replacing any raster already under `new`.
    ///
    /// # Errors
    ///
    /// Returns [`FillError::RasterNotFound`] if `old` does not exist.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let raster = self
            .rasters
            .remove(old)
            .ok_or_else(|| FillError::RasterNotFound {
                name: old.to_string(),
            })?;
        self.rasters.insert(new.to_string(), raster);
        Ok(())
    }

    /// Remove the named rasters. Names that don't exist are skipped.
    pub fn remove<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.rasters.remove(name.as_ref());
        }
    }

    /// Whether a raster is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.rasters.contains_key(name)
    }

    /// Number of stored rasters.
    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }
}

/// Allocator for run-private intermediate raster names.
///
/// Every name carries the process id and a per-process run counter, so
/// concurrent runs against a shared store stay disjoint. The owner must call
/// [`Scratch::sweep`] once the run is over, successful or not.
#[derive(Debug)]
pub struct Scratch {
    prefix: String,
    issued: Vec<String>,
}

impl Scratch {
    /// Start a new scratch namespace.
    pub fn new() -> Self {
        let seq = RUN_SEQ.fetch_add(1, Ordering::Relaxed);
        Self {
            prefix: format!("gapfill.tmp.{}.{}", process::id(), seq),
            issued: Vec::new(),
        }
    }

    /// Allocate a scratch name tagged `tag` and remember it for the sweep.
    pub fn name(&mut self, tag: &str) -> String {
        let name = format!("{}.{}", self.prefix, tag);
        self.issued.push(name.clone());
        name
    }

    /// Remove every allocated name from `store`.
    pub fn sweep(&self, store: &mut RasterStore) {
        store.remove(&self.issued);
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    fn raster() -> Raster {
        Raster::filled(
            Region::from_grid(0.0, 60.0, 2, 2, 30.0, 30.0).unwrap(),
            1.0,
        )
    }

    #[test]
    fn test_write_read() {
        let mut store = RasterStore::new();
        store.write("dem", raster());
        assert!(store.contains("dem"));
        assert_eq!(store.read("dem").unwrap().valid_count(), 4);
    }

    #[test]
    fn test_read_missing() {
        let store = RasterStore::new();
        let err = store.read("nope").unwrap_err();
        match err {
            FillError::RasterNotFound { name } => assert_eq!(name, "nope"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rename() {
        let mut store = RasterStore::new();
        store.write("a", raster());
        store.rename("a", "b").unwrap();
        assert!(!store.contains("a"));
        assert!(store.contains("b"));

        assert!(store.rename("a", "c").is_err());
    }

    #[test]
    fn test_remove_is_best_effort() {
        let mut store = RasterStore::new();
        store.write("a", raster());
        store.remove(["a", "missing"]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_scratch_names_are_unique_and_swept() {
        let mut store = RasterStore::new();
        let mut s1 = Scratch::new();
        let mut s2 = Scratch::new();

        let n1 = s1.name("mask");
        let n2 = s2.name("mask");
        assert_ne!(n1, n2);

        store.write(&n1, raster());
        store.write(&n2, raster());
        store.write("keep", raster());

        s1.sweep(&mut store);
        assert!(!store.contains(&n1));
        assert!(store.contains(&n2));
        assert!(store.contains("keep"));

        s2.sweep(&mut store);
        assert_eq!(store.len(), 1);
    }
}
