use crate::catalog::store::{apply_query, update_records, RouteQuery, RouteStore};
use crate::error::{Result, SafeRouteError};
use crate::types::route::ScoredRoute;
use fs4::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const STORE_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct StoreFile {
    version: u32,
    routes: Vec<ScoredRoute>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    routes: &'a [ScoredRoute],
}

/// Single-document JSON store shared by every process pointed at the same file.
///
/// Reads always go to disk. Writes hold an exclusive lock on a sibling
/// `.lock` file, re-read the document under that lock and replace it through
/// a uniquely named temp file, so the document on disk is either the old or the
/// new catalog and never a mix of two writers.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    dir: PathBuf,
    lock_path: PathBuf,
}

/// Exclusive writer lock, released when dropped.
struct WriteLock(File);

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = self.0.unlock();
    }
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let dir = match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };
        let mut lock_name = path.as_os_str().to_os_string();
        lock_name.push(".lock");

        let store = Self {
            lock_path: PathBuf::from(lock_name),
            dir,
            path,
        };
        let routes = store.load()?;
        debug!(path = %store.path.display(), routes = routes.len(), "opened route store");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<ScoredRoute>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(storage_error(&self.path, error)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: StoreFile =
            serde_json::from_str(&raw).map_err(|e| storage_error(&self.path, e))?;
        if parsed.version != STORE_VERSION {
            return Err(SafeRouteError::Storage(format!(
                "{}: unsupported store version {} (expected {STORE_VERSION})",
                self.path.display(),
                parsed.version
            )));
        }
        Ok(parsed.routes)
    }

    fn lock(&self) -> Result<WriteLock> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| storage_error(&self.lock_path, e))?;
        file.lock_exclusive()
            .map_err(|e| storage_error(&self.lock_path, e))?;
        Ok(WriteLock(file))
    }

    fn write_all(&self, routes: &[ScoredRoute]) -> Result<()> {
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(|e| storage_error(&self.dir, e))?;
        serde_json::to_writer_pretty(
            &mut temp,
            &StoreFileRef {
                version: STORE_VERSION,
                routes,
            },
        )
        .map_err(|e| storage_error(temp.path(), e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| storage_error(temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| storage_error(&self.path, e))?;
        Ok(())
    }
}

fn storage_error(path: &Path, error: impl std::fmt::Display) -> SafeRouteError {
    SafeRouteError::Storage(format!("{}: {}", path.display(), error))
}

impl RouteStore for JsonFileStore {
    fn find_by_id(&self, route_id: &str) -> Result<Option<ScoredRoute>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|route| route.route_id() == route_id))
    }

    fn update<F>(&self, route_id: &str, change: F) -> Result<ScoredRoute>
    where
        F: FnOnce(Option<ScoredRoute>) -> Result<ScoredRoute>,
    {
        let _lock = self.lock()?;
        let mut routes = self.load()?;
        let route = update_records(&mut routes, route_id, change)?;
        self.write_all(&routes)?;
        debug!(route_id, path = %self.path.display(), "saved route");
        Ok(route)
    }

    fn query(&self, query: &RouteQuery) -> Result<Vec<ScoredRoute>> {
        Ok(apply_query(&self.load()?, query))
    }
}
