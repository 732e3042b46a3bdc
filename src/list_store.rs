use crate::error::{ListError, ListErrorCode};
use crate::list_record::{ListKind, ListRecord};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// All records of one kind, keyed by scope (e.g. species).
pub type ScopedLists = HashMap<String, Vec<ListRecord>>;

/// File-backed store of user lists. One JSON file per kind under the
/// injected directory; every mutating call rewrites the file in full, so a
/// mutation is atomic relative to the single-threaded caller.
#[derive(Debug, Clone)]
pub struct ListStore {
    dir: PathBuf,
}

impl ListStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, kind: ListKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.file_stem()))
    }

    /// Returns every scope of the given kind. A missing file reads as an
    /// empty store.
    pub fn get_all(&self, kind: ListKind) -> Result<ScopedLists, ListError> {
        let path = self.file_path(kind);
        if !path.exists() {
            return Ok(ScopedLists::new());
        }
        let text = fs::read_to_string(&path).map_err(|e| ListError {
            code: ListErrorCode::Io,
            message: format!("Could not read list store '{}': {e}", path.display()),
        })?;
        serde_json::from_str(&text).map_err(|e| ListError {
            code: ListErrorCode::Serde,
            message: format!("Could not parse list store '{}': {e}", path.display()),
        })
    }

    fn write_all(&self, kind: ListKind, lists: &ScopedLists) -> Result<(), ListError> {
        fs::create_dir_all(&self.dir).map_err(|e| ListError {
            code: ListErrorCode::Io,
            message: format!("Could not create list store dir '{}': {e}", self.dir.display()),
        })?;
        let path = self.file_path(kind);
        let text = serde_json::to_string_pretty(lists).map_err(|e| ListError {
            code: ListErrorCode::Serde,
            message: format!("Could not serialize list store '{}': {e}", path.display()),
        })?;
        fs::write(&path, text).map_err(|e| ListError {
            code: ListErrorCode::Io,
            message: format!("Could not write list store '{}': {e}", path.display()),
        })
    }

    /// Records for one scope, in stored (group-sorted) order.
    pub fn get(&self, kind: ListKind, scope: &str) -> Result<Vec<ListRecord>, ListError> {
        Ok(self.get_all(kind)?.remove(scope).unwrap_or_default())
    }

    pub fn find(
        &self,
        kind: ListKind,
        scope: &str,
        name: &str,
    ) -> Result<Option<ListRecord>, ListError> {
        Ok(self
            .get(kind, scope)?
            .into_iter()
            .find(|record| record.name == name))
    }

    /// Appends a record and re-sorts the scope by group. The sort is stable,
    /// so insertion order within a group is preserved.
    pub fn set(
        &self,
        kind: ListKind,
        scope: &str,
        name: &str,
        items: Vec<String>,
        group: &str,
        color: &str,
    ) -> Result<(), ListError> {
        let mut lists = self.get_all(kind)?;
        let records = lists.entry(scope.to_string()).or_default();
        records.push(ListRecord::new(name, items, group, color));
        records.sort_by(|a, b| a.group.cmp(&b.group));
        self.write_all(kind, &lists)
    }

    pub fn rename(
        &self,
        kind: ListKind,
        scope: &str,
        name: &str,
        new_name: &str,
    ) -> Result<(), ListError> {
        let mut lists = self.get_all(kind)?;
        let record = lists
            .get_mut(scope)
            .and_then(|records| records.iter_mut().find(|record| record.name == name))
            .ok_or_else(|| ListError {
                code: ListErrorCode::NotFound,
                message: format!("Cannot rename list {name}: list is not available for {scope}"),
            })?;
        record.name = new_name.to_string();
        self.write_all(kind, &lists)
    }

    pub fn remove(&self, kind: ListKind, scope: &str, name: &str) -> Result<(), ListError> {
        let mut lists = self.get_all(kind)?;
        let records = lists.get_mut(scope).ok_or_else(|| ListError {
            code: ListErrorCode::NotFound,
            message: format!("Cannot delete list {name}: list is not available for {scope}"),
        })?;
        let index = records
            .iter()
            .position(|record| record.name == name)
            .ok_or_else(|| ListError {
                code: ListErrorCode::NotFound,
                message: format!("Cannot delete list {name}: list is not available for {scope}"),
            })?;
        records.remove(index);
        self.write_all(kind, &lists)
    }

    /// Deletes all records for one scope. Other scopes are untouched.
    pub fn reset_scope(&self, kind: ListKind, scope: &str) -> Result<(), ListError> {
        let mut lists = self.get_all(kind)?;
        lists.remove(scope);
        self.write_all(kind, &lists)
    }
}
