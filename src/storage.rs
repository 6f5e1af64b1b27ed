use std::path::{Path, PathBuf};

/// Resolves where a dumped artifact of one entity lives.
///
/// `kind` is one of `fundamental`, `ratings`, `list` or `history-<months>`;
/// `extension` is `html` or `csv`.
pub trait Storage {
    fn storage_path(&self, kind: &str, extension: &str) -> PathBuf;
}

/// Flat dump layout: `<dir>/<name>.<kind>.<extension>`.
#[derive(Debug, Clone)]
pub struct DumpStorage {
    dir: PathBuf,
    name: String,
}

impl DumpStorage {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// Storage of the index itself: `<root>/<index>/<index>.*`.
    pub fn for_index(root: impl AsRef<Path>, index: &str) -> Self {
        Self::new(root.as_ref().join(index), index)
    }

    /// Storage of one constituent, stored next to its index: `<root>/<index>/<stock_id>.*`.
    pub fn for_stock(root: impl AsRef<Path>, index: &str, stock_id: &str) -> Self {
        Self::new(root.as_ref().join(index), stock_id)
    }
}

impl Storage for DumpStorage {
    fn storage_path(&self, kind: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}.{}", self.name, kind, extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_list_lands_in_index_folder() {
        let storage = DumpStorage::for_index("dump", "DAX");
        assert_eq!(
            storage.storage_path("list", "html"),
            Path::new("dump/DAX/DAX.list.html")
        );
    }

    #[test]
    fn stock_files_are_keyed_by_id() {
        let storage = DumpStorage::for_stock("dump", "DAX", "DE0007164600");
        assert_eq!(
            storage.storage_path("history-6", "csv"),
            Path::new("dump/DAX/DE0007164600.history-6.csv")
        );
    }
}
