use super::{RecordStore, STORAGE_KEY};
use crate::error::{DashError, Result};
use crate::model::Customer;
use std::fs;
use std::path::{Path, PathBuf};

pub struct FileStore {
    root: PathBuf,
    key: String,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            key: STORAGE_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join(format!("{}.json", self.key))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(DashError::Io)?;
        }
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn read_all(&self) -> Result<Option<Vec<Customer>>> {
        let data_file = self.data_file();
        if !data_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(data_file).map_err(DashError::Io)?;
        let customers: Vec<Customer> =
            serde_json::from_str(&content).map_err(DashError::Serialization)?;
        Ok(Some(customers))
    }

    fn write_all(&mut self, customers: &[Customer]) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content = serde_json::to_string_pretty(customers).map_err(DashError::Serialization)?;
        fs::write(self.data_file(), content).map_err(DashError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::generate_customers;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert!(store.read_all().unwrap().is_none());
    }

    #[test]
    fn writes_and_reads_back_the_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        let customers = generate_customers(3);

        store.write_all(&customers).unwrap();

        assert!(store.data_file().ends_with("customer_payment_dashboard_data.json"));
        assert_eq!(store.read_all().unwrap(), Some(customers));
    }

    #[test]
    fn empty_collection_is_distinct_from_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());
        store.write_all(&[]).unwrap();
        assert_eq!(store.read_all().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).with_key("broken");
        fs::write(store.data_file(), "{not json").unwrap();
        assert!(matches!(
            store.read_all(),
            Err(DashError::Serialization(_))
        ));
    }
}
