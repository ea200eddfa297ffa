use crate::model::Payload;
use crate::source::Source;
use crate::{utils, Result};
use std::path::{Path, PathBuf};

/// Reads the payload from a local JSON file. Useful offline, and for running the whole program
/// without network access.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Source for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Payload> {
        utils::deserialize(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::payload_json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        utils::write(&path, payload_json().to_string()).await.unwrap();

        let payload = FileSource::new(&path).fetch().await.unwrap();
        assert_eq!(payload.customers.len(), 4);
        assert_eq!(payload.transactions.len(), 7);
    }

    #[tokio::test]
    async fn test_fetch_numeric_date_and_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        let json = r#"{
            "customers": [{"id": 1, "name": 1001}],
            "transactions": [{"id": 1, "customer_id": 1, "date": 20220101, "amount": 5}]
        }"#;
        utils::write(&path, json).await.unwrap();

        let payload = FileSource::new(&path).fetch().await.unwrap();
        assert_eq!(payload.customers[0].name(), "1001");
        let date = payload.transactions[0].date().unwrap();
        assert_eq!(date.to_string(), "20220101");
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("nope.json"));
        assert!(source.fetch().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        utils::write(&path, r#"{"customers": "not a list"}"#)
            .await
            .unwrap();
        let err = FileSource::new(&path).fetch().await.err().unwrap();
        assert!(err.to_string().contains("Failed to parse JSON file"));
    }
}
