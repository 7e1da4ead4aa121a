use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::models::RecipientList;
use crate::domain::repositories::RecipientListRepository;

/// Reads recipient lists from `<dir>/<list_id>.json`, each file a JSON array
/// of raw identifier strings. Lists are re-read on every lookup; the job
/// takes its own copy at creation, so edits never affect a running broadcast.
pub struct FileRecipientListRepository {
    dir: PathBuf,
}

impl FileRecipientListRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl RecipientListRepository for FileRecipientListRepository {
    async fn get(&self, id: &str) -> anyhow::Result<Option<RecipientList>> {
        // List ids come straight from the request body; never let them
        // escape the configured directory.
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!("invalid recipient list id");
        }

        let path = self.dir.join(format!("{id}.json"));
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let recipients: Vec<String> = serde_json::from_slice(&raw)?;
        Ok(Some(RecipientList {
            id: id.to_string(),
            recipients,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "broadcaster-lists-{}-{}",
            std::process::id(),
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn loads_a_list_file() {
        let dir = tmp_dir();
        std::fs::write(
            dir.join("customers.json"),
            r#"["9876543210", "+919876543211"]"#,
        )
        .unwrap();

        let repo = FileRecipientListRepository::new(&dir);
        let list = repo.get("customers").await.unwrap().unwrap();
        assert_eq!(list.recipients.len(), 2);
    }

    #[tokio::test]
    async fn missing_list_is_none() {
        let repo = FileRecipientListRepository::new(tmp_dir());
        assert!(repo.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn path_escaping_ids_are_refused() {
        let repo = FileRecipientListRepository::new(tmp_dir());
        assert!(repo.get("../etc/passwd").await.is_err());
        assert!(repo.get("").await.is_err());
    }
}
