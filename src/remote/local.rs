//! Local directory backend
//!
//! Directory structure under the data directory:
//! ```text
//! users/{uid}/modules/
//! ├── {module-id}.json              # Module document
//! └── {module-id}/flashcards.json   # Array of the module's flashcards
//! blobs/users/{uid}/modules/{module-id}/{filename}
//! ```
//!
//! Users are identified by email only; the uid is a v5 UUID derived from the
//! lowercased address so it is stable across runs.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{Credentials, Identity, RemoteStore, Result, SetValue, StoreError};
use crate::catalog::{Module, ModulePatch};
use crate::flashcards::{Flashcard, NewFlashcard};

pub struct LocalStore {
    /// Base path (e.g., ~/.local/share/study-tracker)
    root: PathBuf,
    identity: Mutex<Option<Identity>>,
}

impl LocalStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            identity: Mutex::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic uid for an email address
    pub fn uid_for(email: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, email.trim().to_lowercase().as_bytes()).to_string()
    }

    /// Get the modules directory for a user
    fn modules_dir(&self, uid: &str) -> Result<PathBuf> {
        Ok(self.root.join("users").join(segment(uid)?).join("modules"))
    }

    /// Get the path for a module document
    fn module_path(&self, uid: &str, module_id: &str) -> Result<PathBuf> {
        Ok(self
            .modules_dir(uid)?
            .join(format!("{}.json", segment(module_id)?)))
    }

    /// Get the flashcards.json path for a module
    fn flashcards_path(&self, uid: &str, module_id: &str) -> Result<PathBuf> {
        Ok(self
            .modules_dir(uid)?
            .join(segment(module_id)?)
            .join("flashcards.json"))
    }

    fn blob_file(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !safe || path.trim().is_empty() {
            return Err(StoreError::Malformed(format!("Invalid storage path: {}", path)));
        }
        Ok(self.root.join("blobs").join(relative))
    }

    fn read_module(&self, uid: &str, module_id: &str) -> Result<Option<Module>> {
        let path = self.module_path(uid, module_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn require_module(&self, uid: &str, module_id: &str) -> Result<Module> {
        self.read_module(uid, module_id)?
            .ok_or_else(|| StoreError::NotFound(format!("users/{}/modules/{}", uid, module_id)))
    }

    fn write_module(&self, uid: &str, module: &Module) -> Result<()> {
        let path = self.module_path(uid, &module.id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(module)?)?;
        Ok(())
    }

    fn read_flashcards(&self, uid: &str, module_id: &str) -> Result<Vec<Flashcard>> {
        let path = self.flashcards_path(uid, module_id)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// A single path segment taken from an id
fn segment(id: &str) -> Result<&str> {
    if id.is_empty() || id == "." || id == ".." || id.contains(|c: char| c == '/' || c == '\\') {
        return Err(StoreError::Malformed(format!("Invalid document id: {:?}", id)));
    }
    Ok(id)
}

fn collect_files(dir: &Path, base: &Path, out: &mut Vec<String>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, base, out)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            let key: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(key.join("/"));
        }
    }
    Ok(())
}

#[async_trait]
impl RemoteStore for LocalStore {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity> {
        let email = credentials.email.trim();
        if email.is_empty() {
            return Err(StoreError::AuthFailed("an email address is required".to_string()));
        }
        let identity = Identity {
            uid: Self::uid_for(email),
            email: Some(email.to_string()),
        };
        fs::create_dir_all(self.modules_dir(&identity.uid)?)?;
        if let Ok(mut current) = self.identity.lock() {
            *current = Some(identity.clone());
        }
        log::info!("Signed in locally as {}", email);
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        if let Ok(mut current) = self.identity.lock() {
            *current = None;
        }
        Ok(())
    }

    async fn current_identity(&self) -> Option<Identity> {
        self.identity.lock().ok().and_then(|current| current.clone())
    }

    async fn list_modules(&self, uid: &str) -> Result<Vec<Module>> {
        let dir = self.modules_dir(uid)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut modules = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                let module: Module = serde_json::from_str(&content)?;
                modules.push(module);
            }
        }
        Ok(modules)
    }

    async fn get_module(&self, uid: &str, module_id: &str) -> Result<Option<Module>> {
        self.read_module(uid, module_id)
    }

    async fn put_module(&self, uid: &str, module: &Module) -> Result<()> {
        self.write_module(uid, module)
    }

    async fn put_modules(&self, uid: &str, modules: &[Module]) -> Result<()> {
        // Serialize everything before touching the directory.
        let mut documents = Vec::with_capacity(modules.len());
        for module in modules {
            let path = self.module_path(uid, &module.id)?;
            documents.push((path, serde_json::to_string_pretty(module)?));
        }
        fs::create_dir_all(self.modules_dir(uid)?)?;

        let mut written = Vec::with_capacity(documents.len());
        for (path, content) in documents {
            if let Err(e) = fs::write(&path, content) {
                for path in written {
                    let _ = fs::remove_file(path);
                }
                return Err(e.into());
            }
            written.push(path);
        }
        Ok(())
    }

    async fn update_module(&self, uid: &str, module_id: &str, patch: &ModulePatch) -> Result<()> {
        let module = self.require_module(uid, module_id)?;
        self.write_module(uid, &module.patched(patch))
    }

    async fn add_to_set(&self, uid: &str, module_id: &str, value: &SetValue) -> Result<()> {
        let mut module = self.require_module(uid, module_id)?;
        if value.add_to(&mut module) {
            self.write_module(uid, &module)?;
        }
        Ok(())
    }

    async fn remove_from_set(&self, uid: &str, module_id: &str, value: &SetValue) -> Result<()> {
        let mut module = self.require_module(uid, module_id)?;
        if value.remove_from(&mut module) {
            self.write_module(uid, &module)?;
        }
        Ok(())
    }

    async fn upload_blob(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let file = self.blob_file(path)?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, &bytes)?;
        log::debug!("Stored {} bytes ({}) at {}", bytes.len(), content_type, file.display());
        Ok(format!("file://{}", file.display()))
    }

    async fn delete_blob(&self, path: &str) -> Result<()> {
        let file = self.blob_file(path)?;
        if !file.exists() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        fs::remove_file(&file)?;
        Ok(())
    }

    async fn list_blobs(&self, prefix: &str) -> Result<Vec<String>> {
        let base = self.root.join("blobs");
        if !base.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        collect_files(&base, &base, &mut keys)?;
        keys.retain(|key| key.starts_with(prefix.trim_start_matches('/')));
        keys.sort();
        Ok(keys)
    }

    async fn list_flashcards(&self, uid: &str, module_id: &str) -> Result<Vec<Flashcard>> {
        self.read_flashcards(uid, module_id)
    }

    async fn add_flashcard(
        &self,
        uid: &str,
        module_id: &str,
        card: &NewFlashcard,
    ) -> Result<Flashcard> {
        let mut cards = self.read_flashcards(uid, module_id)?;
        let created = card.clone().with_id(Uuid::new_v4().to_string());
        cards.push(created.clone());

        let path = self.flashcards_path(uid, module_id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(&cards)?)?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_modules, LinkRef, ModuleStatus};
    use crate::remote::blob_path;

    fn store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn credentials(email: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: String::new(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_is_stable_per_email() {
        let (_dir, store) = store();
        let first = store.sign_in(&credentials("Me@Example.com")).await.unwrap();
        let second = store.sign_in(&credentials("me@example.com ")).await.unwrap();
        assert_eq!(first.uid, second.uid);
        assert_eq!(store.current_identity().await, Some(second));

        store.sign_out().await.unwrap();
        assert!(store.current_identity().await.is_none());
        assert!(store.sign_in(&credentials("  ")).await.is_err());
    }

    #[tokio::test]
    async fn test_module_documents() {
        let (_dir, store) = store();
        assert!(store.list_modules("u1").await.unwrap().is_empty());

        let module = default_modules().remove(0);
        store.put_module("u1", &module).await.unwrap();
        assert_eq!(store.get_module("u1", &module.id).await.unwrap(), Some(module.clone()));
        assert_eq!(store.list_modules("u1").await.unwrap().len(), 1);
        assert!(store.list_modules("u2").await.unwrap().is_empty());

        store
            .update_module("u1", &module.id, &ModulePatch::status(ModuleStatus::Completed))
            .await
            .unwrap();
        let stored = store.get_module("u1", &module.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ModuleStatus::Completed);
        assert_eq!(stored.final_date, module.final_date);

        let missing = store
            .update_module("u1", "CM9999", &ModulePatch::status(ModuleStatus::Completed))
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_put_modules_writes_all_or_nothing() {
        let (_dir, store) = store();
        store.put_modules("u1", &default_modules()).await.unwrap();
        assert_eq!(store.list_modules("u1").await.unwrap().len(), 23);

        let mut modules = default_modules();
        modules[5].id = "bad/id".to_string();
        assert!(store.put_modules("u2", &modules).await.is_err());
        assert!(store.list_modules("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_operations_use_value_equality() {
        let (_dir, store) = store();
        let module = default_modules().remove(0);
        store.put_module("u1", &module).await.unwrap();

        let link = SetValue::Link(LinkRef::new("", "https://x"));
        store.add_to_set("u1", &module.id, &link).await.unwrap();
        store.add_to_set("u1", &module.id, &link).await.unwrap();
        let stored = store.get_module("u1", &module.id).await.unwrap().unwrap();
        assert_eq!(stored.links.len(), 1);

        store.remove_from_set("u1", &module.id, &link).await.unwrap();
        let stored = store.get_module("u1", &module.id).await.unwrap().unwrap();
        assert!(stored.links.is_empty());
    }

    #[tokio::test]
    async fn test_blobs() {
        let (_dir, store) = store();
        let path = blob_path("u1", "CM1005", "notes.txt");
        let url = store.upload_blob(&path, b"hello".to_vec(), "text/plain").await.unwrap();
        assert!(url.starts_with("file://"));
        assert_eq!(store.list_blobs("users/u1/").await.unwrap(), vec![path.clone()]);

        store.delete_blob(&path).await.unwrap();
        assert!(store.list_blobs("users/u1/").await.unwrap().is_empty());
        assert!(matches!(store.delete_blob(&path).await, Err(StoreError::NotFound(_))));
        assert!(store.upload_blob("../escape", Vec::new(), "text/plain").await.is_err());
    }

    #[tokio::test]
    async fn test_flashcards_keep_creation_order() {
        let (_dir, store) = store();
        let first = store
            .add_flashcard("u1", "CM1005", &NewFlashcard::new("Q1", "A1"))
            .await
            .unwrap();
        let second = store
            .add_flashcard("u1", "CM1005", &NewFlashcard::new("Q2", "A2"))
            .await
            .unwrap();
        assert_ne!(first.id, second.id);

        let cards = store.list_flashcards("u1", "CM1005").await.unwrap();
        assert_eq!(cards, vec![first, second]);
        assert!(store.list_flashcards("u1", "CM1010").await.unwrap().is_empty());

        // Flashcard directories sit beside module documents without being
        // mistaken for them.
        store.put_module("u1", &default_modules().remove(0)).await.unwrap();
        assert_eq!(store.list_modules("u1").await.unwrap().len(), 1);
    }
}
