//! Remote store adapters
//!
//! The managed backend owns every durable record: module documents, the
//! files and links attached to them, flashcards, and uploaded blobs. The rest
//! of the crate talks to it only through [`RemoteStore`].
//!
//! Layout used by both adapters:
//! ```text
//! users/{uid}/modules/{moduleId}                        # module document
//! users/{uid}/modules/{moduleId}/flashcards/{cardId}    # flashcard documents
//! users/{uid}/modules/{moduleId}/{filename}             # uploaded blob
//! ```

pub mod firebase;
pub mod local;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{FileRef, LinkRef, Module, ModulePatch};
use crate::flashcards::{Flashcard, NewFlashcard};

pub use firebase::{FirebaseConfig, FirebaseStore};
pub use local::LocalStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Email and password sign-in
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A value held in one of a module's array fields. Set operations compare
/// values by exact equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetValue {
    File(FileRef),
    Link(LinkRef),
}

impl SetValue {
    /// Document field holding values of this kind
    pub fn field(&self) -> &'static str {
        match self {
            Self::File(_) => "files",
            Self::Link(_) => "links",
        }
    }

    /// Add to the matching array of `module` unless an equal value is present.
    /// Returns whether the module changed.
    pub fn add_to(&self, module: &mut Module) -> bool {
        match self {
            Self::File(file) => push_missing(&mut module.files, file),
            Self::Link(link) => push_missing(&mut module.links, link),
        }
    }

    /// Remove every equal value from the matching array of `module`.
    /// Returns whether the module changed.
    pub fn remove_from(&self, module: &mut Module) -> bool {
        match self {
            Self::File(file) => remove_equal(&mut module.files, file),
            Self::Link(link) => remove_equal(&mut module.links, link),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Self::File(file) => serde_json::to_value(file),
            Self::Link(link) => serde_json::to_value(link),
        }
    }
}

fn push_missing<T: PartialEq + Clone>(items: &mut Vec<T>, value: &T) -> bool {
    if items.contains(value) {
        false
    } else {
        items.push(value.clone());
        true
    }
}

fn remove_equal<T: PartialEq>(items: &mut Vec<T>, value: &T) -> bool {
    let before = items.len();
    items.retain(|item| item != value);
    items.len() != before
}

/// Storage key for a file uploaded to a module
pub fn blob_path(uid: &str, module_id: &str, file_name: &str) -> String {
    format!("users/{}/modules/{}/{}", uid, module_id, file_name)
}

/// Identity, document and blob operations of the managed backend
#[async_trait]
pub trait RemoteStore: Send + Sync {
    // ==================== Identity ====================

    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity>;

    async fn sign_out(&self) -> Result<()>;

    async fn current_identity(&self) -> Option<Identity>;

    // ==================== Module documents ====================

    /// All module documents of a user, in no particular order
    async fn list_modules(&self, uid: &str) -> Result<Vec<Module>>;

    async fn get_module(&self, uid: &str, module_id: &str) -> Result<Option<Module>>;

    /// Create or replace a module document
    async fn put_module(&self, uid: &str, module: &Module) -> Result<()>;

    /// Create or replace several module documents in one write; either all
    /// land or none do
    async fn put_modules(&self, uid: &str, modules: &[Module]) -> Result<()>;

    /// Merge the patched fields into an existing document
    async fn update_module(&self, uid: &str, module_id: &str, patch: &ModulePatch) -> Result<()>;

    async fn add_to_set(&self, uid: &str, module_id: &str, value: &SetValue) -> Result<()>;

    async fn remove_from_set(&self, uid: &str, module_id: &str, value: &SetValue) -> Result<()>;

    // ==================== Blobs ====================

    /// Store bytes under `path`, returning a retrieval URL
    async fn upload_blob(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;

    async fn delete_blob(&self, path: &str) -> Result<()>;

    /// Storage keys under `prefix`
    async fn list_blobs(&self, prefix: &str) -> Result<Vec<String>>;

    // ==================== Flashcards ====================

    async fn list_flashcards(&self, uid: &str, module_id: &str) -> Result<Vec<Flashcard>>;

    async fn add_flashcard(&self, uid: &str, module_id: &str, card: &NewFlashcard)
        -> Result<Flashcard>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_modules;

    #[test]
    fn test_duplicate_link_add_then_remove() {
        let mut module = default_modules().remove(0);
        let link = SetValue::Link(LinkRef::new("", "https://x"));

        assert!(link.add_to(&mut module));
        assert!(!link.add_to(&mut module));
        assert_eq!(module.links.len(), 1);

        assert!(link.remove_from(&mut module));
        assert!(module.links.is_empty());
        assert!(!link.remove_from(&mut module));
    }

    #[test]
    fn test_remove_requires_exact_value() {
        let mut module = default_modules().remove(0);
        let file = FileRef {
            name: "notes.pdf".to_string(),
            url: "https://files/notes.pdf?token=1".to_string(),
            path: blob_path("u1", &module.id, "notes.pdf"),
        };
        SetValue::File(file.clone()).add_to(&mut module);

        let rotated = FileRef {
            url: "https://files/notes.pdf?token=2".to_string(),
            ..file.clone()
        };
        assert!(!SetValue::File(rotated).remove_from(&mut module));
        assert_eq!(module.files.len(), 1);
        assert!(SetValue::File(file).remove_from(&mut module));
    }

    #[test]
    fn test_blob_path_layout() {
        assert_eq!(blob_path("u1", "CM1005", "a.pdf"), "users/u1/modules/CM1005/a.pdf");
        assert_eq!(SetValue::Link(LinkRef::new("t", "u")).field(), "links");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials {
            email: "me@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("hunter2"));
    }
}
