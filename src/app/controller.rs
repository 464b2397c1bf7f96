//! User-triggered flows against the remote store
//!
//! Each flow awaits its backend calls in sequence and replaces the current
//! [`AppState`] snapshot when it succeeds. Backend failures are logged where
//! they happen and returned to the caller; nothing is retried.

use std::sync::Arc;

use futures_util::future::try_join_all;
use thiserror::Error;

use super::state::AppState;
use crate::catalog::{default_modules, FileRef, LinkRef, Module, ModulePatch};
use crate::flashcards::{Flashcard, NewFlashcard, ReviewSession};
use crate::remote::{blob_path, Credentials, Identity, RemoteStore, SetValue, StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Validation(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Not signed in")]
    NotSignedIn,
}

pub type Result<T> = std::result::Result<T, AppError>;

pub struct StudyApp {
    store: Arc<dyn RemoteStore>,
    state: AppState,
}

impl StudyApp {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            state: AppState::signed_out(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    fn identity(&self) -> Result<Identity> {
        self.state.identity().cloned().ok_or(AppError::NotSignedIn)
    }

    fn require_module(&self, module_id: &str) -> Result<&Module> {
        self.state
            .module(module_id)
            .ok_or_else(|| AppError::ModuleNotFound(module_id.to_string()))
    }

    // ==================== Identity ====================

    pub async fn sign_in(&mut self, credentials: &Credentials) -> Result<&AppState> {
        let identity = self.store.sign_in(credentials).await.map_err(|e| {
            log::error!("Error signing in: {}", e);
            e
        })?;
        self.load(identity).await?;
        Ok(&self.state)
    }

    /// Pick up an identity the store already holds, or clear all state when
    /// there is none
    pub async fn restore_session(&mut self) -> Result<&AppState> {
        match self.store.current_identity().await {
            Some(identity) => self.load(identity).await?,
            None => self.state = AppState::signed_out(),
        }
        Ok(&self.state)
    }

    /// Drop local state even when the store fails to end its session
    pub async fn sign_out(&mut self) -> Result<()> {
        let result = self.store.sign_out().await;
        self.state = AppState::signed_out();
        result.map_err(|e| {
            log::error!("Error signing out: {}", e);
            e.into()
        })
    }

    /// Load the user's modules, seeding the registry defaults into an empty
    /// collection
    async fn load(&mut self, identity: Identity) -> Result<()> {
        let mut modules = self.store.list_modules(&identity.uid).await.map_err(|e| {
            log::error!("Error loading modules: {}", e);
            e
        })?;

        if modules.is_empty() {
            modules = default_modules();
            log::info!("Seeding {} default modules for {}", modules.len(), identity.uid);
            self.store
                .put_modules(&identity.uid, &modules)
                .await
                .map_err(|e| {
                    log::error!("Error seeding modules: {}", e);
                    e
                })?;
        } else {
            modules.sort_by(|a, b| a.id.cmp(&b.id));
        }

        self.state = AppState::signed_in(identity, modules);
        Ok(())
    }

    /// Re-read one module so backend-derived fields (file URLs) are current
    async fn refresh_module(&mut self, uid: &str, module_id: &str) -> Result<()> {
        match self.store.get_module(uid, module_id).await? {
            Some(module) => self.state = self.state.with_module(module),
            None => log::warn!("Module {} disappeared from the store", module_id),
        }
        Ok(())
    }

    // ==================== Module fields ====================

    /// Merge `patch` locally, then write it. A failed write restores the
    /// previous snapshot.
    pub async fn update_module(&mut self, module_id: &str, patch: &ModulePatch) -> Result<()> {
        let identity = self.identity()?;
        self.require_module(module_id)?;
        if patch.is_empty() {
            return Ok(());
        }

        let previous = std::mem::replace(&mut self.state, AppState::signed_out());
        self.state = previous.with_patch(module_id, patch);

        if let Err(e) = self.store.update_module(&identity.uid, module_id, patch).await {
            log::error!("Error updating module {}: {}", module_id, e);
            self.state = previous;
            return Err(e.into());
        }
        Ok(())
    }

    // ==================== Files ====================

    pub async fn upload_file(
        &mut self,
        module_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<FileRef> {
        let file_name = file_name.trim();
        if file_name.is_empty() || file_name.contains('/') {
            return Err(AppError::Validation("Please choose a file to upload.".to_string()));
        }
        let identity = self.identity()?;
        let module = self.require_module(module_id)?.clone();

        let path = blob_path(&identity.uid, module_id, file_name);
        let result = self
            .upload_and_attach(&identity, &module, file_name, &path, bytes, content_type)
            .await;
        match result {
            Ok(file) => {
                // The file is stored and attached; a stale view is not a failed upload.
                if let Err(e) = self.refresh_module(&identity.uid, module_id).await {
                    log::warn!("Uploaded {} but could not reload {}: {}", path, module_id, e);
                }
                Ok(file)
            }
            Err(e) => {
                log::error!("Error uploading file {}: {}", path, e);
                Err(e.into())
            }
        }
    }

    async fn upload_and_attach(
        &self,
        identity: &Identity,
        module: &Module,
        file_name: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<FileRef, StoreError> {
        let url = self.store.upload_blob(path, bytes, content_type).await?;
        let file = FileRef {
            name: file_name.to_string(),
            url,
            path: path.to_string(),
        };

        self.store
            .add_to_set(&identity.uid, &module.id, &SetValue::File(file.clone()))
            .await?;

        // Re-uploading a name overwrites the blob; keep one reference per path.
        // The new reference is attached first so a failure never leaves none.
        for stale in module.files.iter().filter(|f| f.path == file.path && **f != file) {
            self.store
                .remove_from_set(&identity.uid, &module.id, &SetValue::File(stale.clone()))
                .await?;
        }
        Ok(file)
    }

    /// Delete the blob, then drop the exact reference from the module
    pub async fn delete_file(&mut self, module_id: &str, file: &FileRef) -> Result<()> {
        let identity = self.identity()?;
        self.require_module(module_id)?;

        match self.store.delete_blob(&file.path).await {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => {
                log::warn!("Blob {} already gone, removing the reference", file.path);
            }
            Err(e) => {
                log::error!("Error deleting file {}: {}", file.path, e);
                return Err(e.into());
            }
        }

        self.store
            .remove_from_set(&identity.uid, module_id, &SetValue::File(file.clone()))
            .await
            .map_err(|e| {
                log::error!("Error detaching file {}: {}", file.path, e);
                e
            })?;
        self.refresh_module(&identity.uid, module_id).await
    }

    /// Storage keys held for a module, including blobs no reference points at
    pub async fn list_module_blobs(&self, module_id: &str) -> Result<Vec<String>> {
        let identity = self.identity()?;
        let prefix = blob_path(&identity.uid, module_id, "");
        Ok(self.store.list_blobs(&prefix).await?)
    }

    // ==================== Links ====================

    pub async fn add_link(&mut self, module_id: &str, link: LinkRef) -> Result<()> {
        let link = LinkRef::new(link.title.trim(), link.url.trim());
        if link.url.is_empty() {
            return Err(AppError::Validation("A link needs a URL.".to_string()));
        }
        let identity = self.identity()?;
        let module = self.require_module(module_id)?;
        if module.links.iter().any(|l| l.url == link.url && *l != link) {
            return Err(AppError::Validation(format!(
                "{} already has a link to {}",
                module_id, link.url
            )));
        }

        self.store
            .add_to_set(&identity.uid, module_id, &SetValue::Link(link))
            .await
            .map_err(|e| {
                log::error!("Error adding link: {}", e);
                e
            })?;
        self.refresh_module(&identity.uid, module_id).await
    }

    pub async fn remove_link(&mut self, module_id: &str, link: &LinkRef) -> Result<()> {
        let identity = self.identity()?;
        self.require_module(module_id)?;

        self.store
            .remove_from_set(&identity.uid, module_id, &SetValue::Link(link.clone()))
            .await
            .map_err(|e| {
                log::error!("Error deleting link: {}", e);
                e
            })?;
        self.refresh_module(&identity.uid, module_id).await
    }

    // ==================== Flashcards ====================

    pub async fn list_flashcards(&self, module_id: &str) -> Result<Vec<Flashcard>> {
        let identity = self.identity()?;
        self.require_module(module_id)?;
        self.store
            .list_flashcards(&identity.uid, module_id)
            .await
            .map_err(|e| {
                log::error!("Error fetching flashcards: {}", e);
                e.into()
            })
    }

    pub async fn add_flashcard(&self, module_id: &str, card: &NewFlashcard) -> Result<Flashcard> {
        if !card.is_complete() {
            return Err(AppError::Validation(
                "Please fill in both question and answer.".to_string(),
            ));
        }
        let identity = self.identity()?;
        self.require_module(module_id)?;

        self.store
            .add_flashcard(&identity.uid, module_id, card)
            .await
            .map_err(|e| {
                log::error!("Error adding flashcard: {}", e);
                e.into()
            })
    }

    /// Fetch the cards of every module concurrently, concatenated in the
    /// order the ids are given
    pub async fn fetch_review_cards(&self, module_ids: &[String]) -> Result<Vec<Flashcard>> {
        let identity = self.identity()?;
        let uid = identity.uid.as_str();
        let store = &self.store;

        let per_module = try_join_all(
            module_ids
                .iter()
                .map(|module_id| store.list_flashcards(uid, module_id)),
        )
        .await
        .map_err(|e| {
            log::error!("Error fetching flashcards for review: {}", e);
            e
        })?;

        Ok(per_module.into_iter().flatten().collect())
    }

    /// Drive a session from `Selecting` to `Reviewing`. A failed fetch puts
    /// the session back in `Selecting`.
    pub async fn start_review(&self, session: &mut ReviewSession) -> Result<()> {
        if !self.state.is_signed_in() {
            return Err(AppError::NotSignedIn);
        }
        let Some(ticket) = session.begin_loading() else {
            return Err(AppError::Validation("No module selected.".to_string()));
        };

        let module_ids = session.selected().to_vec();
        match self.fetch_review_cards(&module_ids).await {
            Ok(cards) => {
                session.finish_loading(ticket, cards);
                Ok(())
            }
            Err(e) => {
                session.abort_loading(ticket);
                Err(e)
            }
        }
    }
}
