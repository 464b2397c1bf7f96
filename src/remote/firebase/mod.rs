//! Firebase backend over its REST APIs
//!
//! - Identity Toolkit for email/password sign-in
//! - Firestore for module and flashcard documents
//! - Cloud Storage for Firebase for uploaded files

pub mod value;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use super::{Credentials, Identity, RemoteStore, Result, SetValue, StoreError};
use crate::catalog::{Module, ModulePatch};
use crate::flashcards::{Flashcard, NewFlashcard};

const IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const STORAGE_URL: &str = "https://firebasestorage.googleapis.com/v0";

const PAGE_SIZE: &str = "300";

/// Project settings, as found in the web app's Firebase config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    pub storage_bucket: String,
}

impl FirebaseConfig {
    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("apiKey", &self.api_key),
            ("projectId", &self.project_id),
            ("storageBucket", &self.storage_bucket),
        ] {
            if value.trim().is_empty() {
                return Err(StoreError::InvalidConfig(format!("firebase {} is empty", field)));
            }
        }
        Ok(())
    }
}

struct AuthSession {
    identity: Identity,
    id_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Value>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageObject {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListObjectsResponse {
    #[serde(default)]
    items: Vec<StorageObject>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// REST client for a Firebase project
pub struct FirebaseStore {
    client: Client,
    config: FirebaseConfig,
    session: RwLock<Option<AuthSession>>,
}

impl FirebaseStore {
    pub fn new(config: FirebaseConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            session: RwLock::new(None),
        })
    }

    /// `projects/{project}/databases/(default)/documents`
    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.config.project_id)
    }

    /// Full resource name of a document, as used inside request bodies
    fn document_name(&self, path: &str) -> String {
        format!("{}/{}", self.database_path(), path)
    }

    fn document_url(&self, path: &str) -> String {
        format!("{}/{}", FIRESTORE_URL, self.document_name(path))
    }

    fn commit_url(&self) -> String {
        format!("{}/{}:commit", FIRESTORE_URL, self.database_path())
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/b/{}/o/{}",
            STORAGE_URL,
            self.config.storage_bucket,
            urlencoding::encode(path)
        )
    }

    fn objects_url(&self) -> String {
        format!("{}/b/{}/o", STORAGE_URL, self.config.storage_bucket)
    }

    fn download_url(&self, path: &str, token: &str) -> String {
        format!("{}?alt=media&token={}", self.object_url(path), token)
    }

    async fn id_token(&self) -> Result<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.id_token.clone())
            .ok_or(StoreError::NotSignedIn)
    }

    async fn firestore(&self, builder: RequestBuilder) -> Result<Response> {
        let token = self.id_token().await?;
        let response = builder.bearer_auth(token).send().await?;
        check_status(response).await
    }

    async fn storage(&self, builder: RequestBuilder) -> Result<Response> {
        let token = self.id_token().await?;
        let response = builder
            .header("Authorization", format!("Firebase {}", token))
            .send()
            .await?;
        check_status(response).await
    }

    /// Every document of a collection, following page tokens
    async fn list_documents(&self, collection: &str) -> Result<Vec<Value>> {
        let url = self.document_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = match self.firestore(self.client.get(&url).query(&query)).await {
                Ok(response) => response,
                // A collection that was never written reads as empty.
                Err(StoreError::NotFound(_)) => return Ok(documents),
                Err(e) => return Err(e),
            };
            let page: ListDocumentsResponse = response.json().await?;
            documents.extend(page.documents);

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(documents)
    }

    /// `:commit` body replacing each module document; Firestore applies the
    /// writes atomically
    fn put_modules_body(&self, uid: &str, modules: &[Module]) -> Result<Value> {
        let writes = modules
            .iter()
            .map(|module| {
                Ok(json!({
                    "update": {
                        "name": self.document_name(&module_path(uid, &module.id)),
                        "fields": to_fields(module)?,
                    }
                }))
            })
            .collect::<Result<Vec<Value>>>()?;
        Ok(json!({ "writes": writes }))
    }

    async fn commit_transform(&self, uid: &str, module_id: &str, transform: Value) -> Result<()> {
        let body = json!({
            "writes": [{
                "transform": {
                    "document": self.document_name(&module_path(uid, module_id)),
                    "fieldTransforms": [transform],
                },
                "currentDocument": { "exists": true },
            }]
        });
        self.firestore(self.client.post(self.commit_url()).json(&body))
            .await?;
        Ok(())
    }
}

fn module_path(uid: &str, module_id: &str) -> String {
    format!(
        "users/{}/modules/{}",
        urlencoding::encode(uid),
        urlencoding::encode(module_id)
    )
}

fn flashcards_path(uid: &str, module_id: &str) -> String {
    format!("{}/flashcards", module_path(uid, module_id))
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_string();
    let message = error_message(response.text().await.unwrap_or_default());
    match status {
        StatusCode::UNAUTHORIZED => Err(StoreError::AuthFailed(message)),
        StatusCode::FORBIDDEN => Err(StoreError::PermissionDenied(message)),
        StatusCode::NOT_FOUND => Err(StoreError::NotFound(url)),
        _ => Err(StoreError::Server {
            status: status.as_u16(),
            message,
        }),
    }
}

/// Google APIs wrap errors as `{"error": {"message": ..}}`
fn error_message(body: String) -> String {
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body)
}

fn to_fields<T: Serialize>(value: &T) -> Result<Value> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(value::encode_fields(&map)),
        other => Err(StoreError::Malformed(format!("expected an object, got {}", other))),
    }
}

fn from_document<T: DeserializeOwned>(document: &Value) -> Result<T> {
    let body = value::document_to_json(document).map_err(StoreError::Malformed)?;
    Ok(serde_json::from_value(body)?)
}

/// Fields written by a patch. A cleared date is named in the update mask but
/// left out of the body, which deletes it.
fn patch_fields(patch: &ModulePatch) -> Result<Map<String, Value>> {
    let mut fields = Map::new();
    if let Some(status) = patch.status {
        fields.insert("status".to_string(), serde_json::to_value(status)?);
    }
    if let Some(Some(date)) = patch.final_date {
        fields.insert("finalDate".to_string(), Value::String(date.to_string()));
    }
    if let Some(difficulty) = patch.difficulty {
        fields.insert("difficulty".to_string(), serde_json::to_value(difficulty)?);
    }
    if let Some(estimated_time) = &patch.estimated_time {
        fields.insert("estimatedTime".to_string(), Value::String(estimated_time.clone()));
    }
    Ok(fields)
}

#[async_trait]
impl RemoteStore for FirebaseStore {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity> {
        let url = format!("{}/accounts:signInWithPassword", IDENTITY_URL);
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.config.api_key)])
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        // Identity Toolkit reports bad credentials as 400 with a message code.
        let response = match check_status(response).await {
            Ok(response) => response,
            Err(StoreError::Server { status: 400, message }) => {
                return Err(StoreError::AuthFailed(message))
            }
            Err(e) => return Err(e),
        };

        let signed_in: SignInResponse = response.json().await?;
        let identity = Identity {
            uid: signed_in.local_id,
            email: signed_in.email.or_else(|| Some(credentials.email.clone())),
        };

        *self.session.write().await = Some(AuthSession {
            identity: identity.clone(),
            id_token: signed_in.id_token,
        });
        log::info!("Signed in to Firebase project {}", self.config.project_id);
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.session.write().await = None;
        Ok(())
    }

    async fn current_identity(&self) -> Option<Identity> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.identity.clone())
    }

    async fn list_modules(&self, uid: &str) -> Result<Vec<Module>> {
        let collection = format!("users/{}/modules", urlencoding::encode(uid));
        self.list_documents(&collection)
            .await?
            .iter()
            .map(from_document)
            .collect()
    }

    async fn get_module(&self, uid: &str, module_id: &str) -> Result<Option<Module>> {
        let url = self.document_url(&module_path(uid, module_id));
        match self.firestore(self.client.get(&url)).await {
            Ok(response) => {
                let document: Value = response.json().await?;
                Ok(Some(from_document(&document)?))
            }
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn put_module(&self, uid: &str, module: &Module) -> Result<()> {
        let url = self.document_url(&module_path(uid, &module.id));
        let body = json!({ "fields": to_fields(module)? });
        self.firestore(self.client.patch(&url).json(&body)).await?;
        Ok(())
    }

    async fn put_modules(&self, uid: &str, modules: &[Module]) -> Result<()> {
        if modules.is_empty() {
            return Ok(());
        }
        let body = self.put_modules_body(uid, modules)?;
        self.firestore(self.client.post(self.commit_url()).json(&body))
            .await?;
        Ok(())
    }

    async fn update_module(&self, uid: &str, module_id: &str, patch: &ModulePatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let url = self.document_url(&module_path(uid, module_id));
        let mut query: Vec<(&str, &str)> = patch
            .field_paths()
            .into_iter()
            .map(|path| ("updateMask.fieldPaths", path))
            .collect();
        query.push(("currentDocument.exists", "true"));

        let body = json!({ "fields": value::encode_fields(&patch_fields(patch)?) });
        self.firestore(self.client.patch(&url).query(&query).json(&body))
            .await?;
        Ok(())
    }

    async fn add_to_set(&self, uid: &str, module_id: &str, item: &SetValue) -> Result<()> {
        let transform = json!({
            "fieldPath": item.field(),
            "appendMissingElements": { "values": [value::encode(&item.to_json()?)] },
        });
        self.commit_transform(uid, module_id, transform).await
    }

    async fn remove_from_set(&self, uid: &str, module_id: &str, item: &SetValue) -> Result<()> {
        let transform = json!({
            "fieldPath": item.field(),
            "removeAllFromArray": { "values": [value::encode(&item.to_json()?)] },
        });
        self.commit_transform(uid, module_id, transform).await
    }

    async fn upload_blob(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let upload = self
            .client
            .post(self.objects_url())
            .query(&[("uploadType", "media"), ("name", path)])
            .header("Content-Type", content_type)
            .body(bytes);
        let uploaded: StorageObject = self.storage(upload).await?.json().await?;

        // Serve inline so browsers preview documents instead of downloading.
        let metadata = self.client.patch(self.object_url(path)).json(&json!({
            "contentDisposition": "inline",
            "contentType": content_type,
        }));
        let updated: StorageObject = self.storage(metadata).await?.json().await?;

        let token = updated
            .download_tokens
            .or(uploaded.download_tokens)
            .and_then(|tokens| tokens.split(',').next().map(str::to_string))
            .ok_or_else(|| StoreError::Malformed(format!("no download token for {}", path)))?;

        log::info!("Uploaded {}", uploaded.name);
        Ok(self.download_url(path, &token))
    }

    async fn delete_blob(&self, path: &str) -> Result<()> {
        self.storage(self.client.delete(self.object_url(path))).await?;
        Ok(())
    }

    async fn list_blobs(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("prefix", prefix.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }
            let page: ListObjectsResponse = self
                .storage(self.client.get(self.objects_url()).query(&query))
                .await?
                .json()
                .await?;
            names.extend(page.items.into_iter().map(|item| item.name));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(names)
    }

    async fn list_flashcards(&self, uid: &str, module_id: &str) -> Result<Vec<Flashcard>> {
        self.list_documents(&flashcards_path(uid, module_id))
            .await?
            .iter()
            .map(from_document)
            .collect()
    }

    async fn add_flashcard(
        &self,
        uid: &str,
        module_id: &str,
        card: &NewFlashcard,
    ) -> Result<Flashcard> {
        let url = self.document_url(&flashcards_path(uid, module_id));
        let body = json!({ "fields": to_fields(card)? });
        let document: Value = self
            .firestore(self.client.post(&url).json(&body))
            .await?
            .json()
            .await?;
        from_document(&document)
    }
}
