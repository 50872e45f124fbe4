//! Cloud Firestore REST backend.
//!
//! Documents live in one collection with string fields `userId`, `title`,
//! `content`, `createdAt`, `updatedAt`. Requests carry the signed-in user's
//! ID token; the project's security rules scope them to that user.

use std::collections::HashMap;
use std::time::Duration;

use nk_auth::FirebaseAuth;
use nk_config::FirebaseConfig;
use nk_core::{Note, NoteFields};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::StoreError;
use crate::helpers::{format_timestamp, now, parse_optional_datetime};
use crate::record::NoteRecord;
use crate::store::NoteStore;

/// A Firestore typed value. Only the variants notes use are read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldValue {
    string_value: Option<String>,
    timestamp_value: Option<String>,
}

impl FieldValue {
    fn text(&self) -> Option<&str> {
        self.string_value
            .as_deref()
            .or(self.timestamp_value.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
}

/// One element of a `runQuery` response stream. Elements without a
/// document only report progress.
#[derive(Debug, Deserialize)]
struct QueryItem {
    document: Option<Document>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

fn decode_document(doc: Document) -> Result<NoteRecord, StoreError> {
    let id = doc
        .name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| StoreError::Parse(format!("document name '{}' has no id", doc.name)))?
        .to_string();
    let field = |key: &str| doc.fields.get(key).and_then(FieldValue::text);

    Ok(NoteRecord {
        user_id: field("userId").map(String::from),
        title: field("title").map(String::from),
        content: field("content").map(String::from),
        created_at: parse_optional_datetime(field("createdAt"))?,
        updated_at: parse_optional_datetime(field("updatedAt"))?,
        id,
    })
}

/// Decode query results, skipping documents that cannot be read so one
/// bad record does not hide the rest.
fn decode_query(items: Vec<QueryItem>) -> Vec<Note> {
    items
        .into_iter()
        .filter_map(|item| item.document)
        .filter_map(|doc| {
            let name = doc.name.clone();
            decode_document(doc)
                .and_then(Note::try_from)
                .inspect_err(|error| {
                    tracing::warn!(%error, document = %name, "skipping unreadable note");
                })
                .ok()
        })
        .collect()
}

/// Turn a non-success response into [`StoreError::Api`].
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Notes stored in Cloud Firestore.
#[derive(Clone)]
pub struct FirestoreStore {
    http: reqwest::Client,
    auth: FirebaseAuth,
    /// `{firestore_url}/projects/{project}/databases/(default)/documents`
    documents_url: String,
    collection: String,
}

impl FirestoreStore {
    /// # Errors
    ///
    /// Returns `StoreError::Http` if the HTTP client cannot be built.
    pub fn new(config: &FirebaseConfig, auth: FirebaseAuth) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            auth,
            documents_url: format!("{}/{}", config.firestore_url, config.documents_path()),
            collection: config.collection.clone(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.documents_url, self.collection)
    }

    fn document_url(&self, note_id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(),
            urlencoding::encode(note_id)
        )
    }

    fn update_url(&self, note_id: &str) -> String {
        format!(
            "{}?updateMask.fieldPaths=title&updateMask.fieldPaths=content\
             &updateMask.fieldPaths=updatedAt&currentDocument.exists=true",
            self.document_url(note_id)
        )
    }

    fn query_body(&self, owner_id: &str) -> Value {
        json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "userId" },
                        "op": "EQUAL",
                        "value": string_value(owner_id),
                    }
                },
                "orderBy": [{
                    "field": { "fieldPath": "createdAt" },
                    "direction": "DESCENDING",
                }],
            }
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let token = self.auth.id_token().await?;
        let resp = request.bearer_auth(token).send().await?;
        check_response(resp).await
    }
}

impl NoteStore for FirestoreStore {
    async fn insert(&self, owner_id: &str, fields: &NoteFields) -> Result<Note, StoreError> {
        let created_at = now();
        let body = json!({
            "fields": {
                "userId": string_value(owner_id),
                "title": string_value(&fields.title),
                "content": string_value(&fields.content),
                "createdAt": string_value(&format_timestamp(&created_at)),
            }
        });
        let resp = self
            .send(self.http.post(self.collection_url()).json(&body))
            .await?;
        let doc: Document = resp.json().await?;
        Note::try_from(decode_document(doc)?)
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Note>, StoreError> {
        let url = format!("{}:runQuery", self.documents_url);
        let resp = self
            .send(self.http.post(url).json(&self.query_body(owner_id)))
            .await?;
        let items: Vec<QueryItem> = resp.json().await?;
        Ok(decode_query(items))
    }

    async fn update(&self, note_id: &str, fields: &NoteFields) -> Result<(), StoreError> {
        let body = json!({
            "fields": {
                "title": string_value(&fields.title),
                "content": string_value(&fields.content),
                "updatedAt": string_value(&format_timestamp(&now())),
            }
        });
        match self
            .send(self.http.patch(self.update_url(note_id)).json(&body))
            .await
        {
            Ok(_) => Ok(()),
            Err(StoreError::Api { status: 404, .. }) => Err(StoreError::NotFound {
                id: note_id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, note_id: &str) -> Result<(), StoreError> {
        self.send(self.http.delete(self.document_url(note_id)))
            .await?;
        Ok(())
    }
}
