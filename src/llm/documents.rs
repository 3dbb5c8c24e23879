use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Media types the document service accepts.
pub const SUPPORTED_DOCUMENT_TYPES: [&str; 2] = ["application/pdf", "text/plain"];

/// A PDF or plain-text document ready to be sent to the document service.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(
        file_name: impl Into<String>,
        media_type: Option<&str>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.map(str::to_string),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self::new(file_name, None, bytes))
    }

    /// Declared media type without parameters, else the type guessed from the
    /// file name.
    pub fn resolved_media_type(&self) -> Option<String> {
        self.media_type
            .as_deref()
            .and_then(|m| m.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .or_else(|| {
                mime_guess::from_path(&self.file_name)
                    .first()
                    .map(|mime| mime.essence_str().to_string())
            })
    }

    pub fn is_supported(&self) -> bool {
        self.resolved_media_type()
            .is_some_and(|m| SUPPORTED_DOCUMENT_TYPES.contains(&m.as_str()))
    }
}

/// A document the service has stored for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UploadReply {
    #[serde(default)]
    success: bool,
    #[serde(default, deserialize_with = "optional_id_text")]
    document_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<StoredDocument>,
}

#[derive(Debug, Deserialize)]
struct ChunkList {
    #[serde(default)]
    chunks: Vec<String>,
}

/// Identifiers arrive as strings or bare numbers depending on the backend.
fn id_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

fn optional_id_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

/// Client for the document service: upload, per-user listing and chunk
/// inspection. Every failure is a [`AssistantError::DocumentFailure`].
#[derive(Clone)]
pub struct DocumentClient {
    client: Client,
    base_url: String,
}

impl DocumentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        Ok(Self::new(config.require_document_api_url()?))
    }

    /// Uploads `document` for `user_id` and returns the id the service assigned.
    pub async fn upload(
        &self,
        document: &DocumentUpload,
        user_id: &str,
        email: Option<&str>,
    ) -> Result<String> {
        if user_id.trim().is_empty() {
            return Err(AssistantError::DocumentFailure(
                "Please select a valid file and ensure you are logged in.".to_string(),
            ));
        }
        let media_type = match document.resolved_media_type() {
            Some(m) if document.is_supported() => m,
            _ => {
                return Err(AssistantError::DocumentFailure(
                    "Only PDF and TXT files are allowed.".to_string(),
                ))
            }
        };

        let document_id = self
            .send_upload(document, &media_type, user_id, email)
            .await
            .map_err(|e| document_failure("Upload", e))?;

        info!(
            "Uploaded '{}' ({} bytes) as document {}",
            document.file_name,
            document.bytes.len(),
            document_id
        );
        Ok(document_id)
    }

    pub async fn list_documents(&self, user_id: &str) -> Result<Vec<StoredDocument>> {
        let documents = async {
            let url = self.endpoint(&["users", user_id, "documents"])?;
            let res = self.client.get(url).send().await?;
            if !res.status().is_success() {
                return Err(AssistantError::DocumentFailure(
                    "Failed to load documents".to_string(),
                ));
            }
            let list: DocumentList = res.json().await?;
            Ok::<_, AssistantError>(list.documents)
        }
        .await
        .map_err(|e| document_failure("Document listing", e))?;

        debug!("User {} has {} documents", user_id, documents.len());
        Ok(documents)
    }

    pub async fn document_chunks(&self, document_id: &str) -> Result<Vec<String>> {
        async {
            let url = self.endpoint(&["documents", document_id, "chunks"])?;
            let res = self.client.get(url).send().await?;
            if !res.status().is_success() {
                return Err(AssistantError::DocumentFailure(
                    "Failed to load chunks.".to_string(),
                ));
            }
            let list: ChunkList = res.json().await?;
            Ok::<_, AssistantError>(list.chunks)
        }
        .await
        .map_err(|e| document_failure("Chunk lookup", e))
    }

    async fn send_upload(
        &self,
        document: &DocumentUpload,
        media_type: &str,
        user_id: &str,
        email: Option<&str>,
    ) -> Result<String> {
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str(media_type)?;
        let mut form = Form::new()
            .part("file", part)
            .text("user_id", user_id.to_string());
        if let Some(email) = email {
            form = form.text("email", email.to_string());
        }

        let res = self
            .client
            .post(self.endpoint(&["upload"])?)
            .multipart(form)
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        let reply: UploadReply = serde_json::from_str(&body).unwrap_or_default();

        match reply.document_id {
            Some(id) if status.is_success() && reply.success => Ok(id),
            _ => Err(AssistantError::DocumentFailure(
                reply
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "Upload failed".to_string()),
            )),
        }
    }

    /// Joins `segments` onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid = || {
            AssistantError::DocumentFailure(format!(
                "Invalid document API URL: {}",
                self.base_url
            ))
        };

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn document_failure(task: &str, err: AssistantError) -> AssistantError {
    warn!("{} failed: {}", task, err);
    match err {
        AssistantError::DocumentFailure(_) => err,
        other => AssistantError::DocumentFailure(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFLINE: &str = "http://127.0.0.1:9/api";

    #[test]
    fn test_from_config_requires_url() {
        let result = DocumentClient::from_config(&AssistantConfig::default());
        assert!(matches!(result, Err(AssistantError::MissingConfig(_))));

        let config = AssistantConfig::default().with_document_api_url("http://localhost:8000/");
        assert!(DocumentClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = DocumentClient::new("http://localhost:8000/api/");
        assert_eq!(
            client.endpoint(&["users", "a/b c", "documents"]).unwrap().as_str(),
            "http://localhost:8000/api/users/a%2Fb%20c/documents"
        );
        assert_eq!(
            client.endpoint(&["upload"]).unwrap().as_str(),
            "http://localhost:8000/api/upload"
        );

        let broken = DocumentClient::new("not a url");
        assert!(matches!(
            broken.endpoint(&["upload"]),
            Err(AssistantError::DocumentFailure(_))
        ));
    }

    #[test]
    fn test_supported_types() {
        assert!(DocumentUpload::new("report.pdf", None, b"%PDF".to_vec()).is_supported());
        assert!(DocumentUpload::new("NOTES.TXT", None, "hello").is_supported());
        let declared = DocumentUpload::new("blob", Some("text/plain; charset=utf-8"), "hi");
        assert!(declared.is_supported());
        assert!(!DocumentUpload::new("sheet.xlsx", None, "x").is_supported());
        assert!(!DocumentUpload::new("report.pdf", Some("image/png"), "x").is_supported());
    }

    #[tokio::test]
    async fn test_unsupported_type_refused_before_network() {
        let client = DocumentClient::new(OFFLINE);
        let err = client
            .upload(&DocumentUpload::new("sheet.xlsx", None, "x"), "u1", None)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Document request failed: Only PDF and TXT files are allowed."
        );

        let anonymous = client
            .upload(&DocumentUpload::new("notes.txt", None, "x"), " ", None)
            .await;
        assert!(matches!(anonymous, Err(AssistantError::DocumentFailure(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_document_failure() {
        let client = DocumentClient::new(OFFLINE);
        let upload = DocumentUpload::new("notes.txt", None, "EBITDA rose");

        let uploaded = client.upload(&upload, "u1", Some("owner@example.com")).await;
        assert!(matches!(uploaded, Err(AssistantError::DocumentFailure(_))));

        let listed = client.list_documents("u1").await;
        assert!(matches!(listed, Err(AssistantError::DocumentFailure(_))));

        let chunks = client.document_chunks("42").await;
        assert!(matches!(chunks, Err(AssistantError::DocumentFailure(_))));
    }

    #[tokio::test]
    async fn test_from_path_reads_name_and_bytes() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("sme-docs-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("notes.txt");
        std::fs::write(&path, "Working capital is tight")?;

        let upload = DocumentUpload::from_path(&path).await?;
        assert_eq!(upload.file_name, "notes.txt");
        assert_eq!(upload.bytes, b"Working capital is tight");
        assert_eq!(upload.resolved_media_type().as_deref(), Some("text/plain"));

        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_replies_accept_string_or_numeric_ids() {
        let list: DocumentList = serde_json::from_str(
            r#"{"documents":[
                {"id":"d1","file_name":"a.pdf","uploaded_at":"2024-05-01T10:00:00Z"},
                {"id":7,"file_name":"b.txt"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(list.documents[0].id, "d1");
        assert_eq!(list.documents[1].id, "7");
        assert_eq!(list.documents[1].uploaded_at, None);

        let empty: DocumentList = serde_json::from_str("{}").unwrap();
        assert!(empty.documents.is_empty());

        let reply: UploadReply =
            serde_json::from_str(r#"{"success":true,"document_id":12}"#).unwrap();
        assert!(reply.success);
        assert_eq!(reply.document_id.as_deref(), Some("12"));

        let chunks: ChunkList = serde_json::from_str(r#"{"chunks":["one","two"]}"#).unwrap();
        assert_eq!(chunks.chunks, vec!["one", "two"]);
    }
}
