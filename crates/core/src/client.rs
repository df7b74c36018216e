use std::{path::Path, time::Duration};

use async_trait::async_trait;
use reqwest::{Body, Client, RequestBuilder, Response, header::CONTENT_LENGTH};
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::{
    error::{AnalyzerError, Result},
    provider::ProviderConfig,
    remote::{FileService, GenerativeModel},
    types::{ListFilesResponse, Part, RemoteFile, UploadResponse},
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const LIST_PAGE_SIZE: u32 = 100;
const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// REST client for the Gemini file and generation endpoints.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: ProviderConfig,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: &'a [Part],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GeminiClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_root(), path.trim_start_matches('/'))
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(API_KEY_HEADER, &self.config.api_key)
    }

    async fn list_page(&self, page_token: Option<&str>) -> Result<ListFilesResponse> {
        let mut query = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let response = self
            .authed(self.client.get(self.url("v1beta/files")))
            .query(&query)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    async fn start_upload(&self, len: u64, display_name: &str, mime_type: &str) -> Result<String> {
        let response = self
            .authed(self.client.post(self.url("upload/v1beta/files")))
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", len.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&serde_json::json!({ "file": { "display_name": display_name } }))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        response
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(AnalyzerError::MissingUploadUrl)
    }
}

/// Accepts `files/<id>` or a bare id.
fn file_resource(name: &str) -> String {
    if name.starts_with("files/") {
        name.to_string()
    } else {
        format!("files/{name}")
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or(body);

    Err(AnalyzerError::Api {
        status: status.as_u16(),
        message,
    })
}

fn extract_text(response: GenerateResponse) -> Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked ({r})"))
            .unwrap_or_else(|| "response had no candidates".to_string());
        return Err(AnalyzerError::EmptyResponse { reason });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate
            .finish_reason
            .map(|r| format!("finish reason {r}"))
            .unwrap_or_else(|| "candidate had no text parts".to_string());
        return Err(AnalyzerError::EmptyResponse { reason });
    }

    Ok(text)
}

#[async_trait]
impl FileService for GeminiClient {
    async fn list_files(&self) -> Result<Vec<RemoteFile>> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_page(page_token.as_deref()).await?;
            files.extend(page.files);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = files.len(), "listed remote files");
        Ok(files)
    }

    async fn get_file(&self, name: &str) -> Result<RemoteFile> {
        let url = self.url(&format!("v1beta/{}", file_resource(name)));
        let response = self.authed(self.client.get(url)).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn upload_file(&self, path: &Path, display_name: &str, mime_type: &str) -> Result<RemoteFile> {
        let file = File::open(path).await?;
        let len = file.metadata().await?.len();
        let upload_url = self.start_upload(len, display_name, mime_type).await?;
        debug!(display_name, bytes = len, "opened upload session");

        // Streamed from disk; the body is never buffered whole.
        let response = self
            .authed(self.client.post(upload_url))
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .header(CONTENT_LENGTH, len)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;

        let uploaded: UploadResponse = ensure_success(response).await?.json().await?;
        info!(file = %uploaded.file.name, state = %uploaded.file.state, "uploaded video");
        Ok(uploaded.file)
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        let url = self.url(&format!("v1beta/{}", file_resource(name)));
        let response = self.authed(self.client.delete(url)).send().await?;
        ensure_success(response).await?;
        info!(file = name, "deleted remote file");
        Ok(())
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_content(&self, parts: &[Part], timeout: Duration) -> Result<String> {
        let url = self.url(&format!(
            "v1beta/models/{}:generateContent",
            self.config.model
        ));
        let request = GenerateRequest {
            contents: [Content { role: "user", parts }],
        };

        debug!(model = %self.config.model, parts = parts.len(), "calling generateContent");
        let response = self
            .authed(self.client.post(url))
            .timeout(timeout)
            .json(&request)
            .send()
            .await?;

        let response: GenerateResponse = ensure_success(response).await?.json().await?;
        extract_text(response)
    }
}
