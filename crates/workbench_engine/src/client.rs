use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use url::Url;
use workbench_core::{
    DocumentInfo, FieldDescriptor, MutationOutcome, MutationRequest, TemplateEntry,
};

use crate::wire::{
    decode_envelope, FieldsResponse, MutationResponse, SearchResponse, TemplateResponse,
    UploadResponse,
};
use crate::{FailureKind, RequestError};

const UPLOAD_MIME: &str = "application/pdf";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    /// Transport-level connect timeout. Requests themselves are not timed out.
    pub connect_timeout: Duration,
    pub max_upload_bytes: u64,
    pub max_download_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            max_upload_bytes: 16 * 1024 * 1024,
            max_download_bytes: 64 * 1024 * 1024,
        }
    }
}

/// The document-processing backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<DocumentInfo, RequestError>;

    async fn list_fields(&self, file_id: &str) -> Result<Vec<FieldDescriptor>, RequestError>;

    async fn search(&self, file_id: &str, query: &str)
        -> Result<Vec<FieldDescriptor>, RequestError>;

    async fn template(
        &self,
        file_id: &str,
        section: Option<&str>,
    ) -> Result<Vec<TemplateEntry>, RequestError>;

    async fn mutate(
        &self,
        file_id: &str,
        request: &MutationRequest,
    ) -> Result<MutationOutcome, RequestError>;

    async fn download(&self, output_id: &str) -> Result<Vec<u8>, RequestError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, RequestError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(RequestError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    /// `{base}/api/{segments...}` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RequestError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RequestError::new(FailureKind::InvalidUrl, self.settings.base_url.clone()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RequestError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        engine_debug!("response status={} bytes={}", status, body.len());
        decode_envelope(status, &body)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<DocumentInfo, RequestError> {
        let url = self.endpoint(&["upload"])?;
        engine_info!("POST {} filename={} bytes={}", url, filename, bytes.len());
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(UPLOAD_MIME)
            .map_err(|err| RequestError::new(FailureKind::InvalidInput, err.to_string()))?;
        let form = Form::new().part("file", part);
        let response: UploadResponse = self.send(self.client.post(url).multipart(form)).await?;
        Ok(response.into())
    }

    async fn list_fields(&self, file_id: &str) -> Result<Vec<FieldDescriptor>, RequestError> {
        let url = self.endpoint(&["fields", file_id])?;
        engine_info!("GET {}", url);
        let response: FieldsResponse = self.send(self.client.get(url)).await?;
        Ok(response.fields)
    }

    async fn search(
        &self,
        file_id: &str,
        query: &str,
    ) -> Result<Vec<FieldDescriptor>, RequestError> {
        let mut url = self.endpoint(&["search", file_id])?;
        url.query_pairs_mut().append_pair("q", query);
        engine_info!("GET {}", url);
        let response: SearchResponse = self.send(self.client.get(url)).await?;
        Ok(response.results)
    }

    async fn template(
        &self,
        file_id: &str,
        section: Option<&str>,
    ) -> Result<Vec<TemplateEntry>, RequestError> {
        let mut url = self.endpoint(&["template", file_id])?;
        if let Some(section) = section {
            url.query_pairs_mut().append_pair("section", section);
        }
        engine_info!("GET {}", url);
        let response: TemplateResponse = self.send(self.client.get(url)).await?;
        Ok(response.into_entries())
    }

    async fn mutate(
        &self,
        file_id: &str,
        request: &MutationRequest,
    ) -> Result<MutationOutcome, RequestError> {
        let builder = match request {
            MutationRequest::Fill { fields } => self
                .client
                .post(self.endpoint(&["fill", file_id])?)
                .json(&json!({ "fields": fields })),
            MutationRequest::RemoveVoid => {
                self.client.post(self.endpoint(&["remove-void", file_id])?)
            }
            MutationRequest::ClearDefaults { fields } => {
                let fields = fields.clone().map(Value::Object).unwrap_or(Value::Null);
                self.client
                    .post(self.endpoint(&["remove-defaults", file_id])?)
                    .json(&json!({ "fields": fields }))
            }
        };
        engine_info!("POST {} file_id={}", request.kind(), file_id);
        let response: MutationResponse = self.send(builder).await?;
        Ok(response.into())
    }

    async fn download(&self, output_id: &str) -> Result<Vec<u8>, RequestError> {
        let url = self.endpoint(&["download", output_id])?;
        engine_info!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            return Err(decode_envelope::<Value>(status, &body)
                .err()
                .unwrap_or_else(|| {
                    RequestError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
                }));
        }

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "artifact too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "artifact too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    engine_warn!("request failed: {}", err);
    if err.is_timeout() {
        return RequestError::new(FailureKind::Timeout, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}
