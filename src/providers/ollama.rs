use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures_util::StreamExt;
use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{ChunkStream, LanguageModel, ModelLoader, TextChunk};
use crate::translation::prompts::PromptText;

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from; absent when only loading the model
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    /// How long to keep the model loaded in memory
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<String>,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// One line of a streamed generate response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationChunk {
    /// Generated text fragment
    #[serde(default)]
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Error reported in-band by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: Some(prompt.into()),
            options: None,
            stream: Some(false),
            keep_alive: None,
        }
    }

    /// Create a request that only loads the model into memory
    pub fn load_only(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: None,
            options: None,
            stream: Some(false),
            keep_alive: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Limit the number of generated tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).num_predict = Some(max_tokens);
        self
    }

    /// Set the keep-alive duration
    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    /// Stream the response as newline-delimited JSON
    pub fn streaming(mut self) -> Self {
        self.stream = Some(true);
        self
    }
}

/// Splits a byte stream into newline-delimited lines.
///
/// Bytes are buffered until a full line is available, so multi-byte
/// characters split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and return every line they complete
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]).trim().to_string();
            if !text.is_empty() {
                lines.push(text);
            }
        }
        lines
    }

    /// Return the unterminated trailing line, if any
    pub fn finish(&mut self) -> Option<String> {
        let rest = String::from_utf8_lossy(&self.buffer).trim().to_string();
        self.buffer.clear();
        (!rest.is_empty()).then_some(rest)
    }
}

/// Parse one streamed line
pub fn parse_chunk_line(line: &str) -> Result<GenerationChunk, ProviderError> {
    let chunk: GenerationChunk = serde_json::from_str(line).map_err(|e| {
        error!("Failed to parse Ollama stream line: {}. Raw line (first 200 chars): {}",
              e, line.chars().take(200).collect::<String>());
        ProviderError::ParseError(e.to_string())
    })?;

    match chunk.error {
        Some(message) => Err(ProviderError::StreamInterrupted(message)),
        None => Ok(chunk),
    }
}

struct StreamState {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: NdjsonDecoder,
    pending: VecDeque<Result<TextChunk, ProviderError>>,
    finished: bool,
}

impl StreamState {
    fn queue_lines(&mut self, lines: Vec<String>) {
        for line in lines {
            if self.finished {
                break;
            }
            match parse_chunk_line(&line) {
                Ok(chunk) => {
                    if !chunk.response.is_empty() {
                        self.pending.push_back(Ok(TextChunk::new(chunk.response)));
                    }
                    if chunk.done {
                        self.finished = true;
                    }
                }
                Err(e) => {
                    self.pending.push_back(Err(e));
                    self.finished = true;
                }
            }
        }
    }
}

fn decode_stream(body: BoxStream<'static, reqwest::Result<Bytes>>) -> ChunkStream {
    let state = StreamState {
        body,
        decoder: NdjsonDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(bytes)) => {
                    let lines = state.decoder.push(&bytes);
                    state.queue_lines(lines);
                }
                Some(Err(e)) => {
                    state.pending.push_back(Err(ProviderError::StreamInterrupted(e.to_string())));
                    state.finished = true;
                }
                None => {
                    if let Some(rest) = state.decoder.finish() {
                        state.queue_lines(vec![rest]);
                    }
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}

fn map_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_connect() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

async fn api_error(response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let error_text = response.text().await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    error!("Ollama API error ({}): {}", status, error_text);
    ProviderError::ApiError {
        status_code: status.as_u16(),
        message: error_text,
    }
}

impl Ollama {
    /// Create a new Ollama client from a complete URL
    ///
    /// Only connecting is bounded by a timeout; a generation may take as
    /// long as the model needs.
    pub fn from_url(url: impl Into<String>, connect_timeout: Duration) -> Self {
        let base_url = url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::builder()
                .connect_timeout(connect_timeout)
                // Force HTTP/1.1 - Ollama uses HTTP/1.1
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self.client.get(&url)
            .send()
            .await
            .map_err(map_send_error)?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        response["version"].as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }

    /// Ask the server to load `model` into memory
    pub async fn load_model(&self, model: &str, keep_alive: &str) -> Result<(), ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerationRequest::load_only(model).keep_alive(keep_alive);

        let response = self.client.post(&url)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(ProviderError::ModelNotFound(model.to_string())),
            _ => Err(api_error(response).await),
        }
    }

    /// Start a streaming generation
    pub async fn generate_stream(&self, request: GenerationRequest) -> Result<ChunkStream, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self.client.post(&url)
            .json(&request.streaming())
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(decode_stream(response.bytes_stream().boxed()))
    }
}

/// A model served by Ollama
#[derive(Debug)]
pub struct OllamaModel {
    client: Arc<Ollama>,
    model: String,
    keep_alive: String,
    temperature: Option<f32>,
}

#[async_trait]
impl LanguageModel for OllamaModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn stream_generate(&self, prompt: &PromptText, max_tokens: u32) -> Result<ChunkStream, ProviderError> {
        let mut request = GenerationRequest::new(&self.model, prompt.render())
            .max_tokens(max_tokens)
            .keep_alive(&self.keep_alive);
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }

        debug!("Starting Ollama generation with {} ({} -> {})",
               self.model, prompt.source_code(), prompt.target_code());
        self.client.generate_stream(request).await
    }
}

/// Loads models from an Ollama server
#[derive(Debug)]
pub struct OllamaLoader {
    client: Arc<Ollama>,
    keep_alive: String,
    temperature: Option<f32>,
}

impl OllamaLoader {
    /// Create a loader for the server at `endpoint`
    pub fn new(endpoint: &str, connect_timeout: Duration, keep_alive: impl Into<String>, temperature: Option<f32>) -> Self {
        Self {
            client: Arc::new(Ollama::from_url(endpoint, connect_timeout)),
            keep_alive: keep_alive.into(),
            temperature,
        }
    }
}

#[async_trait]
impl ModelLoader for OllamaLoader {
    async fn load(&self, model_ref: &str) -> Result<Arc<dyn LanguageModel>, ProviderError> {
        let version = self.client.version().await?;
        info!("Connected to Ollama {} at {}", version, self.client.base_url());

        self.client.load_model(model_ref, &self.keep_alive).await?;
        info!("Model loaded: {}", model_ref);

        Ok(Arc::new(OllamaModel {
            client: Arc::clone(&self.client),
            model: model_ref.to_string(),
            keep_alive: self.keep_alive.clone(),
            temperature: self.temperature,
        }))
    }
}
