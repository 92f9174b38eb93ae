//! `OpenAI` chat completions client.

use std::time::{Duration, Instant};
use std::{env, fmt};

use async_trait::async_trait;
use hyper::body::to_bytes;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Request, Uri};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::http_client::{HyperClient, build_https_client};
use crate::traits::{
    AdapterError, AdapterResult, Completion, CompletionClient, CompletionRequest, PromptMessage,
};

/// Environment variable used when loading the API key automatically.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Base URL used when neither the configuration nor the request names one.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const PLACEHOLDER_KEY_PREFIX: &str = "temp-";
const BEARER_PREFIX: &str = "Bearer ";

/// Server-wide defaults for the `OpenAI` client.
///
/// Per-request `custom_api_host` and `custom_api_key` values in the
/// [`ModelConfig`](eprompt_primitives::ModelConfig) take precedence.
#[derive(Clone)]
pub struct OpenAiConfig {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl OpenAiConfig {
    /// Creates a configuration without an API key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the API key from the `OPENAI_API_KEY` environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: env::var(OPENAI_API_KEY_ENV).ok(),
            ..Self::default()
        }
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies the server-wide API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Completion client that calls the `OpenAI` chat completions API over HTTPS.
pub struct OpenAiAdapter {
    client: HyperClient,
    config: OpenAiConfig,
}

impl fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpenAiAdapter {
    /// Constructs a new adapter with a pooled HTTPS client.
    ///
    /// The API key is checked per request, so a server can start without one.
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: build_https_client(),
            config,
        }
    }

    fn endpoint(&self, request: &CompletionRequest) -> AdapterResult<Uri> {
        let base = match request.config().custom_api_host.as_deref() {
            Some(host) if !host.trim().is_empty() => sanitize_base_url(host)?,
            _ => self.config.base_url.clone(),
        };
        format!("{base}/chat/completions")
            .parse::<Uri>()
            .map_err(|err| AdapterError::configuration(format!("invalid OpenAI endpoint: {err}")))
    }

    fn api_key<'a>(&'a self, request: &'a CompletionRequest) -> AdapterResult<&'a str> {
        request
            .config()
            .custom_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .or(self.config.api_key.as_deref())
            .filter(|key| !key.trim().is_empty() && !key.starts_with(PLACEHOLDER_KEY_PREFIX))
            .ok_or(AdapterError::MissingApiKey)
    }
}

#[async_trait]
impl CompletionClient for OpenAiAdapter {
    async fn complete(&self, request: CompletionRequest) -> AdapterResult<Completion> {
        let api_key = self.api_key(&request)?;
        let endpoint = self.endpoint(&request)?;
        let payload = build_payload(&request);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode OpenAI request: {err}"))
        })?;

        let http_request = Request::post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, authorization_value(api_key))
            .body(Body::from(body))
            .map_err(|err| {
                AdapterError::transport(format!("failed to build OpenAI request: {err}"))
            })?;

        let started = Instant::now();
        let exchange = async {
            let response = self
                .client
                .request(http_request)
                .await
                .map_err(|err| AdapterError::transport(format!("OpenAI request failed: {err}")))?;
            let status = response.status();
            let bytes = to_bytes(response.into_body()).await.map_err(|err| {
                AdapterError::transport(format!("failed to read OpenAI response: {err}"))
            })?;
            Ok::<_, AdapterError>((status, bytes))
        };
        let (status, bytes) = timeout(self.config.timeout, exchange)
            .await
            .map_err(|_| AdapterError::TimedOut {
                after: self.config.timeout,
            })??;

        if !status.is_success() {
            warn!(status = status.as_u16(), model = %payload.model, "OpenAI request rejected");
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let completion = parse_completion(&bytes, started.elapsed())?;
        debug!(
            provider = "openai",
            model = %payload.model,
            tokens = completion.tokens_used,
            elapsed = ?completion.elapsed,
            "completion finished"
        );
        Ok(completion)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: Option<u32>,
}

fn build_payload(request: &CompletionRequest) -> ChatCompletionRequest {
    let config = request.config();
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: request.messages().iter().map(map_prompt_message).collect(),
        temperature: config.temperature(),
        max_tokens: config.max_tokens(),
        top_p: config.top_p(),
        frequency_penalty: config.frequency_penalty(),
        presence_penalty: config.presence_penalty(),
        stream: false,
    }
}

fn map_prompt_message(message: &PromptMessage) -> OpenAiMessage {
    OpenAiMessage {
        role: message.role().to_string(),
        content: message.content().to_owned(),
    }
}

fn parse_completion(bytes: &[u8], elapsed: Duration) -> AdapterResult<Completion> {
    let response: ChatCompletionResponse = serde_json::from_slice(bytes)
        .map_err(|err| AdapterError::response(format!("failed to decode OpenAI response: {err}")))?;

    let first = response
        .choices
        .into_iter()
        .next()
        .ok_or(AdapterError::EmptyResponse)?;

    Ok(Completion {
        content: first
            .message
            .and_then(|message| message.content)
            .unwrap_or_default(),
        tokens_used: response
            .usage
            .and_then(|usage| usage.total_tokens)
            .unwrap_or_default(),
        elapsed,
    })
}

fn authorization_value(key: &str) -> String {
    if key.starts_with(BEARER_PREFIX) {
        key.to_owned()
    } else {
        format!("{BEARER_PREFIX}{key}")
    }
}

fn sanitize_base_url(input: &str) -> AdapterResult<String> {
    let base = input.trim().trim_end_matches('/');
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(AdapterError::configuration(
            "OpenAI base URL must start with http:// or https://",
        ));
    }
    base.parse::<Uri>()
        .map_err(|err| AdapterError::configuration(format!("invalid OpenAI base URL: {err}")))?;
    Ok(base.to_owned())
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use eprompt_primitives::{ModelConfig, Provider};
    use hyper::body::Bytes;
    use hyper::service::{make_service_fn, service_fn};
    use hyper::{Response, Server, StatusCode};
    use serde_json::Value;

    use super::*;

    #[derive(Debug, Default)]
    struct Captured {
        path: String,
        authorization: Option<String>,
        body: Value,
    }

    fn spawn_stub(status: StatusCode, body: &'static str) -> (String, Arc<Mutex<Captured>>) {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let sink = Arc::clone(&captured);

        let make = make_service_fn(move |_conn| {
            let sink = Arc::clone(&sink);
            async move {
                Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                    let sink = Arc::clone(&sink);
                    async move {
                        let path = req.uri().path().to_owned();
                        let authorization = req
                            .headers()
                            .get(AUTHORIZATION)
                            .and_then(|value| value.to_str().ok())
                            .map(str::to_owned);
                        let bytes = to_bytes(req.into_body()).await?;
                        *sink.lock().expect("lock") = Captured {
                            path,
                            authorization,
                            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
                        };
                        Ok::<_, hyper::Error>(
                            Response::builder()
                                .status(status)
                                .header(CONTENT_TYPE, "application/json")
                                .body(Body::from(body))
                                .expect("response"),
                        )
                    }
                }))
            }
        });

        let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make);
        let addr = server.local_addr();
        tokio::spawn(server);
        (format!("http://{addr}/v1"), captured)
    }

    /// Sends headers and a partial body, then holds the connection open.
    fn spawn_stalled_stub() -> String {
        let make = make_service_fn(|_conn| async {
            Ok::<_, Infallible>(service_fn(|_req: Request<Body>| async {
                let (mut sender, body) = Body::channel();
                tokio::spawn(async move {
                    let _ = sender.send_data(Bytes::from_static(b"{\"choices\":")).await;
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    drop(sender);
                });
                Ok::<_, Infallible>(Response::new(body))
            }))
        });

        let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make);
        let addr = server.local_addr();
        tokio::spawn(server);
        format!("http://{addr}/v1")
    }

    fn request(config: ModelConfig) -> CompletionRequest {
        CompletionRequest::new("Write a haiku", "Poet", "Poetry", config)
    }

    #[test]
    fn base_url_requires_scheme() {
        let err = OpenAiConfig::new()
            .with_base_url("api.openai.com")
            .expect_err("missing scheme should error");

        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn sanitize_strips_trailing_slash() {
        let cfg = OpenAiConfig::new()
            .with_base_url("https://example.com/openai/v1/")
            .expect("valid URL");
        assert_eq!(cfg.base_url(), "https://example.com/openai/v1");
    }

    #[test]
    fn authorization_keeps_existing_bearer_prefix() {
        assert_eq!(authorization_value("sk-abc"), "Bearer sk-abc");
        assert_eq!(authorization_value("Bearer sk-abc"), "Bearer sk-abc");
    }

    #[test]
    fn payload_carries_sampling_parameters() {
        let config = ModelConfig::new(Provider::OpenAi, "gpt-4o-mini")
            .with_temperature(0.3)
            .with_max_tokens(512);
        let payload = build_payload(&request(config));

        assert_eq!(payload.model, "gpt-4o-mini");
        assert_eq!(payload.messages.len(), 2);
        assert_eq!(payload.messages[0].role, "system");
        assert_eq!(payload.messages[1].content, "Write a haiku");
        assert!((payload.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(payload.max_tokens, 512);
        assert!(!payload.stream);
    }

    #[test]
    fn parses_content_and_usage() {
        let json = br#"{
            "choices": [{ "message": { "content": "hi" } }],
            "usage": { "total_tokens": 42 }
        }"#;

        let completion = parse_completion(json, Duration::ZERO).expect("completion");
        assert_eq!(completion.content, "hi");
        assert_eq!(completion.tokens_used, 42);
    }

    #[test]
    fn missing_usage_counts_zero_tokens() {
        let completion = parse_completion(br#"{"choices": [{"message": {"content": "x"}}]}"#, Duration::ZERO)
            .expect("completion");
        assert_eq!(completion.tokens_used, 0);
    }

    #[test]
    fn empty_choices_are_an_error() {
        let err = parse_completion(br#"{"choices": []}"#, Duration::ZERO).expect_err("no choices");
        assert!(matches!(err, AdapterError::EmptyResponse));

        let err = parse_completion(b"not json", Duration::ZERO).expect_err("bad body");
        assert!(matches!(err, AdapterError::Response { .. }));
    }

    #[tokio::test]
    async fn missing_or_placeholder_key_is_rejected() {
        let adapter = OpenAiAdapter::new(OpenAiConfig::new());
        let config = ModelConfig::new(Provider::OpenAi, "gpt-4o-mini");
        let err = adapter.complete(request(config.clone())).await.expect_err("no key");
        assert!(matches!(err, AdapterError::MissingApiKey));

        let adapter = OpenAiAdapter::new(OpenAiConfig::new().with_api_key("temp-key"));
        let err = adapter.complete(request(config)).await.expect_err("placeholder key");
        assert!(matches!(err, AdapterError::MissingApiKey));
    }

    #[tokio::test]
    async fn posts_chat_completion_to_custom_host() {
        let (base, captured) = spawn_stub(
            StatusCode::OK,
            r#"{"choices":[{"message":{"content":"Done"}}],"usage":{"total_tokens":7}}"#,
        );
        let adapter = OpenAiAdapter::new(OpenAiConfig::new().with_api_key("server-key"));
        let config = ModelConfig::new(Provider::OpenAi, "gpt-4o-mini")
            .with_api_host(base)
            .with_api_key("request-key");

        let completion = adapter.complete(request(config)).await.expect("completion");

        assert_eq!(completion.content, "Done");
        assert_eq!(completion.tokens_used, 7);
        let captured = captured.lock().expect("lock");
        assert_eq!(captured.path, "/v1/chat/completions");
        assert_eq!(captured.authorization.as_deref(), Some("Bearer request-key"));
        assert_eq!(captured.body["model"], "gpt-4o-mini");
        assert_eq!(captured.body["stream"], false);
        assert_eq!(captured.body["messages"][0]["role"], "system");
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let (base, _) = spawn_stub(StatusCode::UNAUTHORIZED, r#"{"error":"bad key"}"#);
        let adapter = OpenAiAdapter::new(
            OpenAiConfig::new()
                .with_api_key("sk-test")
                .with_base_url(base)
                .expect("base url"),
        );

        let err = adapter
            .complete(request(ModelConfig::new(Provider::OpenAi, "gpt-4o")))
            .await
            .expect_err("status error");

        match err {
            AdapterError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("bad key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stalled_body_times_out() {
        let adapter = OpenAiAdapter::new(
            OpenAiConfig::new()
                .with_api_key("sk-test")
                .with_base_url(spawn_stalled_stub())
                .expect("base url")
                .with_timeout(Duration::from_millis(200)),
        );

        let err = tokio::time::timeout(
            Duration::from_secs(5),
            adapter.complete(request(ModelConfig::new(Provider::OpenAi, "gpt-4o"))),
        )
        .await
        .expect("adapter gives up on its own")
        .expect_err("stalled body");

        assert!(matches!(err, AdapterError::TimedOut { after } if after == Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let adapter = OpenAiAdapter::new(
            OpenAiConfig::new()
                .with_api_key("sk-test")
                .with_base_url(format!("http://{addr}/v1"))
                .expect("base url")
                .with_timeout(Duration::from_secs(5)),
        );

        let err = adapter
            .complete(request(ModelConfig::new(Provider::OpenAi, "gpt-4o")))
            .await
            .expect_err("nothing listening");

        assert!(matches!(err, AdapterError::Transport { .. }));
    }
}
