//! HTTP client for the assistant backend

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{
    document::FileUpload,
    error::{Error, Result},
    types::{AgentInfo, AgentList, ChatRequest, ChatResponse, QuickAction, QuickActionList},
};

/// Default API root of a locally running backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001/api";

/// Connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8001/api`
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Client for the chat, upload and catalog endpoints
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    /// Create a client, validating the base URL
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// The normalized API root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send a chat message
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint("chat");
        tracing::debug!(%url, conversation_id = %request.conversation_id, "POST chat");

        let response = self.client.post(&url).json(request).send().await?;
        decode(response).await
    }

    /// Upload a document for analysis
    pub async fn upload(&self, file: &FileUpload, conversation_id: &str) -> Result<ChatResponse> {
        let url = self.endpoint("upload");
        tracing::debug!(
            %url,
            filename = file.name(),
            bytes = file.len(),
            "POST upload"
        );

        let form = reqwest::multipart::Form::new()
            .part("file", file.to_part()?)
            .text("conversation_id", conversation_id.to_string());

        let response = self.client.post(&url).multipart(form).send().await?;
        decode(response).await
    }

    /// List the agents the backend can route to
    pub async fn agents(&self) -> Result<Vec<AgentInfo>> {
        let response = self.client.get(self.endpoint("agents")).send().await?;
        let list: AgentList = decode(response).await?;
        Ok(list.agents)
    }

    /// Fetch the sidebar quick actions
    pub async fn quick_actions(&self) -> Result<Vec<QuickAction>> {
        let response = self
            .client
            .get(self.endpoint("quick-actions"))
            .send()
            .await?;
        let list: QuickActionList = decode(response).await?;
        Ok(list.actions)
    }
}

/// Check the status, then parse the body.
///
/// The body is read as text first so a schema mismatch surfaces as
/// [`Error::Json`] rather than a transport error.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::status(status.as_u16(), body));
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidConfig("base URL is empty".into()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidConfig(format!(
            "base URL must start with http:// or https://, got {}",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8001/api/").unwrap(),
            "http://localhost:8001/api"
        );
        assert_eq!(
            normalize_base_url("  https://assist.example.com/api  ").unwrap(),
            "https://assist.example.com/api"
        );
    }

    #[test]
    fn test_normalize_base_url_rejects_bad_input() {
        assert!(matches!(normalize_base_url(""), Err(Error::InvalidConfig(_))));
        assert!(matches!(
            normalize_base_url("localhost:8001/api"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_endpoints() {
        let client = ChatClient::new(ClientConfig {
            base_url: "http://localhost:8001/api/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.endpoint("chat"), "http://localhost:8001/api/chat");
        assert_eq!(
            client.endpoint("quick-actions"),
            "http://localhost:8001/api/quick-actions"
        );
    }

    /// Serve exactly one canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // Read headers, then as much body as Content-Length announces
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/api", addr)
    }

    fn client_for(base_url: String) -> ChatClient {
        ChatClient::new(ClientConfig {
            base_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn request() -> ChatRequest {
        ChatRequest {
            message: "help".into(),
            conversation_id: String::new(),
        }
    }

    #[tokio::test]
    async fn test_chat_success() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"message":"Hi","agent":"hr","conversation_id":"abc","sources":[],"suggested_actions":[],"metadata":{}}"#,
        )
        .await;
        let response = client_for(base).chat(&request()).await.unwrap();
        assert_eq!(response.message, "Hi");
        assert_eq!(response.agent, crate::Agent::Hr);
        assert_eq!(response.conversation_id, "abc");
    }

    #[tokio::test]
    async fn test_chat_server_error() {
        let base = serve_once(
            "HTTP/1.1 500 Internal Server Error",
            r#"{"detail":"Chat processing error"}"#,
        )
        .await;
        let err = client_for(base).chat(&request()).await.unwrap_err();
        assert!(err.is_server_error(), "got: {}", err);
    }

    #[tokio::test]
    async fn test_chat_malformed_body() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"unexpected":true}"#).await;
        let err = client_for(base).chat(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)), "got: {}", err);
    }

    #[tokio::test]
    async fn test_chat_loose_metadata_still_decodes() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"message":"Ticket created","agent":"it","conversation_id":"c1","sources":[],"suggested_actions":[],"metadata":{"error":"none","ticket_id":12345}}"#,
        )
        .await;
        let response = client_for(base).chat(&request()).await.unwrap();
        assert_eq!(response.message, "Ticket created");
        assert_eq!(response.metadata.extra.len(), 2);
    }

    #[tokio::test]
    async fn test_quick_actions() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"actions":[{"label":"🎫 IT Tickets","action":"quick_message","message":"I'm having a technical issue","description":"Get IT support and create tickets"}]}"#,
        )
        .await;
        let actions = client_for(base).quick_actions().await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].message.as_deref(),
            Some("I'm having a technical issue")
        );
    }
}
