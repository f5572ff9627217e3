use std::{fmt, sync::Arc, time::Duration};

use bytes::Bytes;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    RequestBuilder, Response, Url,
};
use serde::Serialize;
use serde_json::Value;
use zeroize::Zeroizing;

use crate::{
    certificate::Certificate,
    config::{ClientConfig, Environment, ProxyConfig},
    envelope::RawPayload,
    error::{ApiError, Error, Result},
    multipart::PostFields,
    rate::{RateState, RateTracker},
    request::Requests,
    support::Support,
};

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: Zeroizing<String>,
    rate: RateTracker,
}

impl fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientInner")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("rate", &self.rate.get())
            .finish_non_exhaustive()
    }
}

/// Authenticated entry point for all calls against the API.
///
/// Cloning is cheap: clones share credentials, target and the [`RateState`]. Calls may run
/// concurrently from several tasks.
///
/// ```no_run
/// # async fn run() -> xolphin::Result<()> {
/// let client = xolphin::Client::new("user", "password", true)?;
///
/// let product = client.support().product(90).await?;
/// println!("{} {}", product.brand, product.name);
/// println!("{} calls left", client.requests_remaining());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
    timeout: Duration,
}

impl Client {
    /// Create a client against the production API, or the test API if `test` is true.
    pub fn new(username: &str, password: &str, test: bool) -> Result<Client> {
        Client::with_config(ClientConfig::new(username, password).test(test))
    }

    pub fn with_config(config: ClientConfig) -> Result<Client> {
        let base_url = parse_base_url(&config.environment)?;

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent);

        if let Some(proxy) = &config.proxy {
            builder = with_proxy(builder, proxy)?;
        }

        let http = builder
            .build()
            .map_err(|err| Error::Config(format!("could not build HTTP client: {err}")))?;

        log::debug!("API base URL: {base_url}");

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                username: config.username,
                password: config.password,
                rate: RateTracker::default(),
            }),
            timeout: config.timeout,
        })
    }

    /// A handle to the same client that applies `timeout` to its calls.
    pub fn with_timeout(&self, timeout: Duration) -> Client {
        Client {
            inner: Arc::clone(&self.inner),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Rate limit counters as reported by the last successful call.
    pub fn rate_state(&self) -> RateState {
        self.inner.rate.get()
    }

    pub fn limit(&self) -> u32 {
        self.rate_state().limit
    }

    pub fn requests_remaining(&self) -> u32 {
        self.rate_state().remaining
    }

    /// Product and domain support lookups.
    pub fn support(&self) -> Support<'_> {
        Support::new(self)
    }

    /// Calls on issued certificates.
    pub fn certificate(&self) -> Certificate<'_> {
        Certificate::new(self)
    }

    /// Calls on pending certificate requests.
    pub fn request(&self) -> Requests<'_> {
        Requests::new(self)
    }

    /// GET a resource, passing `query` as query string, and decode the body as JSON.
    ///
    /// Use `&()` for no query parameters.
    pub async fn get<Q>(&self, path: &str, query: &Q) -> Result<RawPayload>
    where
        Q: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let req = self.inner.http.get(url.clone()).query(query);
        let res = self.execute(req, &url).await?;
        self.read_json(res).await
    }

    /// POST `fields` as a `multipart/form-data` body and decode the response as JSON.
    pub async fn post(&self, path: &str, fields: PostFields) -> Result<RawPayload> {
        let url = self.url(path)?;
        log::trace!("Fields: {:?}", fields.names().collect::<Vec<_>>());

        let req = self.inner.http.post(url.clone()).multipart(fields.into_form());
        let res = self.execute(req, &url).await?;
        self.read_json(res).await
    }

    /// GET a resource and hand back its body unparsed, e.g. for certificate files.
    pub async fn download<Q>(&self, path: &str, query: &Q) -> Result<Download>
    where
        Q: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let req = self.inner.http.get(url.clone()).query(query);
        let response = self.execute(req, &url).await?;
        self.inner.rate.update(response.headers());
        Ok(Download { response })
    }

    /// Resolves a resource path against the base URL.
    ///
    /// Paths that would leave the API origin are rejected so credentials never go elsewhere.
    fn url(&self, path: &str) -> Result<Url> {
        let base_url = &self.inner.base_url;

        let url = base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| Error::Config(format!("invalid resource path {path:?}: {err}")))?;

        if url.origin() != base_url.origin() {
            return Err(Error::Config(format!(
                "resource path {path:?} points outside {base_url}"
            )));
        }

        Ok(url)
    }

    /// Sends the request and turns non-2xx responses into errors.
    async fn execute(&self, req: RequestBuilder, url: &Url) -> Result<Response> {
        log::debug!("Call endpoint: {url}");

        let res = req
            .basic_auth(&self.inner.username, Some(self.inner.password.as_str()))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();

        if status.is_success() {
            return Ok(res);
        }

        // the body may be cut short, we still want the status
        let body = res.bytes().await.unwrap_or_default();
        let err = ApiError::from_response(status, &body);
        log::debug!("Call failed with {status}: {err}");

        Err(Error::HttpStatus(err))
    }

    async fn read_json(&self, res: Response) -> Result<RawPayload> {
        let headers = res.headers().clone();
        let body = res.bytes().await?;

        // only a fully received response counts
        self.inner.rate.update(&headers);

        log::trace!("{}", String::from_utf8_lossy(&body));
        decode_json(&body)
    }
}

fn parse_base_url(environment: &Environment) -> Result<Url> {
    let mut base_url = environment.base_url();

    if !base_url.ends_with('/') {
        base_url.push('/');
    }

    Url::parse(&base_url)
        .map_err(|err| Error::Config(format!("invalid base URL {base_url:?}: {err}")))
}

fn with_proxy(
    builder: reqwest::ClientBuilder,
    proxy: &ProxyConfig,
) -> Result<reqwest::ClientBuilder> {
    let url = Url::parse(&proxy.url)
        .map_err(|err| Error::Config(format!("invalid proxy URL {:?}: {err}", proxy.url)))?;

    let proxy = reqwest::Proxy::all(url.clone())
        .map_err(|err| Error::Config(format!("invalid proxy URL {url}: {err}")))?;

    log::warn!("Sending API calls through proxy {url} without TLS certificate verification");

    Ok(disable_tls_verification(builder.proxy(proxy)))
}

#[cfg(feature = "rustls-tls")]
fn disable_tls_verification(builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
    builder.danger_accept_invalid_certs(true)
}

#[cfg(not(feature = "rustls-tls"))]
fn disable_tls_verification(builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
    builder
}

fn decode_json(body: &[u8]) -> Result<RawPayload> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_slice(body)?)
}

/// Raw body of a download call.
///
/// Read it incrementally with [`chunk()`](Download::chunk) or all at once with
/// [`bytes()`](Download::bytes).
#[derive(Debug)]
pub struct Download {
    response: Response,
}

impl Download {
    pub fn content_type(&self) -> Option<&str> {
        self.response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Next chunk of the body, or `None` when the body is done.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.response.chunk().await?)
    }

    /// The rest of the body.
    pub async fn bytes(self) -> Result<Bytes> {
        Ok(self.response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test::{with_api_server, TestServer};

    #[test]
    fn test_client_targets() {
        let client = Client::new("user", "secret", false).unwrap();
        assert_eq!(client.base_url(), "https://api.xolphin.com/v1/");

        let client = Client::new("user", "secret", true).unwrap();
        assert_eq!(client.base_url(), "https://test-api.xolphin.com/v1/");
        assert_eq!(client.rate_state(), RateState { limit: 1, remaining: 1 });

        let config = ClientConfig::new("user", "secret")
            .environment(Environment::Other("http://localhost:9000/v1".to_owned()));
        let client = Client::with_config(config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/v1/");
    }

    #[test]
    fn test_invalid_config() {
        let config = ClientConfig::new("user", "secret")
            .environment(Environment::Other("not a url".to_owned()));
        assert!(matches!(Client::with_config(config), Err(Error::Config(_))));

        let config = ClientConfig::new("user", "secret").proxy(ProxyConfig::new("::nope::"));
        assert!(matches!(Client::with_config(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_proxy_config() {
        let config =
            ClientConfig::new("user", "secret").proxy(ProxyConfig::new("http://127.0.0.1:8888"));
        Client::with_config(config).unwrap();
    }

    #[test]
    fn test_debug_has_no_password() {
        let client = Client::new("user", "hunter2", true).unwrap();
        assert!(!format!("{client:?}").contains("hunter2"));
    }

    #[tokio::test]
    async fn test_foreign_urls_are_rejected() {
        let client = Client::new("user", "secret", true).unwrap();

        for path in ["https://other.example/x", "http://test-api.xolphin.com/v1/x"] {
            let err = client.get(path, &()).await.unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{path} was accepted");
        }

        let err = client
            .post("https://other.example/x", PostFields::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let url = client.url("support/product/90").unwrap();
        assert_eq!(url.as_str(), "https://test-api.xolphin.com/v1/support/product/90");
    }

    #[test]
    fn test_decode_empty_body() {
        assert_eq!(decode_json(b"").unwrap(), Value::Null);
        assert_eq!(decode_json(b" \n").unwrap(), Value::Null);
        assert!(matches!(decode_json(b"nope"), Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn test_get_updates_rate_state() {
        let server = with_api_server();
        let client = server.client();

        let raw = client.get("support/product/90", &()).await.unwrap();
        assert_eq!(raw["id"], 90);
        assert_eq!(client.rate_state(), RateState { limit: 100, remaining: 99 });
        assert_eq!(client.limit(), 100);
        assert_eq!(client.requests_remaining(), 99);
    }

    #[tokio::test]
    async fn test_missing_rate_headers_leave_state() {
        let server = with_api_server();
        let client = server.client();

        client.get("support/product/90", &()).await.unwrap();
        let raw = client.get("support/quiet", &()).await.unwrap();

        assert_eq!(raw["ok"], true);
        assert_eq!(client.rate_state(), RateState { limit: 100, remaining: 99 });
    }

    #[tokio::test]
    async fn test_clones_share_rate_state() {
        let server = with_api_server();
        let client = server.client();
        let other = client.with_timeout(Duration::from_secs(5));

        other.get("support/product/90", &()).await.unwrap();
        assert_eq!(client.requests_remaining(), 99);
    }

    #[tokio::test]
    async fn test_status_error_leaves_rate_state() {
        let server = with_api_server();
        let client = server.client();

        let err = client.get("support/forbidden", &()).await.unwrap_err();
        let api = err.api_error().unwrap();

        assert!(matches!(err, Error::HttpStatus(_)));
        assert_eq!(api.http_status, Some(403));
        assert!(api.code.as_ref().is_some_and(|code| *code == 403));
        assert_eq!(api.message, "Not allowed");
        assert_eq!(client.rate_state(), RateState::default());
    }

    #[tokio::test]
    async fn test_status_error_without_json() {
        let server = with_api_server();
        let client = server.client();

        let err = client.get("support/crash", &()).await.unwrap_err();
        let api = err.api_error().unwrap();

        assert_eq!(api.http_status, Some(500));
        assert_eq!(api.code, None);
        assert_eq!(api.message, "500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let server = with_api_server();
        let client = server.client();

        let err = client.get("support/does-not-exist", &()).await.unwrap_err();
        assert_eq!(err.api_error().unwrap().http_status, Some(404));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let server = with_api_server();
        let client = server.client_with("", "");

        let err = client.get("support/product/90", &()).await.unwrap_err();
        assert_eq!(err.api_error().unwrap().http_status, Some(401));
        assert_eq!(client.rate_state(), RateState::default());
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let server = with_api_server();
        let client = server.client();

        let err = client.get("support/broken", &()).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));

        // the round trip itself succeeded
        assert_eq!(client.rate_state(), RateState { limit: 100, remaining: 50 });
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = with_api_server();
        let client = server.client().with_timeout(Duration::from_millis(200));

        let err = client.get("support/slow", &()).await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(client.rate_state(), RateState::default());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let config = ClientConfig::new("user", "secret")
            .environment(Environment::Other("http://127.0.0.1:1/v1/".to_owned()));
        let client = Client::with_config(config).unwrap();

        let err = client.get("support/product/90", &()).await.unwrap_err();
        assert!(matches!(&err, Error::Transport(transport) if transport.is_connect()));
        assert_eq!(client.rate_state(), RateState::default());
    }

    #[tokio::test]
    async fn test_post_multipart() {
        let server = with_api_server();
        let client = server.client();

        let fields = PostFields::new()
            .with("document", b"%PDF".to_vec())
            .with("years", 2_u32)
            .with("reference", "abc");

        let raw = client.post("support/echo", fields).await.unwrap();
        assert_eq!(raw["fields"], serde_json::json!(["document", "years", "reference"]));
        assert_eq!(raw["filenames"], serde_json::json!(["document.pdf"]));
        assert_eq!(client.rate_state(), RateState { limit: 100, remaining: 90 });
    }

    #[tokio::test]
    async fn test_download() {
        let server = with_api_server();
        let client = server.client();

        let download = client
            .download("certificates/1/download", &[("format", "CRT")])
            .await
            .unwrap();

        // rate state is taken as soon as the headers arrive
        assert_eq!(client.rate_state(), RateState { limit: 100, remaining: 95 });
        assert_eq!(download.content_type(), Some("application/x-x509-ca-cert"));
        assert_eq!(&download.bytes().await.unwrap()[..], TestServer::CERTIFICATE);
    }

    #[tokio::test]
    async fn test_download_in_chunks() {
        let server = with_api_server();
        let client = server.client();

        let mut download = client
            .download("certificates/1/download", &[("format", "CRT")])
            .await
            .unwrap();

        let mut body = Vec::new();
        while let Some(chunk) = download.chunk().await.unwrap() {
            body.extend_from_slice(&chunk);
        }

        assert_eq!(body, TestServer::CERTIFICATE);
    }

    #[tokio::test]
    async fn test_download_error() {
        let server = with_api_server();
        let client = server.client();

        let err = client
            .download("certificates/2/download", &[("format", "CRT")])
            .await
            .unwrap_err();

        assert_eq!(err.api_error().unwrap().http_status, Some(404));
        assert_eq!(client.rate_state(), RateState::default());
    }
}
