use std::{env, fmt, time::Duration};

use zeroize::Zeroizing;

/// Version of the REST API this client speaks.
pub const API_VERSION: u32 = 1;

const PRODUCTION_HOST: &str = "https://api.xolphin.com";
const TEST_HOST: &str = "https://test-api.xolphin.com";

/// Environment variable read by [`ProxyConfig::from_env()`].
pub const TEST_PROXY_ENV: &str = "TEST_PROXY";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn default_user_agent() -> String {
    format!("xolphin-api-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Which API deployment to talk to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    /// The live API.
    #[default]
    Production,

    /// The test API.
    ///
    /// Use for development. Orders placed here are never issued.
    Test,

    /// Provide an arbitrary base URL, e.g. a local mock of the API.
    ///
    /// The URL should end in a `/` so resource paths are joined below it.
    Other(String),
}

impl Environment {
    pub fn from_test_flag(test: bool) -> Self {
        if test {
            Environment::Test
        } else {
            Environment::Production
        }
    }

    pub(crate) fn base_url(&self) -> String {
        match self {
            Environment::Production => format!("{PRODUCTION_HOST}/v{API_VERSION}/"),
            Environment::Test => format!("{TEST_HOST}/v{API_VERSION}/"),
            Environment::Other(url) => url.clone(),
        }
    }
}

/// Route all calls through a proxy, with TLS certificate verification turned off.
///
/// Only meant for test harnesses that intercept traffic. Never enabled unless set explicitly
/// on [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub url: String,
}

impl ProxyConfig {
    pub fn new(url: impl Into<String>) -> Self {
        ProxyConfig { url: url.into() }
    }

    /// Reads the proxy URL from the `TEST_PROXY` environment variable, if set.
    pub fn from_env() -> Option<Self> {
        env::var(TEST_PROXY_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(ProxyConfig::new)
    }
}

/// Everything needed to construct a [`Client`](crate::Client).
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) username: String,
    pub(crate) password: Zeroizing<String>,
    pub(crate) environment: Environment,
    pub(crate) timeout: Duration,
    pub(crate) user_agent: String,
    pub(crate) proxy: Option<ProxyConfig>,
}

impl ClientConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        ClientConfig {
            username: username.into(),
            password: Zeroizing::new(password.into()),
            environment: Environment::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            proxy: None,
        }
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Shorthand for choosing between [`Environment::Test`] and [`Environment::Production`].
    pub fn test(self, test: bool) -> Self {
        self.environment(Environment::from_test_flag(test))
    }

    /// Default timeout applied to every call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("environment", &self.environment)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("proxy", &self.proxy)
            .finish()
    }
}
