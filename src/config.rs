//! Client configuration and endpoint table.
//!
//! The base URL and API version come from the environment with fallback
//! defaults; every endpoint the client talks to is derived from them.

use std::time::Duration;

/// Default backend base URL when `CHAT_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default API version segment when `CHAT_API_VERSION` is unset.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default request timeout for non-streaming calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Language used for user-facing failure text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    /// Parse a locale tag such as `zh`, `zh-CN`, `en` or `en_US`.
    pub fn parse(tag: &str) -> Option<Self> {
        let lower = tag.trim().to_ascii_lowercase();
        if lower.starts_with("zh") {
            Some(Locale::Zh)
        } else if lower.starts_with("en") {
            Some(Locale::En)
        } else {
            None
        }
    }

    /// Text shown as the assistant message when a turn fails.
    pub fn turn_failed(&self, message: &str) -> String {
        let message = if message.trim().is_empty() {
            self.send_failed()
        } else {
            message
        };
        match self {
            Locale::Zh => format!("错误：{}", message),
            Locale::En => format!("Error: {}", message),
        }
    }

    fn send_failed(&self) -> &'static str {
        match self {
            Locale::Zh => "发送消息失败",
            Locale::En => "Failed to send message",
        }
    }
}

/// Configuration shared by the HTTP client and the conversation session.
///
/// # Example
///
/// ```
/// use kortix_chat::config::ApiConfig;
///
/// let config = ApiConfig::default().with_base_url("http://example.com:9000/");
/// assert_eq!(config.chat_stream_url(), "http://example.com:9000/v1/chat");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Backend base URL without trailing slash
    pub base_url: String,
    /// API version path segment (e.g. `v1`)
    pub api_version: String,
    /// Timeout applied to non-streaming requests
    pub request_timeout: Duration,
    /// Language for failure messages appended to history
    pub locale: Locale,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            locale: Locale::default(),
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL. Trailing slashes are stripped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the API version segment. Surrounding slashes are stripped.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into().trim_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Build a config from `CHAT_API_URL`, `CHAT_API_VERSION`,
    /// `CHAT_API_TIMEOUT_SECS` and `CHAT_LOCALE`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] but with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(url) = non_empty("CHAT_API_URL") {
            config = config.with_base_url(url);
        }
        if let Some(version) = non_empty("CHAT_API_VERSION") {
            config = config.with_api_version(version);
        }
        match non_empty("CHAT_API_TIMEOUT_SECS").map(|v| v.trim().parse::<u64>()) {
            Some(Ok(secs)) => config = config.with_request_timeout(Duration::from_secs(secs)),
            Some(Err(e)) => tracing::warn!("Ignoring invalid CHAT_API_TIMEOUT_SECS: {}", e),
            None => {}
        }
        if let Some(tag) = non_empty("CHAT_LOCALE") {
            match Locale::parse(&tag) {
                Some(locale) => config = config.with_locale(locale),
                None => tracing::warn!("Ignoring unknown CHAT_LOCALE '{}'", tag),
            }
        }
        config
    }

    fn versioned(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.api_version, path)
    }

    pub fn chat_stream_url(&self) -> String {
        self.versioned("chat")
    }

    pub fn chat_completion_url(&self) -> String {
        self.versioned("chat/completion")
    }

    pub fn chat_reset_url(&self) -> String {
        self.versioned("chat/reset")
    }

    pub fn history_url(&self) -> String {
        self.versioned("history")
    }

    pub fn history_save_url(&self) -> String {
        self.versioned("history/save")
    }

    pub fn history_load_url(&self) -> String {
        self.versioned("history/load")
    }

    pub fn tools_url(&self) -> String {
        self.versioned("tools")
    }

    /// URL of a single tool; the name is percent-encoded.
    pub fn tool_url(&self, name: &str) -> String {
        format!("{}/{}", self.tools_url(), urlencoding::encode(name))
    }

    /// Health lives outside the versioned prefix.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}
