//! Configuration for the ImpactSpark dashboard.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the OpenAlex API.
    pub const OPENALEX_API: &str = "https://api.openalex.org";

    /// Base URL for the Crossref REST API.
    pub const CROSSREF_API: &str = "https://api.crossref.org";

    /// Contact address sent to the polite pools when none is configured.
    pub const DEFAULT_EMAIL: &str = "user@example.com";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Minimum interval between API requests (1 req/s, polite pool etiquette).
    pub const RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(1);

    /// Delay before each scraped page fetch.
    pub const SCRAPE_DELAY: Duration = Duration::from_millis(500);

    /// Cache TTL (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 1000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Dashboard defaults.
pub mod dashboard {
    /// Default bind host. The UI is documented as `http://localhost:8501`.
    pub const DEFAULT_HOST: &str = "127.0.0.1";

    /// Default port (the port the dashboard has always used).
    pub const DEFAULT_PORT: u16 = 8501;

    /// Results requested per OpenAlex page.
    pub const DEFAULT_PER_PAGE: u32 = 25;

    /// Upper bound OpenAlex accepts for `per-page`.
    pub const MAX_PER_PAGE: u32 = 200;

    /// Publications enriched per scrape request.
    pub const MAX_ENRICH_ITEMS: usize = 10;

    /// Default lookback for the date range, in years.
    pub const DEFAULT_LOOKBACK_YEARS: i32 = 10;

    /// Lookback used by the "recent publications only" filter, in days.
    pub const RECENT_LOOKBACK_DAYS: i64 = 365 * 2;

    /// Upper end of the citation slider; `max_citations` at this value means unbounded.
    pub const CITATION_SLIDER_MAX: u32 = 10_000;
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Contact email for the OpenAlex and Crossref polite pools.
    pub user_email: String,

    /// Base URL for OpenAlex (for testing with mock servers).
    pub openalex_api_url: String,

    /// Base URL for Crossref (for testing with mock servers).
    pub crossref_api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Minimum interval between API requests. Zero disables limiting.
    pub rate_limit_interval: Duration,

    /// Delay before each scraped page fetch.
    pub scrape_delay: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Bind host for the HTTP server.
    pub host: String,

    /// Bind port for the HTTP server.
    pub port: u16,

    /// Publications enriched per scrape request.
    pub max_enrich_items: usize,
}

impl Config {
    /// Create a configuration with the given polite-pool contact email.
    #[must_use]
    pub fn new(user_email: Option<String>) -> Self {
        Self {
            user_email: user_email.unwrap_or_else(|| api::DEFAULT_EMAIL.to_string()),
            openalex_api_url: api::OPENALEX_API.to_string(),
            crossref_api_url: api::CROSSREF_API.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_interval: api::RATE_LIMIT_INTERVAL,
            scrape_delay: api::SCRAPE_DELAY,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            host: dashboard::DEFAULT_HOST.to_string(),
            port: dashboard::DEFAULT_PORT,
            max_enrich_items: dashboard::MAX_ENRICH_ITEMS,
        }
    }

    /// Create a test configuration with custom URLs for mock servers.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            user_email: "test@example.com".to_string(),
            openalex_api_url: format!("{}/openalex", base_url),
            crossref_api_url: format!("{}/crossref", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_interval: Duration::ZERO, // No limiting in tests
            scrape_delay: Duration::ZERO,
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
            host: dashboard::DEFAULT_HOST.to_string(),
            port: 0,
            max_enrich_items: dashboard::MAX_ENRICH_ITEMS,
        }
    }

    /// Create configuration from environment variables (and a `.env` file if present).
    ///
    /// # Errors
    ///
    /// Returns error if `IMPACTSPARK_PORT` is not a valid port number.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::new(std::env::var("USER_EMAIL").ok());

        if let Ok(host) = std::env::var("IMPACTSPARK_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("IMPACTSPARK_PORT") {
            config.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid IMPACTSPARK_PORT '{port}': {e}"))?;
        }

        Ok(config)
    }

    /// User-Agent sent to the scholarly APIs.
    #[must_use]
    pub fn user_agent(&self) -> String {
        format!("ImpactSpark/{} (mailto:{})", env!("CARGO_PKG_VERSION"), self.user_email)
    }

    /// Whether the configured contact is the placeholder address.
    #[must_use]
    pub fn has_contact_email(&self) -> bool {
        self.user_email != api::DEFAULT_EMAIL
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.user_email, api::DEFAULT_EMAIL);
        assert!(!config.has_contact_email());
        assert_eq!(config.port, 8501);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_config_with_email() {
        let config = Config::new(Some("researcher@uni.edu".to_string()));
        assert!(config.has_contact_email());
        assert!(config.user_agent().contains("mailto:researcher@uni.edu"));
    }

    #[test]
    fn test_testing_config_disables_delays() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.rate_limit_interval, Duration::ZERO);
        assert_eq!(config.openalex_api_url, "http://127.0.0.1:9999/openalex");
        assert_eq!(config.crossref_api_url, "http://127.0.0.1:9999/crossref");
    }
}
