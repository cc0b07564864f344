use serde::Deserialize;

/// Keywords a page must mention (any one of) to be stored
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "sme",
    "smb",
    "pricing",
    "features",
    "merchant",
    "e-commerce",
    "ecommerce",
    "pos",
    "coupon",
    "loyalty",
    "reward",
    "subscription",
    "payment",
    "api",
    "docs",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Domain suffix that bounds the crawl (e.g. "mezzofy.com")
    pub root_domain: String,

    /// Seed URL used when a crawl request does not name one
    pub default_start_url: String,

    /// Page budget used when a crawl request does not name one
    pub max_pages: usize,

    /// Whole-request timeout for a single fetch, in seconds
    pub fetch_timeout_secs: u64,

    /// Maximum number of pages fetched concurrently
    pub workers: usize,

    /// Tag stored in `Page::source`
    pub source: String,

    /// Relevance keywords (matched case-insensitively)
    pub keywords: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_domain: "mezzofy.com".to_string(),
            default_start_url: "https://www.mezzofy.com".to_string(),
            max_pages: 20,
            fetch_timeout_secs: 10,
            workers: 1,
            source: "mezzofy".to_string(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "MezzofyCrawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://www.mezzofy.com".to_string(),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    /// Path to the SQLite database file. Without it pages are not persisted.
    pub database_path: Option<String>,
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    /// Name reported by the health endpoint
    pub app_name: String,

    /// Interface to bind
    pub host: String,

    /// Port to bind (the PORT environment variable takes precedence)
    pub port: u16,

    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,

    /// Number of pages returned by `GET /pages` without a `limit`
    pub default_page_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: "Mezzofy SME Content Crawler".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: Vec::new(),
            default_page_limit: 50,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}
