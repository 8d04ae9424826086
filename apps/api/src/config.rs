use std::time::Duration;

use anyhow::{Context, Result};

use crate::cv::keywords::Vocabulary;

const DEFAULT_MAX_SESSIONS: usize = 1024;
const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

/// Application configuration loaded from environment variables.
/// Every variable is optional; unparsable values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Candidate terms for job-description keyword matching.
    pub vocabulary: Vocabulary,
    pub max_sessions: usize,
    /// Sessions untouched for this long are evicted.
    pub session_idle_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let vocabulary = match lookup("KEYWORD_VOCABULARY") {
            Some(raw) => {
                let vocabulary = Vocabulary::parse_list(&raw);
                anyhow::ensure!(
                    !vocabulary.is_empty(),
                    "KEYWORD_VOCABULARY must name at least one term"
                );
                vocabulary
            }
            None => Vocabulary::reference(),
        };

        let session_idle_ttl = match lookup("SESSION_IDLE_TTL") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .context("SESSION_IDLE_TTL must be a number of seconds")?;
                anyhow::ensure!(secs > 0, "SESSION_IDLE_TTL must be greater than zero");
                Duration::from_secs(secs)
            }
            None => DEFAULT_SESSION_IDLE_TTL,
        };

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            vocabulary,
            max_sessions: match lookup("MAX_SESSIONS") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_SESSIONS must be a non-negative integer")?,
                None => DEFAULT_MAX_SESSIONS,
            },
            session_idle_ttl,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            vocabulary: Vocabulary::reference(),
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle_ttl: DEFAULT_SESSION_IDLE_TTL,
        }
    }
}
