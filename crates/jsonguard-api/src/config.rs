//! # Configuration
//!
//! Settings for validated handlers and for the demo server, with
//! environment-variable loading. Unparsable values fall back to the
//! defaults and are reported with a warning.

use jsonguard_schema::Draft;

/// Default upper bound on a request body, matching Axum's own default.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Default port for the demo server.
pub const DEFAULT_PORT: u16 = 8080;

const MAX_BODY_BYTES_VAR: &str = "JSONGUARD_MAX_BODY_BYTES";
const DRAFT_VAR: &str = "JSONGUARD_DRAFT";
const PORT_VAR: &str = "PORT";

/// Per-wrapper validation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateConfig {
    /// Largest request body read before the request is treated as malformed.
    pub max_body_bytes: usize,
    /// Draft used to compile schemas. `None` detects it from `$schema`.
    pub draft: Option<Draft>,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            draft: None,
        }
    }
}

impl ValidateConfig {
    /// Read `JSONGUARD_MAX_BODY_BYTES` and `JSONGUARD_DRAFT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_body_bytes = match lookup(MAX_BODY_BYTES_VAR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid {}, using default", MAX_BODY_BYTES_VAR);
                defaults.max_body_bytes
            }),
            None => defaults.max_body_bytes,
        };

        let draft = lookup(DRAFT_VAR).and_then(|raw| {
            let draft = parse_draft(&raw);
            if draft.is_none() {
                tracing::warn!(value = %raw, "unknown {}, detecting draft from $schema", DRAFT_VAR);
            }
            draft
        });

        Self {
            max_body_bytes,
            draft,
        }
    }
}

/// Parse a draft name such as `7` or `2020-12`.
pub fn parse_draft(raw: &str) -> Option<Draft> {
    match raw.trim().trim_start_matches("draft").trim_start_matches('-') {
        "4" => Some(Draft::Draft4),
        "6" => Some(Draft::Draft6),
        "7" => Some(Draft::Draft7),
        "2019-09" => Some(Draft::Draft201909),
        "2020-12" => Some(Draft::Draft202012),
        _ => None,
    }
}

/// Demo server settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl ServerConfig {
    /// Read `PORT`.
    pub fn from_env() -> Self {
        let port = std::env::var(PORT_VAR)
            .ok()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { port }
    }
}
