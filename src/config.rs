use std::env;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_API_PREFIX: &str = "/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub bind_addr: String,
    pub api_prefix: String,
}

impl Config {
    /// Read `DB_URL` (required), `BIND_ADDR` and `API_PREFIX`.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            db_url: env::var("DB_URL")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            api_prefix: normalize_prefix(
                &env::var("API_PREFIX").unwrap_or_else(|_| DEFAULT_API_PREFIX.to_string()),
            ),
        })
    }
}

/// `api/` and `/api` both become `/api`; an empty prefix stays empty.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_rooted_without_trailing_slash() {
        assert_eq!(normalize_prefix("api/"), "/api");
        assert_eq!(normalize_prefix("/api"), "/api");
        assert_eq!(normalize_prefix("/v1/api/"), "/v1/api");
        assert_eq!(normalize_prefix("/"), "");
    }
}
