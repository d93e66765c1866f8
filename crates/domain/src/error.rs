/// Shared error type used across all Aun crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("tool {tool}: {message}")]
    Tool { tool: String, message: String },

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error came from the completion/agent service side.
    ///
    /// These are the failures a conversation session swallows and replaces
    /// with its transient-error text.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::Timeout(_)
                | Error::Provider { .. }
                | Error::Json(_)
                | Error::Auth(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_and_timeout_are_upstream() {
        assert!(Error::Timeout("60s".into()).is_upstream());
        assert!(Error::Provider {
            provider: "openrouter".into(),
            message: "HTTP 502".into(),
        }
        .is_upstream());
        assert!(Error::Http("connection refused".into()).is_upstream());
    }

    #[test]
    fn config_and_tool_are_not_upstream() {
        assert!(!Error::Config("bad".into()).is_upstream());
        assert!(!Error::Tool {
            tool: "schedule_session".into(),
            message: "missing name".into(),
        }
        .is_upstream());
    }

    #[test]
    fn provider_display_names_provider() {
        let e = Error::Provider {
            provider: "openrouter".into(),
            message: "no choices in response".into(),
        };
        assert_eq!(e.to_string(), "provider openrouter: no choices in response");
    }
}
