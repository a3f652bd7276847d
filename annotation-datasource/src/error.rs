use serde::Serialize;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse failure class of a query, exposed to callers so they can branch
/// without inspecting the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Parse,
    Transport,
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("request to annotation API failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl QueryError {
    pub fn parse(what: &'static str, source: impl Into<BoxError>) -> Self {
        QueryError::Parse {
            what,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Parse { .. } => ErrorKind::Parse,
            QueryError::Transport(_) => ErrorKind::Transport,
        }
    }
}
