//! To-do service configuration
//!
//! ```env
//! API_TOKENS=first-token,second-token
//! TODO_STRICT_UPDATE=false
//! ```

use crate::store::UpdateMissing;

#[derive(Debug, Clone, Default)]
pub struct TodoConfig {
    /// Bearer tokens accepted on `/api/todo`; empty rejects every request
    pub api_tokens: Vec<String>,
    /// Answer a PUT for an absent id with 404 instead of 204
    pub strict_update: bool,
}

impl TodoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or unparsable values take defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_tokens: lookup("API_TOKENS")
                .map(|raw| parse_tokens(&raw))
                .unwrap_or_default(),
            strict_update: lookup("TODO_STRICT_UPDATE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(false),
        }
    }

    pub fn builder() -> TodoConfigBuilder {
        TodoConfigBuilder::default()
    }

    pub fn update_missing(&self) -> UpdateMissing {
        if self.strict_update {
            UpdateMissing::NotFound
        } else {
            UpdateMissing::Ignore
        }
    }
}

/// Split a comma-separated token list, dropping blanks
fn parse_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Default)]
pub struct TodoConfigBuilder {
    api_tokens: Vec<String>,
    strict_update: bool,
}

impl TodoConfigBuilder {
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_tokens.push(token.into());
        self
    }

    pub fn strict_update(mut self, strict: bool) -> Self {
        self.strict_update = strict;
        self
    }

    pub fn build(self) -> TodoConfig {
        TodoConfig {
            api_tokens: self.api_tokens,
            strict_update: self.strict_update,
        }
    }
}
