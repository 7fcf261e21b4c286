//! Application configuration loaded from environment variables.

use std::collections::HashSet;
use thiserror::Error;

use crate::domain::aggregates::order::StatusPolicy;

/// Reads from environment variables:
/// - `PORT`: listen port (default: `8083`)
/// - `ADMIN_EMAILS`: comma-separated admin allow-list
/// - `STRICT_STATUS_FLOW`: set to `1`/`true` to reject illegal order status
///   transitions instead of overwriting unconditionally
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub port: u16,
    pub admins: AdminList,
    pub status_policy: StatusPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8083),
            admins: AdminList::from_csv(std::env::var("ADMIN_EMAILS").ok().as_deref()),
            status_policy: match std::env::var("STRICT_STATUS_FLOW").ok().as_deref() {
                Some("1") | Some("true") => StatusPolicy::Strict,
                _ => StatusPolicy::Compat,
            },
        }
    }
}

/// Operator-configured set of identities allowed to perform admin reads and
/// order status updates. An unset or empty list is reported differently from
/// a caller that is simply not on it, so a misconfigured deployment is
/// visible as such.
#[derive(Clone, Debug, Default)]
pub struct AdminList(Option<HashSet<String>>);

impl AdminList {
    pub fn from_csv(raw: Option<&str>) -> Self {
        let set: HashSet<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_owned)
            .collect();
        if set.is_empty() {
            Self(None)
        } else {
            Self(Some(set))
        }
    }

    pub fn authorize(&self, email: &str) -> Result<(), AccessError> {
        match &self.0 {
            None => Err(AccessError::NotConfigured),
            Some(set) if set.contains(email) => Ok(()),
            Some(_) => Err(AccessError::Denied),
        }
    }
}

/// Structured access-control failure, surfaced to callers as an
/// `{"error": …}` payload rather than a transport error.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Admin list not configured")]
    NotConfigured,
    #[error("Access denied")]
    Denied,
}
