//! Allowlist loading and matching.
//!
//! The allowlist is re-read from disk on every check. There is no cache, so
//! edits to the file take effect on the next request.

use std::path::Path;

/// Permitted caller addresses, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    entries: Vec<String>,
}

impl Allowlist {
    /// One address per line; surrounding whitespace trimmed, blank lines skipped.
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    /// Exact string comparison, no CIDR or wildcard semantics.
    pub fn contains(&self, addr: &str) -> bool {
        self.entries.iter().any(|e| e == addr)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// Read the allowlist at `path`.
///
/// An unreadable file yields an empty allowlist, which rejects every caller.
pub async fn load(path: &Path) -> Allowlist {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Allowlist::parse(&raw),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "allowlist read failed, denying all");
            Allowlist::default()
        }
    }
}
