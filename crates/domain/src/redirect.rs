//! Redirect-chain trace.

use serde::{Deserialize, Serialize};

/// One request in a redirect chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    /// URL that was requested.
    pub url: String,
    /// Status it answered with.
    pub status: u16,
    /// `Location` it pointed to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Ordered hops of a redirect chain, extended one hop at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedirectTrace {
    hops: Vec<RedirectHop>,
}

impl RedirectTrace {
    /// An empty trace.
    #[must_use]
    pub const fn new() -> Self {
        Self { hops: Vec::new() }
    }

    /// Appends a hop.
    pub fn push(&mut self, hop: RedirectHop) {
        self.hops.push(hop);
    }

    /// All hops, in order.
    #[must_use]
    pub fn hops(&self) -> &[RedirectHop] {
        &self.hops
    }

    /// The last hop.
    #[must_use]
    pub fn last(&self) -> Option<&RedirectHop> {
        self.hops.last()
    }

    /// URL of the last hop.
    #[must_use]
    pub fn final_url(&self) -> Option<&str> {
        self.last().map(|hop| hop.url.as_str())
    }

    /// Number of redirects followed, i.e. hops before the terminal one.
    #[must_use]
    pub fn redirect_count(&self) -> usize {
        self.hops.len().saturating_sub(usize::from(self.is_terminal()))
    }

    /// Returns true once the last hop answered 200.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.last().is_some_and(|hop| hop.status == 200)
    }

    /// Number of hops.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Returns true if no request was made yet.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}
