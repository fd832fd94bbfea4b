//! Per-call option overrides for query and execute operations.

use std::sync::Arc;
use std::time::Duration;

use crate::proposal::Peer;
use crate::traits::ResponseFilter;

/// Overrides for a single query call.
///
/// Anything left unset falls back to the client's configuration: targets are
/// resolved through discovery and selection, the default consistency filter
/// applies, and the configured query timeout governs the wait.
#[derive(Default)]
pub struct QueryOptions {
    pub(crate) targets: Option<Vec<Peer>>,
    pub(crate) filter: Option<Arc<dyn ResponseFilter>>,
    pub(crate) timeout: Option<Duration>,
}

impl QueryOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Send the proposal to these targets instead of resolving them through
    /// discovery and selection.
    pub fn with_targets(mut self, targets: Vec<Peer>) -> Self {
        self.targets = Some(targets);
        self
    }

    /// Validate responses with this filter instead of the default.
    pub fn with_filter(mut self, filter: Arc<dyn ResponseFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Wait at most this long for the result.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Overrides for a single execute call. Same fallbacks as [`QueryOptions`],
/// with the configured execute timeout governing the commit wait.
#[derive(Default)]
pub struct ExecuteOptions {
    pub(crate) targets: Option<Vec<Peer>>,
    pub(crate) filter: Option<Arc<dyn ResponseFilter>>,
    pub(crate) timeout: Option<Duration>,
}

impl ExecuteOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Send the proposal to these targets instead of resolving them through
    /// discovery and selection.
    pub fn with_targets(mut self, targets: Vec<Peer>) -> Self {
        self.targets = Some(targets);
        self
    }

    /// Validate responses with this filter instead of the default.
    pub fn with_filter(mut self, filter: Arc<dyn ResponseFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Wait at most this long for the commit verdict.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
