//! Tool-result cache port.
//!
//! An explicit abstraction injected into the tool dispatcher: the in-memory
//! implementation lives in the infrastructure layer and a distributed cache
//! can replace it without touching the dispatcher or the orchestrator.

use std::time::Duration;

/// Process-wide memoization of external tool calls.
///
/// Implementations must support concurrent get/put from multiple research
/// workers without a client-visible lock. Entries are independent; no
/// cross-entry consistency is required. Expired entries are treated as
/// misses and evicted lazily on access.
pub trait ResultCache: Send + Sync {
    /// Look up a cached value for a tool call. Returns `None` for absent
    /// or expired entries.
    fn get(&self, tool_name: &str, params: &serde_json::Value) -> Option<serde_json::Value>;

    /// Store a value under the canonical key for this tool call.
    fn put(
        &self,
        tool_name: &str,
        params: &serde_json::Value,
        value: serde_json::Value,
        ttl: Duration,
    );

    /// Number of live entries (expired-but-unevicted entries may count).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry now; returns how many were removed.
    fn evict_expired(&self) -> usize;
}
