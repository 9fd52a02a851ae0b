//! The `ChatCompleter` trait: the seam between the chat service and the
//! upstream completion API.

use anyhow::Result;
use async_trait::async_trait;

use super::ChatMessage;

/// Something that can answer a single user query.
///
/// Object-safe so the HTTP server can hold an `Arc<dyn ChatCompleter>` and
/// tests can substitute a canned implementation.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Model name recorded alongside each exchange.
    fn model(&self) -> &str;

    /// Send `query` as a single user message and return the reply.
    async fn complete(&self, query: &str) -> Result<ChatMessage>;
}

// Compile-time assertion: ChatCompleter must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn ChatCompleter) {}
};
