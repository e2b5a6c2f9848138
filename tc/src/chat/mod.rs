//! Conversation engine boundary
//!
//! The LLM integration is a black box behind [`ConversationClient`]: one
//! turn in, one structured JSON reply out. A reply may carry a complete
//! replacement trip or a partial update; the editor decides how to merge
//! it. Mirrors the wire contract of the original chat backend.

mod client;
mod error;
mod prompts;
mod types;

pub use client::{ConversationClient, HttpConversationClient};
pub use error::ChatError;
pub use prompts::{render_system_prompt, ITINERARY_SYSTEM};
pub use types::{ChatMessage, ChatReply, ChatRequest, ChatRole};
