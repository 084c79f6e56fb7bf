//! Anthropic Messages API integration.

mod client;
mod dto;

pub use client::AnthropicClient;
pub use dto::{
    AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicRequestBuilder,
    AnthropicResponse,
};
