//! External model provider integrations for Inkwell.
//!
//! Every client implements [`InkwellDriver`](inkwell_interface::InkwellDriver)
//! and performs exactly one HTTP attempt per call, bounded by the timeout in
//! [`ProviderSettings`](inkwell_core::ProviderSettings).
//!
//! # Available Providers
//!
//! - **Anthropic** (`ANTHROPIC_API_KEY`)
//! - **OpenAI** (`OPENAI_API_KEY`)
//! - **Gemini** (`GEMINI_API_KEY`)
//! - **Groq** (`GROQ_API_KEY`, OpenAI-compatible)
//!
//! The first key present in that order selects the provider.
//!
//! ```no_run
//! use inkwell_core::{GenerateRequest, InkwellSettings, Message};
//! use inkwell_interface::InkwellDriver;
//! use inkwell_models::{ProviderSelection, build_driver};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = InkwellSettings::load()?;
//! let selection = ProviderSelection::from_env()?;
//! let driver = build_driver(&selection, settings.provider())?;
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("Hello")])
//!     .build()?;
//! let response = driver.generate(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anthropic;
mod gemini;
mod http;
mod openai_compat;
mod selection;

pub use anthropic::{
    AnthropicClient, AnthropicContentBlock, AnthropicMessage, AnthropicRequest,
    AnthropicRequestBuilder, AnthropicResponse,
};
pub use gemini::GeminiClient;
pub use openai_compat::OpenAICompatibleClient;
pub use selection::{ProviderKind, ProviderSelection, build_driver};
