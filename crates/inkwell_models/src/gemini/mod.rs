//! Google Gemini integration over the `generateContent` REST endpoint.

mod client;

pub use client::GeminiClient;
