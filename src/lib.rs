//! Speechless context relay
//!
//! A backend-for-frontend that accepts a screenshot plus a short spoken
//! instruction, forwards both to a multimodal chat model together with a
//! static system prompt, and returns the generated text.

pub mod ai;
pub mod error;
pub mod models;
pub mod prompts;
pub mod relay;
pub mod server;

pub use error::{Error, Result};
