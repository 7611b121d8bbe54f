//! Documentation-grounded tweet generation for kluster.ai.
//!
//! [`docs`] scrapes the kluster.ai documentation into a flat JSON cache,
//! [`tweets`] turns a cached topic into three tweet candidates through an
//! OpenAI-compatible API ([`llm`]).

pub mod config;
pub mod docs;
pub mod llm;
pub mod tweets;
