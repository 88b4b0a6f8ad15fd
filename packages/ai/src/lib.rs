// ABOUTME: Planora AI library - generative service client for plan synthesis
// ABOUTME: Wraps the Anthropic Messages API behind structured and text generation calls

pub mod service;

pub use service::{
    GenerativeError, GenerativeResponse, GenerativeResult, GenerativeService, Usage,
};
