//! Shared data models for the TTV backend.
//!
//! This crate provides Serde-serializable types for:
//! - Task identity, lifecycle state and progress
//! - Generation request parameters
//! - The API response envelope
//! - Script text utilities used by subtitle generation

pub mod params;
pub mod response;
pub mod task;
pub mod text;

// Re-export common types
pub use params::{AudioParams, ScriptParams, SubtitleParams, TermsParams, VideoParams};
pub use response::ApiResponse;
pub use task::{StopAt, TaskId, TaskState, TaskStateKind};
pub use text::split_script_lines;
