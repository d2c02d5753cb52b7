//! Media collaborators for the TTV pipeline.
//!
//! This crate provides:
//! - Pexels stock footage search and download
//! - SRT subtitle generation from a narration script
//! - Thin FFmpeg/ffprobe wrappers (probe, concat, mux, burn-in)

pub mod error;
pub mod ffmpeg;
pub mod pexels;
pub mod subtitle;

pub use error::{MediaError, MediaResult};
pub use ffmpeg::{burn_subtitles, check_ffmpeg, check_ffprobe, concat_videos, mux_audio, probe_duration};
pub use pexels::{PexelsClient, StockVideo};
pub use subtitle::build_srt;
