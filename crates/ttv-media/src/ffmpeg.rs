//! Thin FFmpeg/ffprobe wrappers for the composition stages.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Probe a media file's duration in seconds.
pub async fn probe_duration(input: impl AsRef<Path>) -> MediaResult<f64> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }
    check_ffprobe()?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
        ])
        .arg(input)
        .stdin(Stdio::null())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfmpegFailed {
            message: format!("ffprobe failed for {}", input.display()),
            stderr: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
            exit_code: output.status.code(),
        });
    }

    parse_probe_duration(&String::from_utf8_lossy(&output.stdout))
}

/// Parse ffprobe's `-of json` format output into a duration.
fn parse_probe_duration(stdout: &str) -> MediaResult<f64> {
    let probe: ProbeOutput = serde_json::from_str(stdout)?;
    let duration = probe
        .format
        .duration
        .ok_or_else(|| MediaError::InvalidVideo("no duration in probe output".to_string()))?;
    duration
        .parse::<f64>()
        .map_err(|_| MediaError::InvalidVideo(format!("unparseable duration: {duration}")))
}

/// Concatenate clips into a single video, re-encoding so mismatched
/// sources still join cleanly.
pub async fn concat_videos(
    inputs: &[PathBuf],
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let output = output.as_ref();
    if inputs.is_empty() {
        return Err(MediaError::InvalidVideo("no clips to concatenate".to_string()));
    }
    for input in inputs {
        if !input.exists() {
            return Err(MediaError::FileNotFound(input.clone()));
        }
    }
    check_ffmpeg()?;

    let list_path = output.with_extension("concat.txt");
    let list_body = concat_list(inputs);
    tokio::fs::write(&list_path, list_body).await?;

    let result = run_ffmpeg(
        Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-f", "concat", "-safe", "0", "-i"])
            .arg(&list_path)
            .args(["-c:v", "libx264", "-preset", "medium", "-crf", "23"])
            .args(["-c:a", "aac", "-pix_fmt", "yuv420p"])
            .arg(output),
        "concat",
    )
    .await;

    let _ = tokio::fs::remove_file(&list_path).await;
    result?;

    info!(clips = inputs.len(), output = %output.display(), "concatenated clips");
    Ok(())
}

/// Build a concat demuxer list file body. Single quotes in paths are
/// escaped per the demuxer's quoting rules.
fn concat_list(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|p| {
            let escaped = p.to_string_lossy().replace('\'', r"'\''");
            format!("file '{escaped}'\n")
        })
        .collect()
}

/// Mux an audio track onto a video, trimming to the shorter stream.
pub async fn mux_audio(
    video: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    let audio = audio.as_ref();
    let output = output.as_ref();
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }
    if !audio.exists() {
        return Err(MediaError::FileNotFound(audio.to_path_buf()));
    }
    check_ffmpeg()?;

    run_ffmpeg(
        Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-i"])
            .arg(video)
            .arg("-i")
            .arg(audio)
            .args(["-map", "0:v:0", "-map", "1:a:0"])
            .args(["-c:v", "copy", "-c:a", "aac", "-shortest"])
            .arg(output),
        "mux_audio",
    )
    .await?;

    info!(output = %output.display(), "muxed audio track");
    Ok(())
}

/// Burn an SRT file into the video track.
pub async fn burn_subtitles(
    video: impl AsRef<Path>,
    subtitles: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    let subtitles = subtitles.as_ref();
    let output = output.as_ref();
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }
    if !subtitles.exists() {
        return Err(MediaError::FileNotFound(subtitles.to_path_buf()));
    }
    check_ffmpeg()?;

    let filter = format!("subtitles={}", subtitle_filter_path(subtitles));
    run_ffmpeg(
        Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-i"])
            .arg(video)
            .args(["-vf", &filter])
            .args(["-c:v", "libx264", "-preset", "medium", "-crf", "23"])
            .args(["-c:a", "copy"])
            .arg(output),
        "burn_subtitles",
    )
    .await?;

    info!(output = %output.display(), "burned subtitles");
    Ok(())
}

/// Escape a path for the subtitles filter. The filter parser treats
/// `:`, `'` and `\` specially.
fn subtitle_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', r"\\")
        .replace(':', r"\:")
        .replace('\'', r"\'")
}

/// Run an FFmpeg invocation, mapping non-zero exits to `FfmpegFailed`
/// with captured stderr.
async fn run_ffmpeg(command: &mut Command, operation: &str) -> MediaResult<()> {
    debug!(operation, "running ffmpeg");
    let output = command.stdin(Stdio::null()).output().await?;

    if output.status.success() {
        Ok(())
    } else {
        Err(MediaError::FfmpegFailed {
            message: format!("{operation} exited with non-zero status"),
            stderr: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
            exit_code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_duration_parses_format_json() {
        let stdout = r#"{"format": {"duration": "12.345000"}}"#;
        let duration = parse_probe_duration(stdout).unwrap();
        assert!((duration - 12.345).abs() < 1e-9);
    }

    #[test]
    fn probe_duration_rejects_missing_field() {
        let err = parse_probe_duration(r#"{"format": {}}"#).unwrap_err();
        assert!(matches!(err, MediaError::InvalidVideo(_)));
    }

    #[test]
    fn concat_list_escapes_quotes() {
        let list = concat_list(&[PathBuf::from("/tmp/a.mp4"), PathBuf::from("/tmp/it's.mp4")]);
        assert_eq!(list, "file '/tmp/a.mp4'\nfile '/tmp/it'\\''s.mp4'\n");
    }

    #[test]
    fn subtitle_filter_path_escapes_specials() {
        let escaped = subtitle_filter_path(Path::new("/tmp/a:b.srt"));
        assert_eq!(escaped, r"/tmp/a\:b.srt");
    }

    #[tokio::test]
    async fn missing_input_is_reported_before_spawning() {
        let err = probe_duration("/nonexistent/clip.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
