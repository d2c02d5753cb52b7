//! Generation pipeline executed for each admitted job.
//!
//! Stages run in order and stop early according to the job's `stop_at`:
//! script, subtitles, stock footage, composition. Every stage writes its
//! progress to the state store so polling clients see where a task is.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use ttv_llm::LlmClient;
use ttv_media::{burn_subtitles, build_srt, concat_videos, mux_audio, probe_duration, PexelsClient};
use ttv_models::{StopAt, TaskId};
use ttv_tasks::{GenerationJob, StateStore};

/// Rough narration pace used to stretch subtitles before real footage
/// durations are known.
const READING_CHARS_PER_SEC: f64 = 15.0;

/// Stock results fetched per search term.
const RESULTS_PER_TERM: u32 = 3;

/// Collaborators the pipeline needs, shared across all jobs.
pub struct PipelineContext {
    pub store: Arc<StateStore>,
    pub llm: Arc<LlmClient>,
    pub pexels: Arc<PexelsClient>,
    pub tasks_dir: PathBuf,
    pub songs_dir: PathBuf,
}

impl PipelineContext {
    fn task_dir(&self, task_id: &TaskId) -> PathBuf {
        self.tasks_dir.join(task_id.as_str())
    }
}

/// Run one generation job to completion, recording the outcome in the
/// state store. The returned error is for the admission layer's log; the
/// task snapshot already carries it.
pub async fn run_job(ctx: Arc<PipelineContext>, job: GenerationJob) -> anyhow::Result<()> {
    let task_id = job.task_id.clone();
    let result = execute(&ctx, &job).await;

    match &result {
        Ok(()) => {
            ctx.store.update(&task_id, |s| s.complete()).await;
            info!(task_id = %task_id, "task completed");
        }
        Err(e) => {
            let message = format!("{e:#}");
            ctx.store.update(&task_id, |s| s.fail(&message)).await;
            warn!(task_id = %task_id, error = %message, "task failed");
        }
    }

    result
}

async fn execute(ctx: &PipelineContext, job: &GenerationJob) -> anyhow::Result<()> {
    let task_id = &job.task_id;
    let params = &job.params;
    let dir = ctx.task_dir(task_id);
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("creating task directory {}", dir.display()))?;

    // Stage: script
    ctx.store.update(task_id, |s| s.set_stage("script", 10)).await;
    let script = ttv_llm::generate_script(
        &ctx.llm,
        &params.video_subject,
        &params.video_language,
        params.paragraph_number,
    )
    .await
    .context("script generation")?;

    let script_path = dir.join("script.txt");
    tokio::fs::write(&script_path, &script).await?;
    record_file(ctx, task_id, &script_path).await;
    ctx.store
        .update(task_id, |s| {
            s.script = Some(script.clone());
            s.set_stage("script", 20);
        })
        .await;

    if job.stop_at == StopAt::Audio {
        return Ok(());
    }

    // Stage: subtitles, against an estimated narration duration until the
    // real track length is known.
    ctx.store.update(task_id, |s| s.set_stage("subtitle", 30)).await;
    let estimated = estimate_duration(&script);
    let srt = build_srt(&script, estimated);
    let srt_path = dir.join("subtitle.srt");
    tokio::fs::write(&srt_path, &srt).await?;
    record_file(ctx, task_id, &srt_path).await;

    if job.stop_at == StopAt::Subtitle {
        return Ok(());
    }

    // Stage: search terms
    ctx.store.update(task_id, |s| s.set_stage("terms", 40)).await;
    let terms = ttv_llm::generate_terms(
        &ctx.llm,
        &params.video_subject,
        &script,
        params.terms_amount,
    )
    .await
    .context("search term generation")?;
    ctx.store
        .update(task_id, |s| {
            s.terms = terms.clone();
            s.set_stage("terms", 50);
        })
        .await;

    // Stage: stock footage
    ctx.store.update(task_id, |s| s.set_stage("footage", 60)).await;
    let clips = download_footage(ctx, task_id, &terms, params.clip_count, &dir).await?;
    for clip in &clips {
        record_file(ctx, task_id, clip).await;
    }

    // Stage: composition
    ctx.store.update(task_id, |s| s.set_stage("compose", 80)).await;
    let combined = dir.join("combined.mp4");
    concat_videos(&clips, &combined).await.context("clip concat")?;

    let track = match &params.bgm_file {
        Some(bgm) => {
            let song = ctx.songs_dir.join(bgm);
            let with_music = dir.join("combined-bgm.mp4");
            mux_audio(&combined, &song, &with_music)
                .await
                .context("background music mux")?;
            with_music
        }
        None => combined.clone(),
    };

    // Rebuild subtitles against the real duration before burning them in.
    let duration = probe_duration(&track).await.context("duration probe")?;
    tokio::fs::write(&srt_path, build_srt(&script, duration)).await?;

    let final_path = dir.join("final.mp4");
    burn_subtitles(&track, &srt_path, &final_path)
        .await
        .context("subtitle burn-in")?;
    record_file(ctx, task_id, &final_path).await;

    Ok(())
}

/// Search each term in order and download clips until `clip_count` are on
/// disk. A term with no usable results is skipped, not fatal; running out
/// of terms before any clip lands is.
async fn download_footage(
    ctx: &PipelineContext,
    task_id: &TaskId,
    terms: &[String],
    clip_count: u32,
    dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut clips = Vec::new();

    'terms: for term in terms {
        let videos = match ctx.pexels.search_videos(term, RESULTS_PER_TERM).await {
            Ok(videos) => videos,
            Err(e) => {
                warn!(task_id = %task_id, term, error = %e, "stock search failed, skipping term");
                continue;
            }
        };

        for video in videos {
            let dest = dir.join(format!("clip-{}.mp4", video.id));
            if let Err(e) = ctx.pexels.download(&video.link, &dest).await {
                warn!(task_id = %task_id, clip = video.id, error = %e, "clip download failed");
                continue;
            }
            clips.push(dest);
            if clips.len() >= clip_count as usize {
                break 'terms;
            }
        }
    }

    if clips.is_empty() {
        anyhow::bail!("no stock footage could be downloaded for any search term");
    }
    Ok(clips)
}

/// Record a produced file in the task snapshot, relative to the tasks
/// directory so the path is servable by the file routes.
async fn record_file(ctx: &PipelineContext, task_id: &TaskId, path: &Path) {
    let relative = path
        .strip_prefix(&ctx.tasks_dir)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_string_lossy().into_owned());
    ctx.store
        .update(task_id, |s| s.files.push(relative.clone()))
        .await;
}

fn estimate_duration(script: &str) -> f64 {
    (script.chars().count() as f64 / READING_CHARS_PER_SEC).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_estimate_scales_with_length() {
        let short = estimate_duration("Hi.");
        let long = estimate_duration(&"A sentence about spring. ".repeat(20));
        assert!(short >= 1.0);
        assert!(long > short);
    }
}
