use std::path::{Path, PathBuf};

use crate::{
    assets::{
        decode::{Frame, decode_still},
        gather::{ImageSet, gather_siblings},
    },
    encode::ffmpeg::{EncodeConfig, FfmpegEncoder, FrameSmoothing},
    foundation::{
        core::{Fps, Resolution},
        error::{ReelError, ReelResult},
        settings::RenderSettings,
    },
    schedule::{
        ease::FrameShape,
        effect::{Direction, FrameEffect},
        plan::{FrameSchedule, schedule_frames},
        select::{downselect, image_budget},
    },
};

/// What the clip should look like.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderOptions {
    pub effect: FrameEffect,
    pub shape: FrameShape,
    pub smoothing: FrameSmoothing,
    /// Length of the whole clip in seconds.
    pub duration_secs: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            effect: FrameEffect::PingPong,
            shape: FrameShape::Linear,
            smoothing: FrameSmoothing::Off,
            duration_secs: 10.0,
        }
    }
}

/// One forward or reverse pass over the selected stills.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Segment {
    pub direction: Direction,
    pub period_secs: f64,
    /// Stills in playback order; schedule indices point into this list.
    pub images: Vec<PathBuf>,
    pub schedule: FrameSchedule,
}

/// Fully resolved render: which stills, in which order, for how many frames each.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderPlan {
    pub resolution: Resolution,
    pub fps: Fps,
    pub options: RenderOptions,
    /// Stills found next to the picked image.
    pub candidates: usize,
    /// Most stills a single segment can show.
    pub budget: usize,
    pub segments: Vec<Segment>,
}

impl RenderPlan {
    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(|s| s.schedule.total_frames()).sum()
    }
}

/// Counters reported after a render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    pub segments: usize,
    pub frames_written: u64,
    pub stills_decoded: u64,
    pub stills_skipped: u64,
}

/// Select and schedule the stills of `set` without touching pixels.
#[tracing::instrument(skip_all, fields(effect = %opts.effect, shape = %opts.shape, duration = opts.duration_secs))]
pub fn plan_render(
    set: &ImageSet,
    opts: &RenderOptions,
    settings: &RenderSettings,
) -> ReelResult<RenderPlan> {
    if !opts.duration_secs.is_finite() || opts.duration_secs <= 0.0 {
        return Err(ReelError::validation("The duration must be greater than 0."));
    }
    settings.check_duration(opts.duration_secs)?;
    if set.is_empty() {
        return Err(ReelError::not_enough_images("image set is empty"));
    }

    let period_secs = opts.effect.period_secs(opts.duration_secs);
    let budget = image_budget(period_secs, settings.fps)?;
    let selected = downselect(set.paths.clone(), budget);
    if selected.len() < set.len() {
        tracing::info!(
            from = set.len(),
            to = selected.len(),
            budget,
            "thinned stills to fit the frame budget"
        );
    }

    let segments = opts
        .effect
        .directions()
        .iter()
        .map(|&direction| {
            let mut images = selected.clone();
            if direction == Direction::Reverse {
                images.reverse();
            }
            let schedule = schedule_frames(images.len(), period_secs, settings.fps, opts.shape)?;
            Ok(Segment {
                direction,
                period_secs,
                images,
                schedule,
            })
        })
        .collect::<ReelResult<Vec<_>>>()?;

    Ok(RenderPlan {
        resolution: set.resolution,
        fps: settings.fps,
        options: *opts,
        candidates: set.len(),
        budget,
        segments,
    })
}

/// Decode every scheduled still of `plan` and stream it into ffmpeg.
#[tracing::instrument(skip_all, fields(out = %out_path.display(), frames = plan.total_frames()))]
pub fn render_plan_to_mp4(
    plan: &RenderPlan,
    out_path: &Path,
    settings: &RenderSettings,
) -> ReelResult<RenderStats> {
    let mut encoder = FfmpegEncoder::new(EncodeConfig {
        resolution: plan.resolution,
        fps: plan.fps,
        out_path: out_path.to_path_buf(),
        overwrite: settings.overwrite,
        bitrate_kbps: settings.bitrate_kbps,
        smoothing: plan.options.smoothing,
        program: settings.ffmpeg.clone(),
    })?;

    let mut stats = RenderStats {
        segments: plan.segments.len(),
        ..RenderStats::default()
    };
    // Ping-pong shows the turnaround still twice in a row.
    let mut last: Option<(&Path, Frame)> = None;

    for segment in &plan.segments {
        let count = segment.images.len();
        for entry in &segment.schedule.entries {
            let path = segment.images[entry.index].as_path();
            if entry.is_skipped() {
                tracing::info!("{}/{count} skipped", entry.index + 1);
                stats.stills_skipped += 1;
                continue;
            }

            let frame = match last.take() {
                Some((p, frame)) if p == path => frame,
                _ => {
                    stats.stills_decoded += 1;
                    decode_still(path, plan.resolution, settings.bg_rgba)?
                }
            };
            encoder.write_frame(&frame, entry.frames)?;
            last = Some((path, frame));
            tracing::info!("{}/{count}", entry.index + 1);
        }
    }

    stats.frames_written = encoder.finish()?;
    tracing::info!(
        frames = stats.frames_written,
        decoded = stats.stills_decoded,
        "wrote {}",
        out_path.display()
    );
    Ok(stats)
}

/// Gather the siblings of `picked`, plan the clip and encode it to `out_path`.
pub fn render_to_mp4(
    picked: &Path,
    out_path: &Path,
    opts: &RenderOptions,
    settings: &RenderSettings,
) -> ReelResult<(RenderPlan, RenderStats)> {
    let set = gather_siblings(picked, settings.min_images)?;
    let plan = plan_render(&set, opts, settings)?;
    let stats = render_plan_to_mp4(&plan, out_path, settings)?;
    Ok((plan, stats))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
