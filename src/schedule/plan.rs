use crate::{
    foundation::{
        core::Fps,
        error::{ReelError, ReelResult},
    },
    schedule::ease::FrameShape,
};

/// Repeat count of one still within a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScheduleEntry {
    /// Position of the still in the segment's ordered image list.
    pub index: usize,
    /// Number of output frames showing the still. Zero means the still is skipped.
    pub frames: u64,
}

impl ScheduleEntry {
    pub fn is_skipped(&self) -> bool {
        self.frames == 0
    }
}

/// Frame counts for every still of a segment.
///
/// The counts always add up to [`FrameSchedule::target_frames`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameSchedule {
    pub entries: Vec<ScheduleEntry>,
    pub target_frames: u64,
}

impl FrameSchedule {
    pub fn total_frames(&self) -> u64 {
        self.entries.iter().map(|e| e.frames).sum()
    }

    pub fn scheduled(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter().filter(|e| !e.is_skipped())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter().filter(|e| e.is_skipped())
    }
}

/// Spread `round(fps * duration_secs)` frames over `image_count` stills.
///
/// Each still gets `round(fps * avg * shape.scalar(i, n))` frames, where `avg` is the even share
/// of the duration. The last still takes whatever is left of the target, which absorbs the
/// rounding error; if earlier stills already overshoot the target, the last still is skipped and
/// the surplus is taken back from the tail.
#[tracing::instrument(level = "debug")]
pub fn schedule_frames(
    image_count: usize,
    duration_secs: f64,
    fps: Fps,
    shape: FrameShape,
) -> ReelResult<FrameSchedule> {
    if image_count == 0 {
        return Err(ReelError::validation("cannot schedule an empty image set"));
    }
    fps.check_segment(duration_secs)?;

    let target = fps.secs_to_frames_round(duration_secs);
    if target <= 0 {
        return Err(ReelError::validation(format!(
            "a {duration_secs}s segment at {:.3} fps holds no frames",
            fps.as_f64()
        )));
    }

    let avg_secs = duration_secs / image_count as f64;
    let mut counts = Vec::with_capacity(image_count);
    let mut total = 0i64;

    for i in 0..image_count {
        let frames = if i == image_count - 1 {
            target - total
        } else {
            fps.secs_to_frames_round(avg_secs * shape.scalar(i, image_count))
        };

        if frames <= 0 {
            tracing::debug!(image = i + 1, of = image_count, "no frames left, skipping still");
            counts.push(0);
            continue;
        }

        total = total
            .checked_add(frames)
            .ok_or_else(|| ReelError::validation("segment frame count overflows"))?;
        counts.push(frames);
    }

    let mut surplus = total - target;
    if surplus > 0 {
        tracing::debug!(surplus, "schedule overshoots target, trimming from the tail");
    }
    for frames in counts.iter_mut().rev() {
        if surplus <= 0 {
            break;
        }
        let cut = (*frames).min(surplus);
        *frames -= cut;
        surplus -= cut;
    }

    let schedule = FrameSchedule {
        entries: counts
            .into_iter()
            .enumerate()
            .map(|(index, frames)| ScheduleEntry {
                index,
                frames: frames as u64,
            })
            .collect(),
        target_frames: target as u64,
    };
    debug_assert_eq!(schedule.total_frames(), schedule.target_frames);
    Ok(schedule)
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/plan.rs"]
mod tests;
