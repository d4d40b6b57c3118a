//! stillreel turns a folder of same-size stills into a short MP4 clip.
//!
//! The crate owns the small amount of logic that decides *which* stills are shown and *for how
//! long*; decoding is left to the `image` crate and encoding to the system `ffmpeg` binary.
//!
//! # Pipeline overview
//!
//! 1. **Gather**: picked still → sibling stills with the same extension and resolution, oldest
//!    first ([`gather_siblings`]).
//! 2. **Plan**: thin the stills to the frame budget of one segment, lay out forward/reverse
//!    segments for the [`FrameEffect`] and schedule per-still frame counts with a
//!    [`FrameShape`] ([`plan_render`]).
//! 3. **Encode**: decode each scheduled still once and stream it into `ffmpeg` as raw RGBA8,
//!    optionally asking for `minterpolate` [`FrameSmoothing`] ([`render_plan_to_mp4`]).
//!
//! [`RequestHandler`] wraps the whole pipeline behind the JSON request/response pair used by the
//! web UI and never fails: every problem becomes an `{"error": ...}` response.
#![forbid(unsafe_code)]

mod assets;
mod encode;
mod foundation;
mod render;
mod request;
mod schedule;

pub use assets::decode::{Frame, decode_still, decode_still_bytes};
pub use assets::gather::{ImageSet, gather_siblings, probe_resolution};
pub use encode::ffmpeg::{
    EncodeConfig, FfmpegEncoder, FrameSmoothing, ensure_parent_dir, is_ffmpeg_available,
    is_ffmpeg_on_path,
};
pub use foundation::core::{Fps, Resolution};
pub use foundation::error::{ReelError, ReelResult};
pub use foundation::settings::{DEFAULT_BITRATE_KBPS, RenderSettings};
pub use render::pipeline::{
    RenderOptions, RenderPlan, RenderStats, Segment, plan_render, render_plan_to_mp4,
    render_to_mp4,
};
pub use request::handler::RequestHandler;
pub use request::model::{DurationField, VideoRequest, VideoResponse};
pub use schedule::ease::FrameShape;
pub use schedule::effect::{Direction, FrameEffect};
pub use schedule::plan::{FrameSchedule, ScheduleEntry, schedule_frames};
pub use schedule::select::{downselect, image_budget};
