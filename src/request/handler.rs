use std::{
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use crate::{
    encode::ffmpeg::FrameSmoothing,
    foundation::{error::ReelError, settings::RenderSettings},
    render::pipeline::{RenderOptions, render_to_mp4},
    request::model::{VideoRequest, VideoResponse},
    schedule::{ease::FrameShape, effect::FrameEffect},
};

const MSG_MISSING_PATH: &str = "The provided path does not exist.";
const MSG_BAD_DURATION: &str = "The duration must be greater than 0.";
const MSG_NOT_ENOUGH: &str = "There are not enough images of that extension and resolution in the current folder to generate a video.";
const MSG_FAILED: &str = "Failed to generate video.";

/// Turns [`VideoRequest`]s into MP4 clips under a served output root.
///
/// Every failure is reported as [`VideoResponse::Error`]; nothing here panics or propagates.
#[derive(Clone, Debug)]
pub struct RequestHandler {
    root: PathBuf,
    settings: RenderSettings,
}

impl RequestHandler {
    pub fn new(root: impl Into<PathBuf>, settings: RenderSettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parse a JSON body and handle it.
    pub fn handle_json(&self, body: &str) -> VideoResponse {
        match serde_json::from_str::<VideoRequest>(body) {
            Ok(req) => self.handle(&req),
            Err(e) => {
                tracing::warn!(error = %e, "malformed video request");
                VideoResponse::error(format!("The request is malformed: {e}"))
            }
        }
    }

    #[tracing::instrument(skip_all, fields(path = req.path.as_str()))]
    pub fn handle(&self, req: &VideoRequest) -> VideoResponse {
        match self.try_handle(req) {
            Ok(video) => VideoResponse::Video { video },
            Err(error) => VideoResponse::Error { error },
        }
    }

    fn try_handle(&self, req: &VideoRequest) -> Result<String, String> {
        let picked = self.resolve(&req.path).ok_or_else(|| {
            tracing::warn!("the provided path '{}' does not exist", req.path);
            MSG_MISSING_PATH.to_string()
        })?;

        let effect = parse_choice::<FrameEffect>(
            &req.frame_effect,
            "frame effect",
            &FrameEffect::ALL.map(FrameEffect::as_str),
        )?;
        let shape = parse_choice::<FrameShape>(
            &req.frame_effect_shape,
            "frame effect shape",
            &FrameShape::ALL.map(FrameShape::as_str),
        )?;
        let smoothing = parse_choice::<FrameSmoothing>(
            &req.frame_smoothing,
            "frame smoothing",
            &FrameSmoothing::ALL.map(FrameSmoothing::as_str),
        )?;
        let duration_secs = req
            .duration
            .as_secs()
            .filter(|secs| *secs > 0.0)
            .ok_or_else(|| {
                tracing::warn!(duration = ?req.duration, "the duration must be greater than 0");
                MSG_BAD_DURATION.to_string()
            })?;
        self.settings
            .check_duration(duration_secs)
            .map_err(|e| {
                tracing::warn!(duration = duration_secs, "{e}");
                match e {
                    ReelError::Validation(detail) => detail,
                    other => other.to_string(),
                }
            })?;

        let out_path = picked.with_extension("mp4");
        if out_path == picked {
            tracing::warn!("refusing to overwrite the picked file with its own clip");
            return Err(MSG_FAILED.to_string());
        }

        let opts = RenderOptions {
            effect,
            shape,
            smoothing,
            duration_secs,
        };
        match render_to_mp4(&picked, &out_path, &opts, &self.settings) {
            Ok(_) => Ok(self.relative_to_root(&out_path)),
            Err(ReelError::NotEnoughImages(detail)) => {
                tracing::warn!("{detail}");
                Err(MSG_NOT_ENOUGH.to_string())
            }
            Err(ReelError::Validation(detail)) => {
                tracing::warn!("{detail}");
                Err(detail)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to generate video from images");
                Err(MSG_FAILED.to_string())
            }
        }
    }

    /// Resolve a request path against the root. Returns `None` for paths that do not name an
    /// existing file or that climb out of the root, symlinks included.
    fn resolve(&self, raw: &str) -> Option<PathBuf> {
        let rel = Path::new(raw);
        if raw.is_empty() || rel.components().any(|c| c == Component::ParentDir) {
            return None;
        }
        let path = if rel.is_absolute() {
            rel.to_path_buf()
        } else {
            self.root.join(rel)
        };
        let root = self.root.canonicalize().ok()?;
        let path = path.canonicalize().ok()?;
        (path.starts_with(&root) && path.is_file()).then_some(path)
    }

    /// Path of `path` below the root with `/` separators, as the UI expects.
    fn relative_to_root(&self, path: &Path) -> String {
        let canonical_root = self.root.canonicalize().ok();
        let rel = canonical_root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .or_else(|| path.strip_prefix(&self.root).ok())
            .unwrap_or(path);
        let joined = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        joined.trim_start_matches('/').to_string()
    }
}

fn parse_choice<T: FromStr>(value: &str, what: &str, allowed: &[&str]) -> Result<T, String> {
    value.parse::<T>().map_err(|_| {
        let list = allowed.join(", ");
        tracing::warn!("the {what} '{value}' is invalid, it must be one of: {list}");
        format!("The {what} must be one of the following: {list}.")
    })
}

#[cfg(test)]
#[path = "../../tests/unit/request/handler.rs"]
mod tests;
