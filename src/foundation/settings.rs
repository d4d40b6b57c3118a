use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::{
    core::Fps,
    error::{ReelError, ReelResult},
};

/// 8 Mbit/s for 1080p streaming, plus 1 Mbit/s because consecutive stills differ a lot.
pub const DEFAULT_BITRATE_KBPS: u32 = 8192 + 1024;

/// One hour of clip by default.
pub const DEFAULT_MAX_DURATION_SECS: f64 = 3600.0;

/// Knobs shared by every render request.
///
/// All fields are optional in JSON; missing ones take the [`Default`] value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Output frame rate.
    pub fps: Fps,
    /// libx264 target bitrate in kbit/s.
    pub bitrate_kbps: u32,
    /// Background colour used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Program name or path of the ffmpeg binary.
    pub ffmpeg: PathBuf,
    /// Fewest matching stills accepted for a clip.
    pub min_images: usize,
    /// Replace an existing output file.
    pub overwrite: bool,
    /// Longest clip, in seconds, a render may ask for.
    pub max_duration_secs: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fps: Fps::NTSC,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
            bg_rgba: [0, 0, 0, 255],
            ffmpeg: PathBuf::from("ffmpeg"),
            min_images: 2,
            overwrite: true,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

impl RenderSettings {
    /// Read settings from a JSON file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open settings '{}'", path.display()))?;
        let settings: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse settings JSON '{}'", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ReelResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.bitrate_kbps == 0 {
            return Err(ReelError::validation("bitrate_kbps must be non-zero"));
        }
        if self.min_images == 0 {
            return Err(ReelError::validation("min_images must be at least 1"));
        }
        if self.ffmpeg.as_os_str().is_empty() {
            return Err(ReelError::validation("ffmpeg program must not be empty"));
        }
        if !self.max_duration_secs.is_finite() || self.max_duration_secs <= 0.0 {
            return Err(ReelError::validation(
                "max_duration_secs must be a positive number of seconds",
            ));
        }
        Ok(())
    }

    /// Reject clip durations above [`RenderSettings::max_duration_secs`].
    pub fn check_duration(&self, secs: f64) -> ReelResult<()> {
        if secs > self.max_duration_secs {
            return Err(ReelError::validation(format!(
                "The duration must be at most {} seconds.",
                self.max_duration_secs
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/settings.rs"]
mod tests;
