use crate::foundation::error::{ReelError, ReelResult};

/// Most frames one segment may hold, a bit over six days at 29.97 fps.
pub const MAX_SEGMENT_FRAMES: u64 = 1 << 24;

/// Rational frame rate (`num / den` frames per second).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    /// NTSC rate used for MP4 output, 29.97 fps.
    pub const NTSC: Fps = Fps {
        num: 30_000,
        den: 1_001,
    };

    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Check that `secs` is a positive duration whose frames stay within [`MAX_SEGMENT_FRAMES`].
    pub fn check_segment(self, secs: f64) -> ReelResult<()> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ReelError::validation(
                "segment duration must be a positive number of seconds",
            ));
        }
        if secs * self.as_f64() > MAX_SEGMENT_FRAMES as f64 {
            return Err(ReelError::validation(format!(
                "a {secs}s segment at {:.3} fps exceeds {MAX_SEGMENT_FRAMES} frames",
                self.as_f64()
            )));
        }
        Ok(())
    }

    /// Frames covering `secs`, rounded half-to-even.
    pub fn secs_to_frames_round(self, secs: f64) -> i64 {
        (secs * self.as_f64()).round_ties_even() as i64
    }

    /// Whole frames that fit into `secs`.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// `num/den` form understood by ffmpeg's `-r` and filter options.
    pub fn to_ffmpeg_rate(self) -> String {
        format!("{}/{}", self.num, self.den)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self::NTSC
    }
}

/// Pixel dimensions shared by every still of an image set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn rgba8_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
