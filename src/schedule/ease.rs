/// Per-image screen-time curve ("frame effect shape").
///
/// A shape maps an image's position in a segment to a duration scalar relative to the average
/// screen time of the segment.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FrameShape {
    /// Every image gets the average screen time.
    #[default]
    Linear,
    /// Inverted quartic bell: 1.5x at both ends of the segment, 0.5x at the midpoint.
    Rounded,
}

impl FrameShape {
    pub const ALL: [FrameShape; 2] = [FrameShape::Linear, FrameShape::Rounded];

    /// Duration scalar for image `index` of `count`.
    pub fn scalar(self, index: usize, count: usize) -> f64 {
        match self {
            Self::Linear => 1.0,
            Self::Rounded => {
                if count == 0 {
                    return 1.0;
                }
                // -1 at the first image, 0 at the midpoint.
                let x = (index as f64 / count as f64) * 2.0 - 1.0;
                -(x.powi(4) - 2.0 * x.powi(2)) + 0.5
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Rounded => "rounded",
        }
    }
}

impl std::fmt::Display for FrameShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FrameShape {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/ease.rs"]
mod tests;
