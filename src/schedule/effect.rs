/// Playback direction pattern ("frame effect").
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FrameEffect {
    /// Forward only.
    Ping,
    /// Reverse only.
    Pong,
    /// Forward for half the duration, then reverse for the other half.
    #[default]
    PingPong,
}

/// Direction of one pass over the selected stills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
}

impl FrameEffect {
    pub const ALL: [FrameEffect; 3] = [FrameEffect::Ping, FrameEffect::Pong, FrameEffect::PingPong];

    /// Passes rendered for this effect, in output order.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Self::Ping => &[Direction::Forward],
            Self::Pong => &[Direction::Reverse],
            Self::PingPong => &[Direction::Forward, Direction::Reverse],
        }
    }

    /// Duration of a single pass when the whole clip lasts `duration_secs`.
    pub fn period_secs(self, duration_secs: f64) -> f64 {
        duration_secs / self.directions().len() as f64
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::PingPong => "ping-pong",
        }
    }
}

impl std::fmt::Display for FrameEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FrameEffect {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}
