use std::{
    ffi::OsString,
    io::{Read, Write as _},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, ExitStatus, Stdio},
    thread::JoinHandle,
};

use crate::{
    assets::decode::Frame,
    foundation::{
        core::{Fps, Resolution},
        error::{ReelError, ReelResult},
    },
};

/// Motion interpolation requested from ffmpeg's `minterpolate` filter ("frame smoothing").
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FrameSmoothing {
    /// Frames are encoded as scheduled.
    #[default]
    Off,
    /// Blend neighbouring frames.
    Fast,
    /// Motion-compensated interpolation; slow.
    Quality,
}

impl FrameSmoothing {
    pub const ALL: [FrameSmoothing; 3] = [
        FrameSmoothing::Off,
        FrameSmoothing::Fast,
        FrameSmoothing::Quality,
    ];

    /// Video filter for this mode, if any.
    pub fn filter(self, fps: Fps) -> Option<String> {
        let mode = match self {
            Self::Off => return None,
            Self::Fast => "blend",
            Self::Quality => "mci",
        };
        Some(format!(
            "minterpolate=fps={}:mi_mode={mode}",
            fps.to_ffmpeg_rate()
        ))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Fast => "fast",
            Self::Quality => "quality",
        }
    }
}

impl std::fmt::Display for FrameSmoothing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FrameSmoothing {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or(())
    }
}

/// Everything ffmpeg needs to know about one MP4 output.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub resolution: Resolution,
    pub fps: Fps,
    pub out_path: PathBuf,
    pub overwrite: bool,
    pub bitrate_kbps: u32,
    pub smoothing: FrameSmoothing,
    /// Program name or path of the ffmpeg binary.
    pub program: PathBuf,
}

impl EncodeConfig {
    pub fn validate(&self) -> ReelResult<()> {
        let Resolution { width, height } = self.resolution;
        if width == 0 || height == 0 {
            return Err(ReelError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(ReelError::validation("encode fps must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            // yuv420p subsamples chroma 2x2.
            return Err(ReelError::validation(format!(
                "encode width/height must be even for yuv420p mp4 output, got {}",
                self.resolution
            )));
        }
        if self.bitrate_kbps == 0 {
            return Err(ReelError::validation("encode bitrate must be non-zero"));
        }
        Ok(())
    }

    /// Command-line arguments passed to ffmpeg, output path last.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let mut push = |s: &str| args.push(s.into());

        push(if self.overwrite { "-y" } else { "-n" });
        for a in ["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba", "-s"] {
            push(a);
        }
        push(&self.resolution.to_string());
        // Input rate goes before `-i` for rawvideo.
        push("-r");
        push(&self.fps.to_ffmpeg_rate());
        for a in ["-i", "pipe:0", "-an"] {
            push(a);
        }
        if let Some(filter) = self.smoothing.filter(self.fps) {
            push("-vf");
            push(&filter);
        }
        for a in ["-c:v", "libx264", "-b:v"] {
            push(a);
        }
        push(&format!("{}k", self.bitrate_kbps));
        for a in [
            "-pix_fmt",
            "yuv420p",
            "-threads",
            "0",
            "-movflags",
            "+faststart",
        ] {
            push(a);
        }
        args.push(self.out_path.clone().into_os_string());
        args
    }
}

/// Return `true` when `program -version` runs successfully.
pub fn is_ffmpeg_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_ffmpeg_available(Path::new("ffmpeg"))
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams raw RGBA8 frames into a system `ffmpeg` process that writes an H.264 MP4.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    frames_written: u64,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig) -> ReelResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if cfg.out_path.exists() {
            if !cfg.overwrite {
                return Err(ReelError::validation(format!(
                    "output file '{}' already exists",
                    cfg.out_path.display()
                )));
            }
            use anyhow::Context as _;
            std::fs::remove_file(&cfg.out_path).with_context(|| {
                format!("remove previous output '{}'", cfg.out_path.display())
            })?;
        }

        if !is_ffmpeg_available(&cfg.program) {
            return Err(ReelError::encode(format!(
                "ffmpeg is required for MP4 encoding, but '{}' could not be run",
                cfg.program.display()
            )));
        }

        tracing::debug!(program = %cfg.program.display(), args = ?cfg.args(), "spawning ffmpeg");
        let mut child = Command::new(&cfg.program)
            .args(cfg.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ReelError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        Ok(Self {
            cfg,
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
            frames_written: 0,
        })
    }

    pub fn config(&self) -> &EncodeConfig {
        &self.cfg
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Write `frame` to the pipe `repeat` times.
    pub fn write_frame(&mut self, frame: &Frame, repeat: u64) -> ReelResult<()> {
        if frame.resolution != self.cfg.resolution {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}, expected {}",
                frame.resolution, self.cfg.resolution
            )));
        }
        if frame.data.len() != self.cfg.resolution.rgba8_len() {
            return Err(ReelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encode("ffmpeg encoder is already finalized"));
        };

        let mut write_err = None;
        for _ in 0..repeat {
            if let Err(e) = stdin.write_all(&frame.data) {
                write_err = Some(e);
                break;
            }
            self.frames_written += 1;
        }

        // A write only fails once ffmpeg is gone; its stderr says why.
        if let Some(e) = write_err {
            let cause = match self.reap() {
                Ok((status, stderr)) => format!("ffmpeg exited with status {status}: {stderr}"),
                Err(reap_err) => reap_err.to_string(),
            };
            return Err(ReelError::encode(format!(
                "failed to write frame to ffmpeg stdin: {e}; {cause}"
            )));
        }
        Ok(())
    }

    /// Close the pipe and wait for ffmpeg to finish writing the file.
    pub fn finish(mut self) -> ReelResult<u64> {
        let (status, stderr) = self.reap()?;
        if !status.success() {
            return Err(ReelError::encode(format!(
                "ffmpeg exited with status {status}: {stderr}"
            )));
        }
        Ok(self.frames_written)
    }

    /// Close stdin, wait for the child and collect its trimmed stderr.
    fn reap(&mut self) -> ReelResult<(ExitStatus, String)> {
        drop(self.stdin.take());

        let status = self.child.wait().map_err(|e| {
            ReelError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        Ok((status, String::from_utf8_lossy(&stderr_bytes).trim().to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
