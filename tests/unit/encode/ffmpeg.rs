use super::*;

fn cfg(width: u32, height: u32) -> EncodeConfig {
    EncodeConfig {
        resolution: Resolution::new(width, height),
        fps: Fps::NTSC,
        out_path: PathBuf::from("target/unit_encode/out.mp4"),
        overwrite: true,
        bitrate_kbps: 9216,
        smoothing: FrameSmoothing::Off,
        program: PathBuf::from("ffmpeg"),
    }
}

fn args_as_strings(cfg: &EncodeConfig) -> Vec<String> {
    cfg.args()
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(cfg(0, 10).validate().is_err());
    assert!(cfg(11, 10).validate().is_err());
    assert!(cfg(10, 10).validate().is_ok());

    let mut c = cfg(10, 10);
    c.fps.num = 0;
    assert!(c.validate().is_err());

    let mut c = cfg(10, 10);
    c.bitrate_kbps = 0;
    assert!(c.validate().is_err());
}

#[test]
fn args_describe_raw_rgba_input_and_h264_output() {
    let args = args_as_strings(&cfg(64, 32));
    let joined = args.join(" ");
    assert!(joined.starts_with("-y "));
    assert!(joined.contains("-f rawvideo -pix_fmt rgba -s 64x32 -r 30000/1001 -i pipe:0"));
    assert!(joined.contains("-c:v libx264 -b:v 9216k -pix_fmt yuv420p"));
    assert!(joined.contains("-movflags +faststart"));
    assert!(!joined.contains("minterpolate"));
    assert_eq!(args.last().unwrap(), "target/unit_encode/out.mp4");
}

#[test]
fn no_overwrite_uses_dash_n() {
    let mut c = cfg(8, 8);
    c.overwrite = false;
    assert_eq!(args_as_strings(&c)[0], "-n");
}

#[test]
fn smoothing_adds_minterpolate_filter() {
    let mut c = cfg(8, 8);
    c.smoothing = FrameSmoothing::Fast;
    let args = args_as_strings(&c);
    let vf = args.iter().position(|a| a == "-vf").unwrap();
    assert_eq!(args[vf + 1], "minterpolate=fps=30000/1001:mi_mode=blend");

    c.smoothing = FrameSmoothing::Quality;
    let args = args_as_strings(&c);
    let vf = args.iter().position(|a| a == "-vf").unwrap();
    assert_eq!(args[vf + 1], "minterpolate=fps=30000/1001:mi_mode=mci");
    // The filter applies to the decoded input, so it sits after `-i`.
    assert!(vf > args.iter().position(|a| a == "-i").unwrap());
}

#[test]
fn smoothing_names_parse_back() {
    for mode in FrameSmoothing::ALL {
        assert_eq!(mode.as_str().parse::<FrameSmoothing>(), Ok(mode));
    }
    assert!("slow".parse::<FrameSmoothing>().is_err());
    assert_eq!(FrameSmoothing::default(), FrameSmoothing::Off);
}

#[test]
fn missing_program_is_an_encode_error() {
    let mut c = cfg(8, 8);
    c.program = PathBuf::from("target/unit_encode/no-such-ffmpeg");
    c.out_path = PathBuf::from("target/unit_encode/missing_program.mp4");
    assert!(!is_ffmpeg_available(&c.program));
    let err = FfmpegEncoder::new(c).err().unwrap();
    assert!(matches!(err, ReelError::Encode(_)), "{err}");
}

#[test]
fn existing_output_is_refused_without_overwrite() {
    let dir = PathBuf::from("target").join("unit_encode");
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("keep_me.mp4");
    std::fs::write(&out, b"old").unwrap();

    let mut c = cfg(8, 8);
    c.overwrite = false;
    c.out_path = out.clone();
    let err = FfmpegEncoder::new(c).err().unwrap();
    assert!(matches!(err, ReelError::Validation(_)), "{err}");
    assert_eq!(std::fs::read(&out).unwrap(), b"old");
}

#[test]
fn encodes_repeated_frames_when_ffmpeg_is_present() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }

    let mut c = cfg(16, 16);
    c.out_path = PathBuf::from("target/unit_encode/solid.mp4");
    let frame = Frame {
        resolution: c.resolution,
        data: vec![200; c.resolution.rgba8_len()],
    };

    let mut enc = FfmpegEncoder::new(c.clone()).unwrap();
    enc.write_frame(&frame, 5).unwrap();
    let wrong = Frame {
        resolution: Resolution::new(2, 2),
        data: vec![0; 16],
    };
    assert!(enc.write_frame(&wrong, 1).is_err());
    assert_eq!(enc.finish().unwrap(), 5);
    assert!(std::fs::metadata(&c.out_path).unwrap().len() > 0);
}

#[cfg(unix)]
#[test]
fn encoder_dying_mid_stream_reports_its_stderr() {
    use std::os::unix::fs::PermissionsExt as _;

    let dir = PathBuf::from("target").join("unit_encode");
    std::fs::create_dir_all(&dir).unwrap();
    // Answers `-version` like ffmpeg, then quits without reading a single frame.
    let program = dir.join("quitting-ffmpeg.sh");
    std::fs::write(
        &program,
        "#!/bin/sh\n[ \"$1\" = \"-version\" ] && exit 0\necho 'cannot open encoder for stream' >&2\nexit 3\n",
    )
    .unwrap();
    std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut c = cfg(16, 16);
    c.program = program;
    c.out_path = dir.join("quitting.mp4");
    let frame = Frame {
        resolution: c.resolution,
        data: vec![7; c.resolution.rgba8_len()],
    };

    let mut enc = FfmpegEncoder::new(c).unwrap();
    // Far more than a pipe buffer holds, so the write hits the closed pipe.
    let err = enc.write_frame(&frame, 4096).unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, ReelError::Encode(_)), "{msg}");
    assert!(msg.contains("cannot open encoder for stream"), "{msg}");
    assert!(enc.frames_written() < 4096);
    assert!(enc.write_frame(&frame, 1).is_err());
}
