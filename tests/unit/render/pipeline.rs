use super::*;
use crate::encode::ffmpeg::is_ffmpeg_on_path;

fn synthetic_set(n: usize) -> ImageSet {
    ImageSet {
        folder: PathBuf::from("stills"),
        extension: "png".to_string(),
        resolution: Resolution::new(16, 16),
        paths: (0..n)
            .map(|i| PathBuf::from(format!("stills/{i:03}.png")))
            .collect(),
    }
}

fn settings_at(fps: u32) -> RenderSettings {
    RenderSettings {
        fps: Fps::new(fps, 1).unwrap(),
        ..RenderSettings::default()
    }
}

#[test]
fn ping_pong_plays_forward_then_backward_over_half_durations() {
    let set = synthetic_set(4);
    let opts = RenderOptions {
        effect: FrameEffect::PingPong,
        duration_secs: 2.0,
        ..RenderOptions::default()
    };
    let plan = plan_render(&set, &opts, &settings_at(30)).unwrap();

    assert_eq!(plan.segments.len(), 2);
    assert_eq!(plan.budget, 30);
    let fwd = &plan.segments[0];
    let rev = &plan.segments[1];
    assert_eq!(fwd.direction, Direction::Forward);
    assert_eq!(rev.direction, Direction::Reverse);
    assert_eq!(fwd.period_secs, 1.0);
    assert_eq!(fwd.images, set.paths);
    let mut reversed = set.paths.clone();
    reversed.reverse();
    assert_eq!(rev.images, reversed);
    assert_eq!(fwd.schedule.total_frames(), 30);
    assert_eq!(plan.total_frames(), 60);
}

#[test]
fn ping_and_pong_use_the_whole_duration() {
    let set = synthetic_set(3);
    for (effect, direction) in [
        (FrameEffect::Ping, Direction::Forward),
        (FrameEffect::Pong, Direction::Reverse),
    ] {
        let opts = RenderOptions {
            effect,
            duration_secs: 3.0,
            ..RenderOptions::default()
        };
        let plan = plan_render(&set, &opts, &settings_at(10)).unwrap();
        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].direction, direction);
        assert_eq!(plan.total_frames(), 30);
    }
}

#[test]
fn oversized_sets_are_thinned_to_the_budget() {
    let set = synthetic_set(50);
    let opts = RenderOptions {
        effect: FrameEffect::Ping,
        duration_secs: 1.0,
        ..RenderOptions::default()
    };
    let plan = plan_render(&set, &opts, &settings_at(10)).unwrap();
    assert_eq!(plan.candidates, 50);
    assert_eq!(plan.budget, 10);
    assert_eq!(plan.segments[0].images.len(), 10);
    assert_eq!(plan.segments[0].images[0], set.paths[0]);
}

#[test]
fn rejects_non_positive_durations() {
    let set = synthetic_set(3);
    for duration_secs in [0.0, -1.0, f64::NAN] {
        let opts = RenderOptions {
            duration_secs,
            ..RenderOptions::default()
        };
        let err = plan_render(&set, &opts, &settings_at(30)).unwrap_err();
        assert!(matches!(err, ReelError::Validation(_)), "{err}");
    }
}

#[test]
fn plan_serializes_for_dry_runs() {
    let plan = plan_render(&synthetic_set(2), &RenderOptions::default(), &settings_at(30)).unwrap();
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["options"]["effect"], "ping-pong");
    assert_eq!(json["segments"][1]["direction"], "reverse");
    assert_eq!(json["resolution"]["width"], 16);
}

#[test]
fn renders_ping_pong_clip_when_ffmpeg_is_present() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }

    let dir = PathBuf::from("target").join("unit_pipeline");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    for (i, shade) in [0u8, 80, 160, 240].into_iter().enumerate() {
        image::RgbaImage::from_pixel(16, 16, image::Rgba([shade, shade, shade, 255]))
            .save_with_format(dir.join(format!("{i}.png")), image::ImageFormat::Png)
            .unwrap();
    }

    let opts = RenderOptions {
        effect: FrameEffect::PingPong,
        duration_secs: 1.0,
        ..RenderOptions::default()
    };
    let out = dir.join("clip.mp4");
    let (plan, stats) =
        render_to_mp4(&dir.join("0.png"), &out, &opts, &RenderSettings::default()).unwrap();

    assert_eq!(stats.segments, 2);
    assert_eq!(stats.frames_written, plan.total_frames());
    assert_eq!(stats.stills_skipped, 0);
    // The turnaround still is decoded once for both passes.
    assert_eq!(stats.stills_decoded, 7);
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn plan_refuses_durations_past_the_limit() {
    let set = synthetic_set(3);
    let opts = RenderOptions {
        duration_secs: 1e300,
        ..RenderOptions::default()
    };
    let err = plan_render(&set, &opts, &settings_at(30)).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)), "{err}");

    let unlimited = RenderSettings {
        max_duration_secs: f64::MAX,
        ..settings_at(30)
    };
    assert!(plan_render(&set, &opts, &unlimited).is_err());
}
