use super::*;

#[test]
fn linear_is_constant() {
    for i in 0..10 {
        assert_eq!(FrameShape::Linear.scalar(i, 10), 1.0);
    }
}

#[test]
fn rounded_endpoints_and_midpoint() {
    let n = 100;
    assert!((FrameShape::Rounded.scalar(0, n) - 1.5).abs() < 1e-9);
    assert!((FrameShape::Rounded.scalar(n / 2, n) - 0.5).abs() < 1e-9);
    // The last image sits just before x = 1.
    assert!((FrameShape::Rounded.scalar(n - 1, n) - 1.5).abs() < 0.01);
}

#[test]
fn rounded_dips_towards_the_middle() {
    let n = 20;
    let a = FrameShape::Rounded.scalar(0, n);
    let b = FrameShape::Rounded.scalar(5, n);
    let c = FrameShape::Rounded.scalar(10, n);
    let d = FrameShape::Rounded.scalar(15, n);
    assert!(a > b);
    assert!(b > c);
    assert!(d > c);
    for i in 0..n {
        let s = FrameShape::Rounded.scalar(i, n);
        assert!((0.5..=1.5).contains(&s), "scalar {s} out of range at {i}");
    }
}

#[test]
fn names_parse_back() {
    for shape in FrameShape::ALL {
        assert_eq!(shape.as_str().parse::<FrameShape>(), Ok(shape));
        assert_eq!(shape.to_string(), shape.as_str());
    }
    assert!("bouncy".parse::<FrameShape>().is_err());
    assert!("Rounded".parse::<FrameShape>().is_err());
}

#[test]
fn serde_uses_lowercase_names() {
    assert_eq!(
        serde_json::to_string(&FrameShape::Rounded).unwrap(),
        "\"rounded\""
    );
    let shape: FrameShape = serde_json::from_str("\"linear\"").unwrap();
    assert_eq!(shape, FrameShape::Linear);
}
