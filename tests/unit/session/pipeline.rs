use super::*;
use crate::encode::gif::GifEncoder;
use crate::foundation::core::Rgba8Premul;

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> Bitmap {
    Bitmap::solid(w, h, Rgba8Premul::from_straight_rgba(rgb[0], rgb[1], rgb[2], 255)).unwrap()
}

#[test]
fn mixed_sizes_are_normalized_to_the_first_slide() {
    let slides = vec![solid(100, 50, [255, 0, 0]), solid(200, 100, [0, 0, 255])];
    let cfg = AnimationConfig::default();
    let timeline = render_timeline(
        &slides,
        &["A".to_string(), "B".to_string()],
        &cfg,
        &mut LabelPainter::without_font(),
    )
    .unwrap();
    assert_eq!(timeline.canvas(), Canvas::new(100, 50).unwrap());
}

#[test]
fn invalid_config_is_rejected_before_any_work() {
    let slides = vec![solid(4, 4, [0, 0, 0]), solid(4, 4, [255, 255, 255])];
    let cfg = AnimationConfig {
        hold_seconds: f64::NAN,
        ..AnimationConfig::default()
    };
    let err = render_timeline(&slides, &[], &cfg, &mut LabelPainter::without_font()).unwrap_err();
    assert!(matches!(err, LoopgifError::Validation(_)));
}

#[test]
fn build_animation_reports_timeline_summary() {
    let slides = vec![solid(100, 100, [255, 0, 0]), solid(100, 100, [0, 0, 255])];
    let cfg = AnimationConfig {
        hold_seconds: 1.0,
        transition_seconds: 0.4,
        ..AnimationConfig::default()
    };
    let animation = build_animation(
        &slides,
        &[],
        &cfg,
        &mut LabelPainter::without_font(),
        &GifEncoder,
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(animation.frame_count, 20);
    assert_eq!(animation.loop_duration_ms, 2900);
    assert_eq!(animation.canvas, Canvas::new(100, 100).unwrap());
    assert_eq!(&animation.bytes[..6], b"GIF89a");
}

#[test]
fn cancelled_build_never_reaches_the_encoder() {
    let slides = vec![solid(4, 4, [0, 0, 0]), solid(4, 4, [255, 255, 255])];
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = build_animation(
        &slides,
        &[],
        &AnimationConfig::default(),
        &mut LabelPainter::without_font(),
        &GifEncoder,
        &cancel,
    )
    .unwrap_err();
    assert!(matches!(err, LoopgifError::EncodingAborted));
}

#[test]
fn labels_off_never_loads_a_font() {
    let painter = label_painter(&AnimationConfig::default(), None).unwrap();
    assert!(!painter.has_font());
}

#[test]
fn fewer_than_two_slides_is_empty_input() {
    let one = vec![solid(8, 8, [255, 0, 0])];
    let err = build_animation(
        &one,
        &["A".to_string()],
        &AnimationConfig::default(),
        &mut LabelPainter::without_font(),
        &GifEncoder,
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(err.is_empty_input(), "{err}");

    let err = render_timeline(
        &[],
        &[],
        &AnimationConfig::default(),
        &mut LabelPainter::without_font(),
    )
    .unwrap_err();
    assert!(err.is_empty_input(), "{err}");
}
