use super::*;
use crate::foundation::core::Rgba8Premul;

fn solid(w: u32, h: u32) -> Bitmap {
    Bitmap::solid(w, h, Rgba8Premul::from_straight_rgba(40, 80, 120, 255)).unwrap()
}

#[test]
fn scale_percent_is_clamped() {
    assert_eq!(ScalePercent::new(5.0).percent(), 10.0);
    assert_eq!(ScalePercent::new(500.0).percent(), 200.0);
    assert_eq!(ScalePercent::new(150.0).factor(), 1.5);
    assert_eq!(ScalePercent::new(f64::NAN).percent(), 100.0);
    assert_eq!(ScalePercent::default().percent(), 100.0);
}

#[test]
fn scale_percent_deserializes_with_clamp() {
    let s: ScalePercent = serde_json::from_str("500").unwrap();
    assert_eq!(s.percent(), 200.0);
}

#[test]
fn normalize_empty_is_error() {
    let err = normalize(&[], ScalePercent::default()).unwrap_err();
    assert!(err.is_empty_input());
}

#[test]
fn normalize_resizes_to_first_bitmap() {
    let out = normalize(&[solid(100, 50), solid(200, 100)], ScalePercent::default()).unwrap();
    assert_eq!(out.len(), 2);
    for bmp in &out {
        assert_eq!((bmp.width(), bmp.height()), (100, 50));
    }
}

#[test]
fn normalize_applies_uniform_scale() {
    let out = normalize(&[solid(100, 50), solid(200, 100)], ScalePercent::new(150.0)).unwrap();
    for bmp in &out {
        assert_eq!((bmp.width(), bmp.height()), (150, 75));
    }
}

#[test]
fn normalize_does_not_preserve_aspect() {
    let out = normalize(&[solid(40, 40), solid(10, 80)], ScalePercent::default()).unwrap();
    assert_eq!((out[1].width(), out[1].height()), (40, 40));
    // Solid input stays solid after stretching.
    let a = out[0].pixel(20, 20).unwrap();
    let b = out[1].pixel(20, 20).unwrap();
    for c in 0..4 {
        assert!((i32::from(a[c]) - i32::from(b[c])).abs() <= 1);
    }
}

#[test]
fn unchanged_size_is_passthrough() {
    let a = solid(30, 20);
    let out = normalize(std::slice::from_ref(&a), ScalePercent::default()).unwrap();
    assert!(out[0].shares_pixels(&a));
}

#[test]
fn scaled_canvas_has_one_pixel_floor() {
    let c = scaled_canvas(
        Canvas {
            width: 3,
            height: 1,
        },
        ScalePercent::new(10.0),
    );
    assert_eq!((c.width, c.height), (1, 1));
}
