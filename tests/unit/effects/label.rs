use super::*;
use crate::foundation::core::Rgba8Premul;

struct Constant(f64);

impl TextMeasure for Constant {
    fn text_width(&mut self, _text: &str, _font_px: u32) -> f64 {
        self.0
    }
}

struct HalfEm {
    calls: usize,
}

impl TextMeasure for HalfEm {
    fn text_width(&mut self, text: &str, font_px: u32) -> f64 {
        self.calls += 1;
        text.chars().count() as f64 * f64::from(font_px) * 0.5
    }
}

fn black(w: u32, h: u32) -> Bitmap {
    Bitmap::solid(w, h, Rgba8Premul::from_straight_rgba(0, 0, 0, 255)).unwrap()
}

#[test]
fn badge_width_has_minimum() {
    let layout = fit_badge(100, 50, "A", &mut Constant(1.0));
    assert_eq!(layout.width, MIN_BADGE_WIDTH);
    assert_eq!((layout.x, layout.y), (BADGE_INSET, BADGE_INSET));
}

#[test]
fn font_shrinks_to_floor_when_text_is_wide() {
    let layout = fit_badge(200, 100, "A", &mut Constant(9.0));
    assert_eq!(
        layout,
        BadgeLayout {
            x: 4,
            y: 4,
            width: 12,
            height: 12,
            font_px: 8,
            padding: 2,
        }
    );
}

#[test]
fn font_shrinks_until_text_fits() {
    let mut m = HalfEm { calls: 0 };
    let layout = fit_badge(1000, 400, "Before", &mut m);
    assert_eq!(layout.width, 50);
    assert_eq!(layout.font_px, 8);
    assert_eq!(layout.padding, 2);
    assert_eq!(layout.height, 12);
    assert_eq!(m.calls, 2);
}

#[test]
fn text_that_fits_keeps_initial_guess() {
    let layout = fit_badge(1000, 400, "i", &mut HalfEm { calls: 0 });
    assert_eq!(layout.font_px, 48);
    assert_eq!(layout.padding, 12);
    assert_eq!(layout.height, 72);
}

#[test]
fn fitting_never_exceeds_iteration_budget() {
    struct Stubborn {
        calls: usize,
    }
    impl TextMeasure for Stubborn {
        fn text_width(&mut self, _text: &str, font_px: u32) -> f64 {
            self.calls += 1;
            f64::from(font_px) * 10.0
        }
    }
    let mut m = Stubborn { calls: 0 };
    let layout = fit_badge(1000, 1000, "wide", &mut m);
    assert!(m.calls <= MAX_FIT_ITERATIONS);
    assert_eq!(layout.font_px, MIN_FONT_PX);
}

#[test]
fn fitting_is_deterministic() {
    let a = fit_badge(640, 480, "After", &mut FixedAdvance::default());
    let b = fit_badge(640, 480, "After", &mut FixedAdvance::default());
    assert_eq!(a, b);
}

#[test]
fn blank_text_is_a_true_noop() {
    let mut painter = LabelPainter::without_font();
    let bmp = black(64, 32);
    assert!(painter.overlay(&bmp, "").unwrap().shares_pixels(&bmp));
    assert!(painter.overlay(&bmp, "   ").unwrap().shares_pixels(&bmp));

    let direct = painter.overlay(&bmp, "X").unwrap();
    let blank = painter.overlay(&bmp, "").unwrap();
    let chained = painter.overlay(&blank, "X").unwrap();
    assert_eq!(direct, chained);
}

#[test]
fn badge_is_drawn_top_left_without_font() {
    let mut painter = LabelPainter::without_font();
    assert!(!painter.has_font());
    let bmp = black(400, 200);
    let layout = painter.layout(400, 200, "B");
    assert_eq!((layout.width, layout.height), (20, 24));

    let out = painter.overlay(&bmp, "B").unwrap();
    assert_eq!(out.canvas(), bmp.canvas());

    let inside = out.pixel(10, 10).unwrap();
    assert!((i32::from(inside[0]) - 217).abs() <= 2, "{inside:?}");
    assert_eq!(inside[3], 255);

    assert_eq!(out.pixel(2, 2), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(30, 10), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(10, 30), Some([0, 0, 0, 255]));
}
