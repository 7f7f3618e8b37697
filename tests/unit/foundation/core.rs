use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(Canvas::new(3, 2).unwrap().rgba_len().unwrap(), 24);
}

#[test]
fn bitmap_validates_buffer_length() {
    assert!(Bitmap::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    let bmp = Bitmap::from_premul_rgba8(2, 2, vec![7; 16]).unwrap();
    assert_eq!(bmp.pixel(1, 1), Some([7, 7, 7, 7]));
    assert_eq!(bmp.pixel(2, 0), None);
}

#[test]
fn straight_rgba_is_premultiplied_and_restored() {
    let bmp = Bitmap::from_straight_rgba8(1, 1, vec![200, 100, 50, 128]).unwrap();
    let px = bmp.pixel(0, 0).unwrap();
    assert_eq!(px[3], 128);
    assert_eq!(px[0], ((200u16 * 128 + 127) / 255) as u8);

    let back = bmp.to_straight_rgba8();
    assert!((i32::from(back[0]) - 200).abs() <= 1);
    assert!((i32::from(back[1]) - 100).abs() <= 1);
    assert!((i32::from(back[2]) - 50).abs() <= 1);
}

#[test]
fn clones_share_pixels() {
    let a = Bitmap::solid(4, 4, Rgba8Premul::white()).unwrap();
    let b = a.clone();
    assert!(a.shares_pixels(&b));
    let c = Bitmap::solid(4, 4, Rgba8Premul::white()).unwrap();
    assert_eq!(a, c);
    assert!(!a.shares_pixels(&c));
}

#[test]
fn color_parsing_accepts_hex_and_names() {
    assert_eq!(Rgba8Premul::parse("white").unwrap(), Rgba8Premul::white());
    assert_eq!(
        Rgba8Premul::parse("#111827").unwrap().to_array(),
        [0x11, 0x18, 0x27, 255]
    );
    let half = Rgba8Premul::parse("#ff000080").unwrap();
    assert_eq!(half.a, 0x80);
    assert_eq!(half.r, 0x80);
    assert!(Rgba8Premul::parse("#12").is_err());
    assert!(Rgba8Premul::parse("chartreuse").is_err());
}
