use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn unpremul_inverts_premul_for_opaque_and_clear() {
    assert_eq!(unpremul_u8(123, 255), 123);
    assert_eq!(unpremul_u8(50, 0), 0);
    let premul = mul_div255_u8(200, 128);
    assert!((i32::from(unpremul_u8(premul, 128)) - 200).abs() <= 1);
}

#[test]
fn round_half_up_matches_screen_rounding() {
    assert_eq!(round_half_up(0.5), 1);
    assert_eq!(round_half_up(-0.5), 0);
    assert_eq!(round_half_up(-1.5), -1);
    assert_eq!(round_half_up(2.4), 2);
    assert_eq!(round_half_up(-99.6), -100);
}

#[test]
fn opacity_is_clamped_and_quantized() {
    assert_eq!(opacity_u16(-1.0), 0);
    assert_eq!(opacity_u16(0.5), 128);
    assert_eq!(opacity_u16(2.0), 255);
}
