use super::*;
use crate::foundation::core::{Bitmap, Canvas, Rgba8Premul};
use crate::foundation::error::LoopgifError;
use crate::timeline::FrameRole;

fn two_frame_timeline(w: u32, h: u32) -> Timeline {
    let mut tl = Timeline::new(Canvas::new(w, h).unwrap());
    let red = Rgba8Premul::from_straight_rgba(255, 0, 0, 255);
    let blue = Rgba8Premul::from_straight_rgba(0, 0, 255, 255);
    tl.push(Frame {
        bitmap: Bitmap::solid(w, h, red).unwrap(),
        delay_ms: 1000,
        role: FrameRole::Hold { slide: 0 },
    })
    .unwrap();
    tl.push(Frame {
        bitmap: Bitmap::solid(w, h, blue).unwrap(),
        delay_ms: 50,
        role: FrameRole::Transition {
            from: 0,
            to: 1,
            step: 0,
        },
    })
    .unwrap();
    tl
}

#[test]
fn delays_round_to_centiseconds_with_floor() {
    assert_eq!(delay_centis(1000), 100);
    assert_eq!(delay_centis(50), 5);
    assert_eq!(delay_centis(45), 5);
    assert_eq!(delay_centis(44), 4);
    assert_eq!(delay_centis(0), 2);
    assert_eq!(delay_centis(10), 2);
}

#[test]
fn gif_header_and_logical_screen_match_canvas() {
    let bytes = GifEncoder
        .encode(
            &two_frame_timeline(300, 7),
            &AnimationConfig::default(),
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(&bytes[..6], b"GIF89a");
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 300);
    assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 7);
    assert_eq!(bytes.last(), Some(&0x3B));
}

#[test]
fn gif_declares_infinite_loop_and_frame_delays() {
    let bytes = GifEncoder
        .encode(
            &two_frame_timeline(8, 8),
            &AnimationConfig::default(),
            &CancelToken::new(),
        )
        .unwrap();

    let netscape = bytes
        .windows(11)
        .position(|w| w == b"NETSCAPE2.0")
        .expect("loop extension");
    // Sub-block: size 3, id 1, loop count 0 (= forever).
    assert_eq!(&bytes[netscape + 11..netscape + 15], &[3, 1, 0, 0]);

    let delays: Vec<u16> = bytes
        .windows(4)
        .enumerate()
        .filter(|(_, w)| w[0] == 0x21 && w[1] == 0xF9 && w[2] == 4)
        .map(|(i, _)| u16::from_le_bytes([bytes[i + 4], bytes[i + 5]]))
        .collect();
    assert_eq!(delays, vec![100, 5]);
}

#[test]
fn cancelled_encode_produces_no_bytes() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = GifEncoder
        .encode(&two_frame_timeline(4, 4), &AnimationConfig::default(), &cancel)
        .unwrap_err();
    assert!(matches!(err, LoopgifError::EncodingAborted));
}

#[test]
fn invalid_speed_is_rejected_at_begin() {
    let mut sink = GifSink::in_memory(GifSinkOpts { speed: 0 });
    let err = sink
        .begin(SinkConfig {
            width: 4,
            height: 4,
            repeat: Repeat::Infinite,
        })
        .unwrap_err();
    assert!(matches!(err, LoopgifError::Validation(_)));
}

#[test]
fn push_before_begin_is_an_encoding_error() {
    let tl = two_frame_timeline(4, 4);
    let mut sink = GifSink::in_memory(GifSinkOpts::default());
    let err = sink.push_frame(0, &tl.frames()[0]).unwrap_err();
    assert!(matches!(err, LoopgifError::Encoding(_)));
}

#[test]
fn frame_of_the_wrong_size_is_rejected_not_encoded() {
    let mut sink = GifSink::in_memory(GifSinkOpts::default());
    sink.begin(SinkConfig {
        width: 4,
        height: 4,
        repeat: Repeat::Infinite,
    })
    .unwrap();

    let oversized = two_frame_timeline(8, 8);
    let err = sink.push_frame(0, &oversized.frames()[0]).unwrap_err();
    assert!(matches!(err, LoopgifError::DimensionMismatch(_)), "{err}");

    let fitting = two_frame_timeline(4, 4);
    sink.push_frame(0, &fitting.frames()[0]).unwrap();
    sink.end().unwrap();
    let bytes = sink.into_bytes().unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
}
