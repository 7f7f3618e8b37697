use super::*;
use crate::foundation::core::Rgba8Premul;

fn region(w: u32, h: u32, left: i32) -> CapturedRegion {
    CapturedRegion {
        bitmap: Bitmap::solid(w, h, Rgba8Premul::white()).unwrap(),
        rect: Some(CaptureRect {
            left,
            top: 10,
            width: w,
            height: h,
        }),
    }
}

/// Replays a fixed list of outcomes and records every request it saw.
struct Scripted {
    outcomes: Vec<CaptureOutcome>,
    seen: Vec<CaptureRequest>,
}

impl CaptureSource for Scripted {
    fn capture(&mut self, request: &CaptureRequest) -> CaptureOutcome {
        self.seen.push(*request);
        if self.outcomes.is_empty() {
            CaptureOutcome::Canceled
        } else {
            self.outcomes.remove(0)
        }
    }
}

fn names(deck: &SlideDeck) -> Vec<&str> {
    deck.slides().iter().map(Slide::name).collect()
}

#[test]
fn new_deck_seeds_two_uncaptured_slides() {
    let deck = SlideDeck::new();
    assert_eq!(names(&deck), vec!["A", "B"]);
    assert!(deck.slides().iter().all(|s| !s.is_captured()));
    assert_eq!(deck.state(), DeckState::Idle);
}

#[test]
fn names_fill_gaps_then_fall_back_to_numbers() {
    let mut deck = SlideDeck::new();
    deck.add_slide();
    deck.delete_slide(1).unwrap();
    assert_eq!(names(&deck), vec!["A", "C"]);
    deck.add_slide();
    assert_eq!(names(&deck), vec!["A", "C", "B"]);

    let mut deck = SlideDeck::empty();
    for _ in 0..26 {
        deck.add_slide();
    }
    assert_eq!(deck.slides()[25].name(), "Z");
    deck.add_slide();
    deck.add_slide();
    assert_eq!(deck.slides()[26].name(), "S1");
    assert_eq!(deck.slides()[27].name(), "S2");
}

#[test]
fn rename_trims_and_ignores_blank() {
    let mut deck = SlideDeck::new();
    assert!(deck.rename_slide(0, "  Before ").unwrap());
    assert!(!deck.rename_slide(1, "   ").unwrap());
    assert_eq!(names(&deck), vec!["Before", "B"]);
    assert!(deck.rename_slide(5, "x").is_err());
}

#[test]
fn capture_cycle_reaches_ready() {
    let mut deck = SlideDeck::new();
    let req = deck.begin_capture(0).unwrap();
    assert_eq!(req, CaptureRequest { index: 0, guide: None });
    assert_eq!(deck.state(), DeckState::AwaitingCapture(0));

    assert_eq!(deck.capture_completed(region(10, 8, 5)).unwrap(), 0);
    assert_eq!(deck.state(), DeckState::Idle);

    let req = deck.begin_capture(1).unwrap();
    assert_eq!(req.guide, deck.slides()[0].rect());
    deck.capture_completed(region(10, 8, 7)).unwrap();
    assert_eq!(deck.state(), DeckState::Ready);

    let (bitmaps, names) = deck.build_inputs().unwrap();
    assert_eq!(bitmaps.len(), 2);
    assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn only_one_capture_may_be_pending() {
    let mut deck = SlideDeck::new();
    deck.begin_capture(0).unwrap();
    let err = deck.begin_capture(1).unwrap_err();
    assert!(matches!(err, LoopgifError::Capture(_)));
    assert_eq!(deck.state(), DeckState::AwaitingCapture(0));
}

#[test]
fn failed_and_canceled_captures_clear_pending_without_storing() {
    let mut deck = SlideDeck::new();
    deck.begin_capture(1).unwrap();
    assert_eq!(deck.capture_failed("permission denied"), Some(1));
    assert_eq!(deck.state(), DeckState::Idle);
    assert!(!deck.slides()[1].is_captured());

    deck.begin_capture(0).unwrap();
    assert_eq!(deck.capture_canceled(), Some(0));
    assert!(!deck.slides()[0].is_captured());
    assert!(deck.capture_completed(region(2, 2, 0)).is_err());
}

#[test]
fn deleting_around_a_pending_capture_keeps_it_on_the_same_slide() {
    let mut deck = SlideDeck::new();
    deck.add_slide();
    deck.begin_capture(2).unwrap();
    deck.delete_slide(0).unwrap();
    assert_eq!(deck.state(), DeckState::AwaitingCapture(1));
    deck.capture_completed(region(4, 4, 0)).unwrap();
    assert_eq!(deck.slides()[1].name(), "C");
    assert!(deck.slides()[1].is_captured());
}

#[test]
fn deleting_the_awaited_slide_drops_the_capture() {
    let mut deck = SlideDeck::new();
    deck.begin_capture(1).unwrap();
    deck.delete_slide(1).unwrap();
    assert_eq!(deck.state(), DeckState::Idle);
    assert!(deck.capture_completed(region(4, 4, 0)).is_err());
}

#[test]
fn build_inputs_require_two_captured_slides() {
    let mut deck = SlideDeck::new();
    assert!(deck.build_inputs().unwrap_err().is_empty_input());

    deck.begin_capture(0).unwrap();
    deck.capture_completed(region(4, 4, 0)).unwrap();
    deck.delete_slide(1).unwrap();
    assert_eq!(deck.len(), 1);
    assert!(deck.build_inputs().unwrap_err().is_empty_input());
}

#[test]
fn capture_with_drives_a_source() {
    let mut deck = SlideDeck::new();
    let mut source = Scripted {
        outcomes: vec![
            CaptureOutcome::Completed(region(6, 4, 3)),
            CaptureOutcome::Failed("window closed".to_string()),
            CaptureOutcome::Canceled,
            CaptureOutcome::Completed(region(6, 4, 9)),
        ],
        seen: Vec::new(),
    };

    assert!(deck.capture_with(&mut source, 0).unwrap());
    let err = deck.capture_with(&mut source, 1).unwrap_err();
    assert!(err.to_string().contains("window closed"));
    assert!(!deck.capture_with(&mut source, 1).unwrap());
    assert!(deck.capture_with(&mut source, 1).unwrap());

    assert_eq!(deck.state(), DeckState::Ready);
    assert_eq!(source.seen[0].guide, None);
    assert_eq!(source.seen[1].guide.map(|r| r.left), Some(3));
    assert_eq!(source.seen.len(), 4);
}

#[test]
fn image_file_source_reports_missing_files_as_failures() {
    let mut source = ImageFileSource::new(["target/nowhere/a.png"]);
    let request = CaptureRequest { index: 0, guide: None };
    assert!(matches!(source.capture(&request), CaptureOutcome::Failed(msg) if msg.contains("a.png")));
    let past_end = CaptureRequest { index: 3, guide: None };
    assert_eq!(source.capture(&past_end), CaptureOutcome::Canceled);
}
