use std::collections::HashSet;
use std::path::PathBuf;

use crate::assets::decode::load_bitmap;
use crate::foundation::core::{Bitmap, CaptureRect};
use crate::foundation::error::{LoopgifError, LoopgifResult};

const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// One named slot in the deck, possibly not captured yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slide {
    name: String,
    bitmap: Option<Bitmap>,
    rect: Option<CaptureRect>,
}

impl Slide {
    fn named(name: String) -> Self {
        Self {
            name,
            bitmap: None,
            rect: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    /// Screen rectangle of the last capture, if the source reported one.
    pub fn rect(&self) -> Option<CaptureRect> {
        self.rect
    }

    pub fn is_captured(&self) -> bool {
        self.bitmap.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeckState {
    /// Nothing pending and not enough captured slides to build.
    Idle,
    /// Waiting on the capture source for the slide at this index.
    AwaitingCapture(usize),
    /// At least two slides, all captured.
    Ready,
}

/// What the capture source is asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureRequest {
    pub index: usize,
    /// Bounds of the previous slide's capture, offered as a starting selection.
    pub guide: Option<CaptureRect>,
}

/// Pixels and bounds delivered by a successful capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedRegion {
    pub bitmap: Bitmap,
    pub rect: Option<CaptureRect>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    Completed(CapturedRegion),
    Failed(String),
    Canceled,
}

/// Anything that can hand back a region of the screen (or a stand-in for one).
pub trait CaptureSource {
    fn capture(&mut self, request: &CaptureRequest) -> CaptureOutcome;
}

/// Capture source that serves slide `i` from the `i`-th image file.
#[derive(Clone, Debug, Default)]
pub struct ImageFileSource {
    paths: Vec<PathBuf>,
}

impl ImageFileSource {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl CaptureSource for ImageFileSource {
    fn capture(&mut self, request: &CaptureRequest) -> CaptureOutcome {
        let Some(path) = self.paths.get(request.index) else {
            return CaptureOutcome::Canceled;
        };
        match load_bitmap(path) {
            Ok(bitmap) => CaptureOutcome::Completed(CapturedRegion {
                rect: Some(CaptureRect {
                    left: 0,
                    top: 0,
                    width: bitmap.width(),
                    height: bitmap.height(),
                }),
                bitmap,
            }),
            Err(err) => CaptureOutcome::Failed(format!("{err:#}")),
        }
    }
}

/// Ordered, named slides plus the single capture that may be in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideDeck {
    slides: Vec<Slide>,
    pending: Option<usize>,
}

impl Default for SlideDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideDeck {
    /// Deck seeded with two uncaptured slides, `A` and `B`.
    pub fn new() -> Self {
        let mut deck = Self::empty();
        deck.add_slide();
        deck.add_slide();
        deck
    }

    /// Deck with no slides at all.
    pub fn empty() -> Self {
        Self {
            slides: Vec::new(),
            pending: None,
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn state(&self) -> DeckState {
        match self.pending {
            Some(i) => DeckState::AwaitingCapture(i),
            None if self.is_ready() => DeckState::Ready,
            None => DeckState::Idle,
        }
    }

    /// `true` when a build can start: at least two slides and every one captured.
    pub fn is_ready(&self) -> bool {
        self.slides.len() >= 2 && self.slides.iter().all(Slide::is_captured)
    }

    /// Append an uncaptured slide and return its index.
    ///
    /// Names take the first unused letter `A..Z`, then `S1`, `S2`, ...
    pub fn add_slide(&mut self) -> usize {
        let name = self.next_name();
        tracing::debug!(%name, "add slide");
        self.slides.push(Slide::named(name));
        self.slides.len() - 1
    }

    fn next_name(&self) -> String {
        let used: HashSet<&str> = self.slides.iter().map(|s| s.name.as_str()).collect();
        LETTERS
            .chars()
            .map(String::from)
            .chain((1u32..).map(|n| format!("S{n}")))
            .find(|name| !used.contains(name.as_str()))
            .unwrap_or_default()
    }

    /// Remove the slide at `index`. A capture pending for it is dropped.
    pub fn delete_slide(&mut self, index: usize) -> LoopgifResult<Slide> {
        self.check_index(index)?;
        self.pending = match self.pending {
            Some(p) if p == index => {
                tracing::debug!(index, "deleted slide had a pending capture; dropping it");
                None
            }
            Some(p) if p > index => Some(p - 1),
            other => other,
        };
        Ok(self.slides.remove(index))
    }

    /// Rename a slide. The name is trimmed; a blank name leaves the slide unchanged.
    ///
    /// Returns whether the name changed.
    pub fn rename_slide(&mut self, index: usize, name: &str) -> LoopgifResult<bool> {
        self.check_index(index)?;
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        self.slides[index].name = name.to_string();
        Ok(true)
    }

    /// Start capturing slide `index`. Only one capture may be pending at a time.
    pub fn begin_capture(&mut self, index: usize) -> LoopgifResult<CaptureRequest> {
        if let Some(pending) = self.pending {
            return Err(LoopgifError::capture(format!(
                "capture for slide {pending} is still pending"
            )));
        }
        self.check_index(index)?;
        let guide = index
            .checked_sub(1)
            .and_then(|prev| self.slides[prev].rect);
        self.pending = Some(index);
        Ok(CaptureRequest { index, guide })
    }

    /// Store a delivered region on the awaited slide and return its index.
    pub fn capture_completed(&mut self, region: CapturedRegion) -> LoopgifResult<usize> {
        let index = self
            .pending
            .take()
            .ok_or_else(|| LoopgifError::capture("no capture is pending"))?;
        let slide = &mut self.slides[index];
        slide.bitmap = Some(region.bitmap);
        slide.rect = region.rect;
        tracing::debug!(index, name = %slide.name, "slide captured");
        Ok(index)
    }

    /// Clear the pending capture after a failure. Returns the index that was awaited.
    pub fn capture_failed(&mut self, reason: &str) -> Option<usize> {
        let index = self.pending.take();
        tracing::warn!(?index, reason, "capture failed");
        index
    }

    /// Clear the pending capture after the user backed out.
    pub fn capture_canceled(&mut self) -> Option<usize> {
        let index = self.pending.take();
        tracing::debug!(?index, "capture canceled");
        index
    }

    /// Run a full capture cycle for slide `index` against `source`.
    ///
    /// `Ok(true)` when the slide was captured, `Ok(false)` when the capture was canceled.
    pub fn capture_with(
        &mut self,
        source: &mut dyn CaptureSource,
        index: usize,
    ) -> LoopgifResult<bool> {
        let request = self.begin_capture(index)?;
        match source.capture(&request) {
            CaptureOutcome::Completed(region) => self.capture_completed(region).map(|_| true),
            CaptureOutcome::Failed(reason) => {
                self.capture_failed(&reason);
                Err(LoopgifError::capture(reason))
            }
            CaptureOutcome::Canceled => {
                self.capture_canceled();
                Ok(false)
            }
        }
    }

    /// Bitmaps and names in slide order, ready for a build.
    pub fn build_inputs(&self) -> LoopgifResult<(Vec<Bitmap>, Vec<String>)> {
        if !self.is_ready() {
            let missing = self.slides.iter().filter(|s| !s.is_captured()).count();
            return Err(LoopgifError::empty_input(format!(
                "need at least 2 captured slides ({} slides, {missing} not captured)",
                self.slides.len()
            )));
        }
        Ok(self
            .slides
            .iter()
            .filter_map(|s| Some((s.bitmap.clone()?, s.name.clone())))
            .unzip())
    }

    fn check_index(&self, index: usize) -> LoopgifResult<()> {
        if index >= self.slides.len() {
            return Err(LoopgifError::validation(format!(
                "slide index {index} out of range (deck has {})",
                self.slides.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/deck.rs"]
mod tests;
