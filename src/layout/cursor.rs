use super::margins::Margins;
use crate::backend::Backend;
use crate::error::{LayoutWarning, RenderError};
use crate::pagesize::{PageSize, A4};
use crate::units::Pt;
use serde::Deserialize;

/// The fixed shape of every page in a document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: Pt,
    pub height: Pt,
    pub margins: Margins,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::new(A4, Margins::report())
    }
}

impl PageGeometry {
    pub fn new(size: PageSize, margins: Margins) -> PageGeometry {
        PageGeometry {
            width: size.0,
            height: size.1,
            margins,
        }
    }

    /// The lowest point (in layout space) a block may reach
    pub fn bottom_limit(&self) -> Pt {
        self.height - self.margins.bottom
    }

    /// The vertical space between the margins of one page
    pub fn usable_height(&self) -> Pt {
        self.bottom_limit() - self.margins.top
    }

    pub fn content_width(&self) -> Pt {
        self.width - self.margins.left - self.margins.right
    }
}

/// Tracks the vertical position on the current page and decides where page breaks
/// fall. Every block is placed with the break-then-draw policy: if it doesn't fit
/// above the bottom margin, the page is broken first and the block starts at the
/// top of the next one. Blocks are never split.
#[derive(Debug)]
pub struct PageCursor {
    geometry: PageGeometry,
    cursor_y: Pt,
    page_index: usize,
    /// The end of a run of blocks, starting at the page top, that must share a
    /// page with whatever is placed next
    kept_until: Option<Pt>,
    warnings: Vec<LayoutWarning>,
}

impl PageCursor {
    pub fn new(geometry: PageGeometry) -> PageCursor {
        PageCursor {
            cursor_y: geometry.margins.top,
            geometry,
            page_index: 0,
            kept_until: None,
            warnings: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// The current vertical position, measured down from the top of the page
    pub fn cursor_y(&self) -> Pt {
        self.cursor_y
    }

    /// 0-based index of the page being filled
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.page_index + 1
    }

    /// Space left above the bottom margin on the current page
    pub fn remaining(&self) -> Pt {
        self.geometry.bottom_limit() - self.cursor_y
    }

    /// Whether nothing has been placed on the current page yet
    pub fn at_page_top(&self) -> bool {
        self.cursor_y == self.geometry.margins.top
    }

    /// Whether a block of `height` fits before the bottom margin
    pub fn reserve(&self, height: Pt) -> bool {
        self.cursor_y + height <= self.geometry.bottom_limit()
    }

    pub fn advance(&mut self, height: Pt) {
        self.cursor_y += height;
    }

    /// Finish the current page and move to the top of a fresh one
    pub fn break_page<B: Backend + ?Sized>(&mut self, backend: &mut B) -> Result<(), RenderError> {
        backend.page_break()?;
        self.cursor_y = self.geometry.margins.top;
        self.page_index += 1;
        self.kept_until = None;
        log::debug!("page break, now on page {}", self.page_count());
        Ok(())
    }

    /// Whether everything on the current page is bound to the next block
    fn held(&self) -> bool {
        self.kept_until == Some(self.cursor_y)
    }

    /// Whether a block of `height` is taller than a whole page
    pub fn oversized(&self, height: Pt) -> bool {
        height > self.geometry.usable_height()
    }

    /// Break the page if a block of `height` won't fit on it. A page that is still
    /// empty is never broken, since the block would not fit on the next one either.
    /// Nor is a page holding only blocks kept with this one, when this block is
    /// taller than a page anyway; a block that would fit a fresh page still moves
    /// there and leaves the kept blocks behind.
    /// Returns whether a break happened.
    pub fn ensure<B: Backend + ?Sized>(&mut self, height: Pt, backend: &mut B) -> Result<bool, RenderError> {
        if self.reserve(height) || self.at_page_top() {
            return Ok(false);
        }
        if self.held() && self.oversized(height) {
            return Ok(false);
        }
        self.break_page(backend)?;
        Ok(true)
    }

    /// Claim `height` at the current position without breaking, returning the top
    /// of the claimed block. A block taller than a whole page is recorded as an
    /// overflow.
    pub fn claim(&mut self, height: Pt) -> Pt {
        let top = self.cursor_y;
        if !self.reserve(height) {
            let available = self.remaining();
            log::warn!(
                "block of height {height} runs past the bottom of page {} ({available} left)",
                self.page_count()
            );
            if self.oversized(height) {
                self.warnings.push(LayoutWarning::Overflow {
                    page_index: self.page_index,
                    height,
                    available,
                });
            }
        }
        self.advance(height);
        self.kept_until = None;
        top
    }

    /// Claim a block that must stay on the same page as the next one, such as a
    /// title or a column header. If it opens the page, a next block taller than a
    /// whole page is placed beneath it rather than on a page of its own.
    pub fn claim_kept(&mut self, height: Pt) -> Pt {
        let opens_page = self.at_page_top() || self.held();
        let top = self.claim(height);
        if opens_page {
            self.kept_until = Some(self.cursor_y);
        }
        top
    }

    /// Break-then-draw: make room for a block of `height` and claim it
    pub fn place<B: Backend + ?Sized>(&mut self, height: Pt, backend: &mut B) -> Result<Pt, RenderError> {
        self.ensure(height, backend)?;
        Ok(self.claim(height))
    }

    /// Hand over the warnings gathered so far
    pub fn take_warnings(&mut self) -> Vec<LayoutWarning> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RecordedEvent, Recorder};

    fn geometry() -> PageGeometry {
        PageGeometry {
            width: Pt(595.0),
            height: Pt(300.0),
            margins: Margins::trbl(Pt(20.0), Pt(25.0), Pt(40.0), Pt(25.0)),
        }
    }

    #[test]
    fn geometry_derivations() {
        let g = geometry();
        assert_eq!(g.bottom_limit(), Pt(260.0));
        assert_eq!(g.usable_height(), Pt(240.0));
        assert_eq!(g.content_width(), Pt(545.0));
    }

    #[test]
    fn geometry_from_paper_sizes() {
        use crate::pagesize::{PageOrientation, F4, LETTER};

        let folio = PageGeometry::new(F4, Margins::report());
        assert!(folio.usable_height() > PageGeometry::default().usable_height());
        let landscape = PageGeometry::new(LETTER.landscape(), Margins::report());
        assert_eq!(landscape.width, Pt(792.0));
        assert_eq!(landscape.content_width(), Pt(742.0));
    }

    #[test]
    fn reserve_is_inclusive_of_the_bottom_margin() {
        let mut cursor = PageCursor::new(geometry());
        assert!(cursor.reserve(Pt(240.0)));
        assert!(!cursor.reserve(Pt(240.5)));
        cursor.advance(Pt(100.0));
        assert_eq!(cursor.remaining(), Pt(140.0));
    }

    #[test]
    fn breaks_before_blocks_that_do_not_fit() {
        let mut recorder = Recorder::default();
        let mut cursor = PageCursor::new(geometry());
        assert_eq!(cursor.place(Pt(200.0), &mut recorder).expect("placed"), Pt(20.0));
        let top = cursor.place(Pt(50.0), &mut recorder).expect("placed");
        assert_eq!(top, Pt(20.0));
        assert_eq!(cursor.page_index(), 1);
        assert_eq!(recorder.events(), &[RecordedEvent::PageBreak]);
        assert!(cursor.take_warnings().is_empty());
    }

    #[test]
    fn oversized_blocks_start_fresh_and_warn() {
        let mut recorder = Recorder::default();
        let mut cursor = PageCursor::new(geometry());
        cursor.place(Pt(10.0), &mut recorder).expect("placed");
        let top = cursor.place(Pt(500.0), &mut recorder).expect("placed");
        assert_eq!(top, Pt(20.0));
        assert_eq!(cursor.page_count(), 2);

        // an empty page is never broken again
        let mut fresh = PageCursor::new(geometry());
        fresh.place(Pt(500.0), &mut recorder).expect("placed");
        assert_eq!(fresh.page_count(), 1);

        let warnings = cursor.take_warnings();
        assert_eq!(
            warnings,
            vec![LayoutWarning::Overflow {
                page_index: 1,
                height: Pt(500.0),
                available: Pt(240.0),
            }]
        );
    }

    #[test]
    fn only_blocks_taller_than_a_page_are_overflows() {
        let mut cursor = PageCursor::new(geometry());
        cursor.advance(Pt(100.0));
        // runs past the margin, but would fit on a page of its own
        cursor.claim(Pt(200.0));
        assert!(cursor.take_warnings().is_empty());
        assert!(cursor.oversized(Pt(240.5)));
        assert!(!cursor.oversized(Pt(240.0)));
    }

    #[test]
    fn kept_blocks_hold_an_oversized_follower() {
        let mut recorder = Recorder::default();
        let mut cursor = PageCursor::new(geometry());
        cursor.place(Pt(10.0), &mut recorder).expect("placed");

        // a title and a block that won't fit together on any page
        cursor.ensure(Pt(20.0) + Pt(300.0), &mut recorder).expect("ensured");
        assert_eq!(cursor.page_index(), 1);
        assert_eq!(cursor.claim_kept(Pt(20.0)), Pt(20.0));
        assert!(!cursor.ensure(Pt(300.0), &mut recorder).expect("ensured"));
        assert_eq!(cursor.claim(Pt(300.0)), Pt(40.0));
        assert_eq!(cursor.page_index(), 1);
        assert_eq!(cursor.take_warnings().len(), 1);

        // a follower that fits a fresh page moves there, leaving the title behind
        let mut cursor = PageCursor::new(geometry());
        cursor.claim_kept(Pt(20.0));
        assert!(cursor.ensure(Pt(230.0), &mut recorder).expect("ensured"));
        assert_eq!(cursor.claim(Pt(230.0)), Pt(20.0));
        assert_eq!(cursor.page_index(), 1);
        assert!(cursor.take_warnings().is_empty());

        // kept blocks further down the page hold nothing
        let mut cursor = PageCursor::new(geometry());
        cursor.place(Pt(100.0), &mut recorder).expect("placed");
        cursor.claim_kept(Pt(20.0));
        assert!(cursor.ensure(Pt(200.0), &mut recorder).expect("ensured"));
    }
}
