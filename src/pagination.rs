//! Pagination window for the pager bar.
//!
//! Shows at most [`MAX_PAGE_BUTTONS`] numbered pages around the current one,
//! sliding the window to stay inside `1..=total_pages`, with optional
//! Prev/Next buttons on either side.

use std::ops::RangeInclusive;

/// Maximum number of numbered page buttons.
pub const MAX_PAGE_BUTTONS: u32 = 5;

/// Kind of pager button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButtonKind {
    Prev,
    Number,
    Next,
}

/// A single pager button and the page it leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub kind: PageButtonKind,
    /// Page requested when the button is activated
    pub target: u32,
    /// Whether this is the page currently shown
    pub active: bool,
}

impl PageButton {
    /// Button text as drawn in the pager.
    pub fn label(&self) -> String {
        match self.kind {
            PageButtonKind::Prev => "« Prev".to_string(),
            PageButtonKind::Next => "Next »".to_string(),
            PageButtonKind::Number => self.target.to_string(),
        }
    }
}

/// Pager layout for one result page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageWindow {
    buttons: Vec<PageButton>,
}

impl PageWindow {
    /// Compute the pager for `page` out of `total_pages`.
    ///
    /// # Details
    /// Returns an empty window when there is a single page or none. The
    /// numbered run starts two pages before `page` and is shifted left when
    /// it would run past `total_pages`.
    pub fn compute(total_pages: u32, page: u32) -> Self {
        if total_pages <= 1 {
            return Self::default();
        }

        let range = number_range(total_pages, page);
        let mut buttons = Vec::with_capacity(MAX_PAGE_BUTTONS as usize + 2);

        if page > 1 {
            buttons.push(PageButton {
                kind: PageButtonKind::Prev,
                target: page - 1,
                active: false,
            });
        }

        buttons.extend(range.map(|n| PageButton {
            kind: PageButtonKind::Number,
            target: n,
            active: n == page,
        }));

        if page < total_pages {
            buttons.push(PageButton {
                kind: PageButtonKind::Next,
                target: page + 1,
                active: false,
            });
        }

        Self { buttons }
    }

    pub fn buttons(&self) -> &[PageButton] {
        &self.buttons
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Page numbers of the numbered buttons, in order.
    pub fn numbers(&self) -> Vec<u32> {
        self.buttons
            .iter()
            .filter(|b| b.kind == PageButtonKind::Number)
            .map(|b| b.target)
            .collect()
    }

    pub fn prev(&self) -> Option<&PageButton> {
        self.buttons.iter().find(|b| b.kind == PageButtonKind::Prev)
    }

    pub fn next(&self) -> Option<&PageButton> {
        self.buttons.iter().find(|b| b.kind == PageButtonKind::Next)
    }

    /// Index of the active numbered button, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.buttons.iter().position(|b| b.active)
    }

    /// Whether `page` is the target of some button in this window.
    pub fn offers(&self, page: u32) -> bool {
        self.buttons.iter().any(|b| b.target == page)
    }
}

fn number_range(total_pages: u32, page: u32) -> RangeInclusive<u32> {
    let half = MAX_PAGE_BUTTONS / 2;
    let mut start = page.saturating_sub(half).max(1);
    let end = total_pages.min(start + MAX_PAGE_BUTTONS - 1);
    // Written without subtraction: `page` past `total_pages` leaves end < start.
    if end + 1 < start + MAX_PAGE_BUTTONS {
        start = end.saturating_sub(MAX_PAGE_BUTTONS - 1).max(1);
    }
    start..=end
}
