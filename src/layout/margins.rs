use crate::units::Pt;
use serde::Deserialize;

/// Margins are the guidelines the page cursor lays rows out within. The bottom
/// margin is the line no atomic block may start below; the top margin is where
/// the cursor lands after a page break.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The margins the investigation reports have always been printed with:
    /// a 25pt gutter left and right, a little more air at the top and bottom
    pub fn report() -> Margins {
        Margins::trbl(Pt(30.0), Pt(25.0), Pt(40.0), Pt(25.0))
    }
}
