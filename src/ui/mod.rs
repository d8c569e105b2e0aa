//! Terminal UI: the column strip and the status/input bar.

mod render;

pub use render::render;

use crate::nav::{DOCUMENT_BASE, Level};

/// Column width percentages, left to right.
pub const COLUMN_WIDTHS: [u16; 3] = [17, 34, 49];

/// Human label for a navigation level.
pub fn level_label(level: Level) -> String {
    match level {
        0 => "Databases".to_string(),
        1 => "Collections".to_string(),
        2 => "Documents".to_string(),
        deeper => format!("Document (Level {})", deeper - DOCUMENT_BASE),
    }
}
