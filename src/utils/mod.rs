//! Small, independently-testable pure-function helpers shared across the
//! crate: narrow, literally documented, exhaustively unit-tested.

pub mod json_repair;
pub mod line_numbers;
pub mod localized;

pub use localized::Localized;
