//! Note renderers

mod svg;

pub use svg::{NoteStyle, SvgNoteRenderer};
