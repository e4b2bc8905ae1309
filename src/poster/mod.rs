// Poster composition engine - templates, photos and text into one image
mod compose;
mod encode;
mod error;
mod text;
mod types;

pub use compose::{PosterEngine, anniversary_years, contain_fit};
pub use encode::poster_to_bytes;
pub use error::PosterError;
pub use text::{
    build_text_lines, builtin_font, draw_text_block, draw_year_label, load_font, ordinal,
    org_line, title_case,
};
pub use types::*;
