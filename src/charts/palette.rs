use crate::render::Color;

/// Categorical colors, assigned to series in first-seen order.
pub const CATEGORY_PALETTE: [&str; 10] = [
    "#5B8FF9", "#5AD8A6", "#5D7092", "#F6BD16", "#E8684A", "#6DC8EC", "#9270CA", "#FF9D4D",
    "#269A99", "#FF99C3",
];

pub const AXIS_COLOR: Color = Color::rgb(0.55, 0.55, 0.55);
pub const GRID_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.08);
pub const LABEL_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.65);
pub const TITLE_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.85);

const FALLBACK: Color = Color::rgb(0.357, 0.561, 0.976);

/// Palette color for the `index`-th category, wrapping around.
#[must_use]
pub fn category_color(index: usize) -> Color {
    Color::from_hex(CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()]).unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::{CATEGORY_PALETTE, category_color};
    use crate::render::Color;

    #[test]
    fn palette_wraps_and_parses() {
        for hex in CATEGORY_PALETTE {
            assert!(Color::from_hex(hex).is_some(), "{hex} must parse");
        }
        assert_eq!(category_color(0), category_color(CATEGORY_PALETTE.len()));
        assert_ne!(category_color(0), category_color(1));
    }
}
