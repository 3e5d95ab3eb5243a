//! Title-bar state.
//!
//! The list may sit under a title area. Whether that area exists is decided
//! once, at configuration time: without a title stream there is no title
//! area at all. Everything else (text, colours, bar buttons) is pushed in
//! by streams or configuration and mirrored to the host as a whole.

mod color;

pub use color::Color;

/// Which side of the title bar a button sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarSide {
    Left,
    Right,
}

/// Visible state of the title area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleBar {
    /// Whether a title area is shown at all.
    pub has_title_area: bool,
    /// Current title text.
    pub title: String,
    /// Colour of the title text and bar tint.
    pub title_color: Option<Color>,
    /// Background of the bar.
    pub bar_color: Option<Color>,
    /// Icon of the left bar button, if any.
    pub left_icon: Option<String>,
    /// Icon of the right bar button, if any.
    pub right_icon: Option<String>,
    /// False until the first render pass; hosts keep the list hidden until then.
    pub revealed: bool,
}

impl TitleBar {
    /// Icon configured for a side.
    pub fn icon(&self, side: BarSide) -> Option<&str> {
        match side {
            BarSide::Left => self.left_icon.as_deref(),
            BarSide::Right => self.right_icon.as_deref(),
        }
    }

    pub(crate) fn set_icon(&mut self, side: BarSide, icon: Option<String>) {
        match side {
            BarSide::Left => self.left_icon = icon,
            BarSide::Right => self.right_icon = icon,
        }
    }
}
