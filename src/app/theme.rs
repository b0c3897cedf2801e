//! UI 主题：把颜色集中管理，避免散落在渲染代码里。

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct UiTheme {
    pub focus_border: Color,
    pub inactive_border: Color,
    pub accent_fg: Color,
    pub header_fg: Color,
    pub error_fg: Color,
    pub muted_fg: Color,
    pub selection_bg: Color,
    pub selected_item_bg: Color,
}

impl Default for UiTheme {
    fn default() -> Self {
        Self {
            focus_border: Color::Indexed(6),    // Cyan
            inactive_border: Color::Indexed(8), // DarkGray
            accent_fg: Color::Indexed(3),
            header_fg: Color::Indexed(6),       // Cyan
            error_fg: Color::Indexed(1),        // Red
            muted_fg: Color::Indexed(8),        // DarkGray
            selection_bg: Color::Indexed(4),    // Blue
            selected_item_bg: Color::Indexed(8), // DarkGray
        }
    }
}

impl UiTheme {
    pub fn border(&self, focused: bool) -> Color {
        if focused {
            self.focus_border
        } else {
            self.inactive_border
        }
    }
}
