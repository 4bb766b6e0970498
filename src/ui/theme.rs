use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub string: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub selected_ip_bg: Color, // Cell under the selected IP
    pub other_ip_bg: Color,    // Cells under every other IP
    pub direction: Color,      // Arrows, `?`, `#` and friends
    pub storage: Color,        // Stack-stack offset entries
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    string: Color::Rgb(250, 179, 135),         // Orange for string mode quotes
    number: Color::Rgb(250, 179, 135),         // Orange for digits
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for the status bar
    selected_ip_bg: Color::Rgb(249, 226, 175), // Yellow
    other_ip_bg: Color::Rgb(148, 226, 213),    // Teal
    direction: Color::Rgb(137, 180, 250),      // Blue
    storage: Color::Rgb(245, 194, 231),        // Pink
};
