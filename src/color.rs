// Simple color struct, created from an unsigned 32 representing RRGGBBAA

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const CYAN: Color = Color::from_u32(0x00ffffcc);
    pub const PURPLE: Color = Color::from_u32(0x800080cc);
    pub const BLUE: Color = Color::from_u32(0x0000ffcc);
    pub const ORANGE: Color = Color::from_u32(0xffa500cc);

    pub const fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    pub fn to_u32(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }

    // CSS fill style, alpha mapped to [0, 1] and kept to two decimals
    pub fn to_css(self) -> String {
        let alpha = (self.a as f64 / 255.0 * 100.0).round() / 100.0;
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

/// The semi-transparent palette particles pick from
pub const DEFAULT_PALETTE: [Color; 4] = [Color::CYAN, Color::PURPLE, Color::BLUE, Color::ORANGE];
