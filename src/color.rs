#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
  r: u8,
  g: u8,
  b: u8,
}

impl Color {
  pub const fn from_rgb(r: u8, g: u8, b: u8) -> Color {
    Color { r, g, b }
  }

  /// Parses a `RRGGBB` color string with an optional leading `#`.
  pub fn from_hex(hex: &str) -> Option<Color> {
    let digits = if hex.starts_with('#') { &hex[1..] } else { hex };
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
      return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color::from_rgb(r, g, b))
  }

  pub fn to_hex(&self) -> String {
    format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
  }

  fn distance(&self, other: &Color) -> f64 {
    let dr = f64::from(self.r) - f64::from(other.r);
    let dg = f64::from(self.g) - f64::from(other.g);
    let db = f64::from(self.b) - f64::from(other.b);
    (dr * dr + dg * dg + db * db).sqrt()
  }
}

/// Live's built-in clip color table, in ColorIndex order.
pub const PALETTE: [Color; 70] = [
  Color::from_rgb(0xFF, 0x94, 0xA6),
  Color::from_rgb(0xFF, 0xA5, 0x29),
  Color::from_rgb(0xCC, 0x99, 0x27),
  Color::from_rgb(0xF7, 0xF4, 0x7C),
  Color::from_rgb(0xBF, 0xFB, 0x00),
  Color::from_rgb(0x1A, 0xFF, 0x2F),
  Color::from_rgb(0x25, 0xFF, 0xA8),
  Color::from_rgb(0x5C, 0xFF, 0xE8),
  Color::from_rgb(0x8B, 0xC5, 0xFF),
  Color::from_rgb(0x54, 0x80, 0xE4),
  Color::from_rgb(0x92, 0xA7, 0xFF),
  Color::from_rgb(0xD8, 0x6C, 0xE4),
  Color::from_rgb(0xE5, 0x53, 0xA0),
  Color::from_rgb(0xFF, 0xFF, 0xFF),
  Color::from_rgb(0xFF, 0x36, 0x36),
  Color::from_rgb(0xF6, 0x6C, 0x03),
  Color::from_rgb(0x99, 0x72, 0x4B),
  Color::from_rgb(0xFF, 0xF0, 0x34),
  Color::from_rgb(0x87, 0xFF, 0x67),
  Color::from_rgb(0x3D, 0xC3, 0x00),
  Color::from_rgb(0x00, 0xBF, 0xAF),
  Color::from_rgb(0x19, 0xE9, 0xFF),
  Color::from_rgb(0x10, 0xA4, 0xEE),
  Color::from_rgb(0x00, 0x7D, 0xC0),
  Color::from_rgb(0x88, 0x6C, 0xE4),
  Color::from_rgb(0xB6, 0x77, 0xC6),
  Color::from_rgb(0xFF, 0x39, 0xD4),
  Color::from_rgb(0xD0, 0xD0, 0xD0),
  Color::from_rgb(0xE2, 0x67, 0x5A),
  Color::from_rgb(0xFF, 0xA3, 0x74),
  Color::from_rgb(0xD3, 0xAD, 0x71),
  Color::from_rgb(0xED, 0xFF, 0xAE),
  Color::from_rgb(0xD2, 0xE4, 0x98),
  Color::from_rgb(0xBA, 0xD0, 0x74),
  Color::from_rgb(0x9B, 0xC4, 0x8D),
  Color::from_rgb(0xD4, 0xFD, 0xE1),
  Color::from_rgb(0xCD, 0xF1, 0xF8),
  Color::from_rgb(0xB9, 0xC1, 0xE3),
  Color::from_rgb(0xCD, 0xBB, 0xE4),
  Color::from_rgb(0xAE, 0x98, 0xE5),
  Color::from_rgb(0xE5, 0xDC, 0xE1),
  Color::from_rgb(0xA9, 0xA9, 0xA9),
  Color::from_rgb(0xC6, 0x92, 0x8B),
  Color::from_rgb(0xB7, 0x82, 0x56),
  Color::from_rgb(0x99, 0x83, 0x6A),
  Color::from_rgb(0xBF, 0xBA, 0x69),
  Color::from_rgb(0xA6, 0xBE, 0x00),
  Color::from_rgb(0x7D, 0xB0, 0x4D),
  Color::from_rgb(0x88, 0xC2, 0xBA),
  Color::from_rgb(0x9B, 0xB3, 0xC4),
  Color::from_rgb(0x85, 0xA5, 0xC2),
  Color::from_rgb(0x83, 0x93, 0xCC),
  Color::from_rgb(0xA5, 0x95, 0xB5),
  Color::from_rgb(0xBF, 0x9F, 0xBE),
  Color::from_rgb(0xBC, 0x71, 0x96),
  Color::from_rgb(0x7B, 0x7B, 0x7B),
  Color::from_rgb(0xAF, 0x33, 0x33),
  Color::from_rgb(0xA9, 0x51, 0x31),
  Color::from_rgb(0x72, 0x4F, 0x41),
  Color::from_rgb(0xDB, 0xC3, 0x00),
  Color::from_rgb(0x85, 0x96, 0x1F),
  Color::from_rgb(0x53, 0x9F, 0x31),
  Color::from_rgb(0x0A, 0x9C, 0x8E),
  Color::from_rgb(0x23, 0x63, 0x84),
  Color::from_rgb(0x1A, 0x2F, 0x96),
  Color::from_rgb(0x2F, 0x52, 0xA2),
  Color::from_rgb(0x62, 0x4B, 0xAD),
  Color::from_rgb(0xA3, 0x4B, 0xAD),
  Color::from_rgb(0xCC, 0x2E, 0x6E),
  Color::from_rgb(0x3C, 0x3C, 0x3C),
];

/// Finds the ColorIndex of the palette entry closest to the given hex color
/// in RGB space. Malformed input falls back to index 0. Ties resolve to the
/// lowest index.
pub fn nearest_palette_index(hex: &str) -> usize {
  let color = match Color::from_hex(hex) {
    Some(color) => color,
    None => return 0,
  };

  let mut closest_index = 0;
  let mut min_distance = std::f64::INFINITY;

  for (index, entry) in PALETTE.iter().enumerate() {
    let distance = color.distance(entry);
    if distance < min_distance {
      min_distance = distance;
      closest_index = index;
    }
  }
  closest_index
}

/// The palette color the given hex color snaps to, for display purposes.
pub fn nearest_palette_color(hex: &str) -> Color {
  PALETTE[nearest_palette_index(hex)]
}
