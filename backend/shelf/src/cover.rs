//! # Cover Colors
//!
//! Placeholder cover for books without an image.
//!
//! - 32-bit rolling hash over the UTF-16 code units of the title, `hash * 31 + unit`, wrapping
//! - Palette index is `|hash| % 7`, angle index is `|hash| % 4`
//! - Empty title hashes to 0, so it always gets the first pair and the first angle
use std::fmt;

pub const PALETTE: [(&str, &str); 7] = [
    ("#667eea", "#764ba2"),
    ("#f093fb", "#f5576c"),
    ("#4facfe", "#00f2fe"),
    ("#43e97b", "#38f9d7"),
    ("#fa709a", "#fee140"),
    ("#30cfd0", "#330867"),
    ("#a8edea", "#fed6e3"),
];

pub const ANGLES: [u16; 4] = [135, 45, 160, 90];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub angle: u16,
    pub start: &'static str,
    pub end: &'static str,
}

impl Gradient {
    pub fn css(&self) -> String {
        format!(
            "linear-gradient({}deg, {}, {})",
            self.angle, self.start, self.end
        )
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

pub fn title_hash(title: &str) -> i32 {
    title.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

pub fn derive_background(title: &str) -> Gradient {
    // unsigned_abs keeps i32::MIN defined
    let magnitude = title_hash(title).unsigned_abs() as usize;

    let (start, end) = PALETTE[magnitude % PALETTE.len()];

    Gradient {
        angle: ANGLES[magnitude % ANGLES.len()],
        start,
        end,
    }
}
