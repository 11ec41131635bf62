#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour { r: 0, g: 0, b: 0 };
    pub const RED: Colour = Colour { r: 255, g: 0, b: 0 };

    #[must_use]
    pub fn grey(level: u8) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    /// Linear blend between two colours, `t` clamped to [0, 1].
    #[must_use]
    pub fn blend(self, other: Colour, t: f64) -> Colour {
        let t = t.clamp(0.0, 1.0);
        let channel =
            |a: u8, b: u8| -> u8 { (f64::from(a) * (1.0 - t) + f64::from(b) * t).round() as u8 };

        Colour {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}
