use crate::core::data::colour::Colour;

/// Lookup table of colours, indexed either exactly or by fractional position
/// with linear blending. Tables with fewer than two entries are not usable
/// for colouring; algorithms fall back to their grayscale behaviour instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColourTable {
    colours: Vec<Colour>,
}

impl ColourTable {
    #[must_use]
    pub fn new(colours: Vec<Colour>) -> Self {
        Self { colours }
    }

    /// 256-step black-to-white ramp, the built-in fallback palette.
    #[must_use]
    pub fn grayscale() -> Self {
        Self {
            colours: (0..=255).map(Colour::grey).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.colours.len() >= 2
    }

    #[must_use]
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Colour {
        self.colours[index.min(self.colours.len() - 1)]
    }

    /// Fractional index with modulo wraparound; the fractional part blends
    /// toward the next (wrapped) entry.
    #[must_use]
    pub fn sample_wrapped(&self, index: f64) -> Colour {
        let n = self.colours.len() as i64;
        let floor = index.floor();
        let first = (floor as i64).rem_euclid(n) as usize;
        let second = (first + 1) % n as usize;

        self.colours[first].blend(self.colours[second], index - floor)
    }

    /// Fractional index without wraparound; blends toward the next entry,
    /// clamped at the table's ends.
    #[must_use]
    pub fn sample_clamped(&self, index: f64) -> Colour {
        let last = self.colours.len() - 1;
        let clamped = index.clamp(0.0, last as f64);
        let first = clamped.floor() as usize;
        let second = (first + 1).min(last);

        self.colours[first].blend(self.colours[second], clamped - clamped.floor())
    }

    /// Nearest entry for a normalised position in [0, 1], no blending.
    #[must_use]
    pub fn sample_nearest(&self, t: f64) -> Colour {
        let last = self.colours.len() - 1;
        let index = (t.clamp(0.0, 1.0) * last as f64) as usize;

        self.colours[index.min(last)]
    }
}
