use std::ops::{Add, Mul};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Complex {
    pub real: f64,
    pub imag: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex {
        real: 0.0,
        imag: 0.0,
    };

    #[must_use]
    pub fn magnitude_squared(&self) -> f64 {
        self.real * self.real + self.imag * self.imag
    }

    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Integer power in polar form: r^n · (cos nθ + i sin nθ).
    ///
    /// Used for Julia exponents above 2; plain squaring goes through
    /// `self * self`, which is exact for the common case.
    #[must_use]
    pub fn powi(&self, n: i64) -> Complex {
        let r = self.magnitude().powi(n as i32);
        let theta = self.imag.atan2(self.real) * n as f64;

        Complex {
            real: r * theta.cos(),
            imag: r * theta.sin(),
        }
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            real: self.real + other.real,
            imag: self.imag + other.imag,
        }
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self {
            real: self.real * other.real - self.imag * other.imag,
            imag: self.real * other.imag + self.imag * other.real,
        }
    }
}
