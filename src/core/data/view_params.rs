use crate::core::data::complex::Complex;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewParamsError {
    NonFiniteCenter { real: f64, imag: f64 },
    NonPositiveWidth(f64),
    ZeroMaxIterations,
    NonPositiveEscapeRadius(f64),
}

impl fmt::Display for ViewParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteCenter { real, imag } => {
                write!(f, "center ({}, {}) must be finite", real, imag)
            }
            Self::NonPositiveWidth(width) => {
                write!(f, "view width must be positive, got {}", width)
            }
            Self::ZeroMaxIterations => write!(f, "max_iterations must be at least 1"),
            Self::NonPositiveEscapeRadius(radius) => {
                write!(f, "escape radius must be positive, got {}", radius)
            }
        }
    }
}

impl Error for ViewParamsError {}

/// Window into the complex plane plus the iteration budget shared by all
/// kernels. `height` is always derived from `width` and the pixel aspect
/// ratio, never set directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    pub center_real: f64,
    pub center_imag: f64,
    pub width: f64,
    pub height: f64,
    pub max_iterations: u32,
    pub escape_radius: f64,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            center_real: -0.5,
            center_imag: 0.0,
            width: 3.0,
            height: 3.0,
            max_iterations: 100,
            escape_radius: 2.0,
        }
    }
}

/// Value `i` of `n` evenly spaced samples across `[start, start + span]`,
/// endpoints included. A single sample degenerates to the span start.
fn linspace_value(start: f64, span: f64, n: u32, i: u32) -> f64 {
    if n > 1 {
        start + span * f64::from(i) / f64::from(n - 1)
    } else {
        start
    }
}

impl ViewParams {
    pub fn validate(
        center_real: f64,
        center_imag: f64,
        width: f64,
        max_iterations: u32,
        escape_radius: f64,
    ) -> Result<(), ViewParamsError> {
        if !center_real.is_finite() || !center_imag.is_finite() {
            return Err(ViewParamsError::NonFiniteCenter {
                real: center_real,
                imag: center_imag,
            });
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(ViewParamsError::NonPositiveWidth(width));
        }
        if max_iterations == 0 {
            return Err(ViewParamsError::ZeroMaxIterations);
        }
        if !escape_radius.is_finite() || escape_radius <= 0.0 {
            return Err(ViewParamsError::NonPositiveEscapeRadius(escape_radius));
        }

        Ok(())
    }

    /// Re-derives the plane height so plane and raster share an aspect ratio.
    pub fn update_aspect(&mut self, width_px: u32, height_px: u32) {
        if width_px > 0 && height_px > 0 {
            self.height = self.width * f64::from(height_px) / f64::from(width_px);
        }
    }

    #[must_use]
    pub fn real_at(&self, x: u32, width_px: u32) -> f64 {
        linspace_value(self.center_real - self.width / 2.0, self.width, width_px, x)
    }

    /// Row 0 maps to the bottom of the window.
    #[must_use]
    pub fn imag_at(&self, y: u32, height_px: u32) -> f64 {
        linspace_value(
            self.center_imag - self.height / 2.0,
            self.height,
            height_px,
            y,
        )
    }

    #[must_use]
    pub fn point_at(&self, x: u32, y: u32, width_px: u32, height_px: u32) -> Complex {
        Complex {
            real: self.real_at(x, width_px),
            imag: self.imag_at(y, height_px),
        }
    }

    #[must_use]
    pub fn escape_radius_squared(&self) -> f64 {
        self.escape_radius * self.escape_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view() {
        let view = ViewParams::default();

        assert_eq!(view.center_real, -0.5);
        assert_eq!(view.center_imag, 0.0);
        assert_eq!(view.width, 3.0);
        assert_eq!(view.max_iterations, 100);
        assert_eq!(view.escape_radius, 2.0);
    }

    #[test]
    fn test_axis_endpoints_are_inclusive() {
        let view = ViewParams {
            center_real: -0.5,
            width: 3.0,
            ..ViewParams::default()
        };

        assert_eq!(view.real_at(0, 4), -2.0);
        assert_eq!(view.real_at(3, 4), 1.0);
    }

    #[test]
    fn test_middle_column_of_odd_grid_hits_center() {
        let mut view = ViewParams::default();
        view.update_aspect(5, 5);

        assert_eq!(view.real_at(2, 5), -0.5);
        assert_eq!(view.imag_at(2, 5), 0.0);
    }

    #[test]
    fn test_single_column_maps_to_span_start() {
        let view = ViewParams::default();

        assert_eq!(view.real_at(0, 1), view.center_real - view.width / 2.0);
    }

    #[test]
    fn test_update_aspect_derives_height() {
        let mut view = ViewParams::default();
        view.update_aspect(400, 300);

        assert_eq!(view.height, 2.25);
    }

    #[test]
    fn test_update_aspect_ignores_zero_dimensions() {
        let mut view = ViewParams::default();
        let height_before = view.height;
        view.update_aspect(0, 300);

        assert_eq!(view.height, height_before);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            ViewParams::validate(f64::NAN, 0.0, 3.0, 100, 2.0),
            Err(ViewParamsError::NonFiniteCenter { .. })
        ));
        assert_eq!(
            ViewParams::validate(0.0, 0.0, 0.0, 100, 2.0),
            Err(ViewParamsError::NonPositiveWidth(0.0))
        );
        assert_eq!(
            ViewParams::validate(0.0, 0.0, 3.0, 0, 2.0),
            Err(ViewParamsError::ZeroMaxIterations)
        );
        assert_eq!(
            ViewParams::validate(0.0, 0.0, 3.0, 100, -1.0),
            Err(ViewParamsError::NonPositiveEscapeRadius(-1.0))
        );
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let view = ViewParams::default();

        assert!(
            ViewParams::validate(
                view.center_real,
                view.center_imag,
                view.width,
                view.max_iterations,
                view.escape_radius
            )
            .is_ok()
        );
    }
}
