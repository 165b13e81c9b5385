//! Row-major scalar field of clamped intensities.
//!
//! A `Field` is the per-pixel intensity a shader scene computes before
//! color composition. Row 0 is the top of the image. Values are clamped
//! to [0, 1] on construction.

use crate::error::SceneError;

#[derive(Debug, Clone)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

fn checked_len(width: usize, height: usize) -> Result<usize, SceneError> {
    if width == 0 || height == 0 {
        return Err(SceneError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(SceneError::InvalidDimensions)
}

impl Field {
    /// Zero-filled field.
    ///
    /// Returns `SceneError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, SceneError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Evaluates `f(x, y)` for every cell, clamping each result to [0, 1].
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self, SceneError> {
        let len = checked_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                let v = f(x, y);
                data.push(if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) });
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at `(x, y)`, or `None` outside the field.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Mean intensity across all cells.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Iterates `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, &v)| (i % self.width, i / self.width, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zero_filled() {
        let f = Field::new(4, 3).unwrap();
        assert_eq!(f.data().len(), 12);
        assert!(f.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_and_overflowing_dimensions_are_rejected() {
        assert!(matches!(Field::new(0, 5), Err(SceneError::InvalidDimensions)));
        assert!(matches!(Field::new(5, 0), Err(SceneError::InvalidDimensions)));
        assert!(Field::new(usize::MAX, 2).is_err());
        assert!(Field::from_fn(0, 1, |_, _| 0.0).is_err());
    }

    #[test]
    fn from_fn_clamps_and_zeroes_nan() {
        let f = Field::from_fn(3, 1, |x, _| match x {
            0 => -1.0,
            1 => f64::NAN,
            _ => 4.0,
        })
        .unwrap();
        assert_eq!(f.data(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn from_fn_is_row_major() {
        let f = Field::from_fn(3, 2, |x, y| (y * 3 + x) as f64 / 10.0).unwrap();
        assert_eq!(f.get(2, 1), Some(0.5));
        assert_eq!(f.get(0, 1), Some(0.3));
        assert_eq!(f.get(3, 0), None);
        assert_eq!(f.get(0, 2), None);
    }

    #[test]
    fn mean_and_max() {
        let f = Field::from_fn(2, 2, |x, y| if x == 1 && y == 1 { 0.8 } else { 0.0 }).unwrap();
        assert!((f.mean() - 0.2).abs() < 1e-12);
        assert!((f.max() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn iter_yields_coordinates() {
        let f = Field::from_fn(2, 2, |x, y| (x + 2 * y) as f64 * 0.25).unwrap();
        let cells: Vec<_> = f.iter().collect();
        assert_eq!(cells[3], (1, 1, 0.75));
        assert_eq!(cells[1], (1, 0, 0.25));
    }
}
