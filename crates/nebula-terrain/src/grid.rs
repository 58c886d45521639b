//! Row-major 2D grid shared by every terrain field.
//!
//! Height, temperature, humidity, and per-cell biome assignments are all stored
//! as [`Grid`] instances so that `(x, y) -> index` arithmetic lives in one place.

use std::ops::Index;

/// A dense, row-major 2D array. Cell `(x, y)` lives at `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// A grid of normalized scalar samples in `[0.0, 1.0]`.
pub type ScalarGrid = Grid<f64>;

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Create a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap an existing row-major buffer. Returns `None` if the length does not
    /// match `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Grid width (number of columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (number of rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat row-major index of `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Borrow the cell at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index_of(x, y).map(|i| &self.data[i])
    }

    /// Overwrite the cell at `(x, y)`. Returns `false` when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Iterate cells in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate cells mutably in row-major order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Iterate rows, each a slice of `width` cells.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // `max(1)` keeps `chunks` happy on zero-width grids, which have no data anyway.
        self.data.chunks(self.width.max(1))
    }

    /// The underlying row-major buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the grid, returning its row-major buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Build a grid of the same shape by mapping every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(
            x < self.width && y < self.height,
            "grid index ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        &self.data[y * self.width + x]
    }
}

/// Summary statistics over a scalar field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStats {
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// Arithmetic mean of all samples.
    pub mean: f64,
}

impl FieldStats {
    /// Statistics of an empty field: all zeros.
    pub const EMPTY: Self = Self {
        min: 0.0,
        max: 0.0,
        mean: 0.0,
    };
}

impl ScalarGrid {
    /// Compute min, max, and mean of the field.
    pub fn stats(&self) -> FieldStats {
        if self.is_empty() {
            return FieldStats::EMPTY;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in self.iter() {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        FieldStats {
            min,
            max,
            mean: sum / self.len() as f64,
        }
    }

    /// Shift every sample by `modifier` and clamp the result to `[0.0, 1.0]`.
    ///
    /// A non-finite modifier leaves the field untouched.
    pub fn apply_modifier(&mut self, modifier: f64) {
        if !modifier.is_finite() {
            return;
        }
        for v in self.iter_mut() {
            *v = (*v + modifier).clamp(0.0, 1.0);
        }
    }
}
