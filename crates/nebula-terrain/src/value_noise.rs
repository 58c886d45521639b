//! 2D lattice gradient noise driven by a seeded [`PermutationTable`].

use noise::NoiseFn;

use crate::seed::PermutationTable;

/// Coherent 2D noise. Samples fall roughly in `[-1.0, 1.0]` and are exactly
/// zero on integer lattice points.
#[derive(Clone, Debug)]
pub struct ValueNoiseField {
    table: PermutationTable,
}

impl ValueNoiseField {
    /// Create a field for `seed` using the reference permutation shuffle.
    pub fn new(seed: f64) -> Self {
        Self::from_table(PermutationTable::build(seed))
    }

    /// Create a field over an existing permutation table.
    pub fn from_table(table: PermutationTable) -> Self {
        Self { table }
    }

    /// The permutation table backing this field.
    pub fn table(&self) -> &PermutationTable {
        &self.table
    }

    /// Sample the field at `(x, y)`. Non-finite coordinates sample as `0.0`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return 0.0;
        }

        let x0 = x.floor();
        let y0 = y.floor();
        let xi = lattice_index(x0);
        let yi = lattice_index(y0);
        let xf = x - x0;
        let yf = y - y0;

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.table;
        let a = p.get(xi) + yi;
        let b = p.get(xi + 1) + yi;
        let aa = p.get(a);
        let ab = p.get(a + 1);
        let ba = p.get(b);
        let bb = p.get(b + 1);

        let bottom = lerp(u, grad(aa, xf, yf), grad(ba, xf - 1.0, yf));
        let top = lerp(u, grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0));
        lerp(v, bottom, top)
    }
}

impl NoiseFn<f64, 2> for ValueNoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}

/// Wrap a floored coordinate onto the 256-entry lattice.
#[inline]
fn lattice_index(floored: f64) -> usize {
    ((floored as i64) & 0xFF) as usize
}

/// Quintic smoothing curve `t^3 (t (6t - 15) + 10)`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the offset `(x, y)` with one of four diagonal gradients.
#[inline]
fn grad(hash: usize, x: f64, y: f64) -> f64 {
    let h = hash & 3;
    let u = if h < 2 { x } else { y };
    let v = if h < 2 { y } else { x };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
