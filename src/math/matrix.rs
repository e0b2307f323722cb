use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::f32::consts::PI;

/// Below this many rows a product is computed on the calling thread; the
/// spawn cost outweighs the work.
const PARALLEL_MIN_ROWS: usize = 1024;

/// Dense row-major `rows × cols` matrix of `f32`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f32>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Builds a matrix from nested rows. Returns `None` for ragged input.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Option<Matrix> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != n_cols) {
            return None;
        }
        Some(Matrix { rows: n_rows, cols: n_cols, data: rows.into_iter().flatten().collect() })
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal(rng: &mut ThreadRng) -> f32 {
        // Both draws in (0, 1] to avoid log(0).
        let u1: f32 = 1.0 - rng.gen::<f32>();
        let u2: f32 = 1.0 - rng.gen::<f32>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn normal(rows: usize, cols: usize, std_dev: f32) -> Matrix {
        let mut rng = rand::thread_rng();
        let data = (0..rows * cols)
            .map(|_| Matrix::sample_standard_normal(&mut rng) * std_dev)
            .collect();
        Matrix { rows, cols, data }
    }

    /// He initialization: N(0, sqrt(2 / rows)). Use before ReLU.
    ///
    /// `rows` is the fan-in, since layers multiply `x · W`.
    pub fn he(rows: usize, cols: usize) -> Matrix {
        Matrix::normal(rows, cols, (2.0 / rows.max(1) as f32).sqrt())
    }

    /// Xavier (Glorot) initialization: N(0, sqrt(1 / rows)). Use before
    /// Sigmoid/Tanh/Softmax.
    pub fn xavier(rows: usize, cols: usize) -> Matrix {
        Matrix::normal(rows, cols, (1.0 / rows.max(1) as f32).sqrt())
    }

    /// True when `data` really holds `rows * cols` values. Deserialized
    /// matrices are not trusted until this passes.
    pub fn is_consistent(&self) -> bool {
        self.rows.checked_mul(self.cols) == Some(self.data.len())
    }

    pub fn row(&self, r: usize) -> &[f32] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Row-vector product `x · self`, returning `cols` values.
    ///
    /// Large products are split into contiguous row chunks, one per worker
    /// (at most `threads`), and the partial sums are added back in chunk
    /// order, so the result is deterministic for a given thread count.
    ///
    /// # Panics
    /// Panics if `x.len() != self.rows`.
    pub fn vec_mul(&self, x: &[f32], threads: usize) -> Vec<f32> {
        assert_eq!(x.len(), self.rows, "input length must equal matrix rows");

        let workers = threads.max(1).min(self.rows.max(1));
        if workers == 1 || self.rows < PARALLEL_MIN_ROWS {
            return self.partial_product(x, 0, self.rows);
        }

        let chunk = self.rows.div_ceil(workers);
        let partials: Vec<Vec<f32>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..workers)
                .map(|w| {
                    let start = (w * chunk).min(self.rows);
                    let end = ((w + 1) * chunk).min(self.rows);
                    s.spawn(move || self.partial_product(x, start, end))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| match h.join() {
                    Ok(v) => v,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });

        let mut out = vec![0.0; self.cols];
        for partial in partials {
            for (acc, v) in out.iter_mut().zip(partial) {
                *acc += v;
            }
        }
        out
    }

    fn partial_product(&self, x: &[f32], start: usize, end: usize) -> Vec<f32> {
        let mut out = vec![0.0; self.cols];
        for r in start..end {
            let xr = x[r];
            for (acc, w) in out.iter_mut().zip(self.row(r)) {
                *acc += xr * w;
            }
        }
        out
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
