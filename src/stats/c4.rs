//! `c4(n)` bias-correction constant for the sample standard deviation.
//!
//! Exact control-chart constants are tabulated for common subgroup sizes;
//! sizes between two entries are linearly interpolated and sizes above the
//! table use the asymptotic expansion `1 - 1/(4n) + 7/(32n²)`.

/// `(n, c4)` pairs, sorted by `n`.
pub const C4_TABLE: [(usize, f64); 12] = [
    (2, 0.7979),
    (3, 0.8862),
    (4, 0.9213),
    (5, 0.9400),
    (6, 0.9515),
    (7, 0.9594),
    (8, 0.9650),
    (9, 0.9693),
    (10, 0.9727),
    (15, 0.9823),
    (20, 0.9869),
    (25, 0.9896),
];

const C4_FALLBACK: f64 = 0.97;

pub fn c4(n: usize) -> f64 {
    if n < 2 {
        return 1.0;
    }

    if let Some(&(_, value)) = C4_TABLE.iter().find(|(k, _)| *k == n) {
        return value;
    }

    let (max_n, _) = C4_TABLE[C4_TABLE.len() - 1];
    if n > max_n {
        let n = n as f64;
        return 1.0 - 1.0 / (4.0 * n) + 7.0 / (32.0 * n * n);
    }

    for pair in C4_TABLE.windows(2) {
        let (lo_n, lo) = pair[0];
        let (hi_n, hi) = pair[1];
        if n > lo_n && n < hi_n {
            let t = (n - lo_n) as f64 / (hi_n - lo_n) as f64;
            return lo + t * (hi - lo);
        }
    }

    C4_FALLBACK
}
