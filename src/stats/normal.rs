//! Normal distribution helpers.
//!
//! `erf` uses the Abramowitz & Stegun 7.1.26 rational approximation
//! (max abs error ~1.5e-7) so PPM figures are reproducible across platforms.

use std::f64::consts::{PI, SQRT_2};

const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;
const P: f64 = 0.3275911;

pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal CDF, `0.5 * (1 + erf(x / √2))`.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let coeff = 1.0 / (std_dev * (2.0 * PI).sqrt());
    let z = (x - mean) / std_dev;
    coeff * (-0.5 * z * z).exp()
}
