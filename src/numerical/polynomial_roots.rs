//! Complex roots of a real polynomial given by ascending coefficients.
//!
//! Degrees 1 and 2 use closed forms, higher degrees use the Aberth-Ehrlich simultaneous
//! iteration started from points on a circle whose radius is the Cauchy bound. Near a
//! multiple root the iterates only get as close as rounding allows, so an iterate whose
//! residual is below the rounding bound of Horner's scheme counts as converged, and a
//! cluster of iterates that forms one root of higher multiplicity is replaced by that root.
use log::{debug, warn};
use num_complex::Complex64;
use std::f64::consts::PI;
use std::time::Instant;
use thiserror::Error;

/// imaginary parts smaller than this (relative to the modulus) are dropped
const IMAG_EPS: f64 = 1e-9;
/// iterates closer than this (relative) may belong to one multiple root
const CLUSTER_RADIUS: f64 = 1e-2;
/// lower Taylor coefficients below this (relative) make a cluster one multiple root
const MULTIPLE_ROOT_EPS: f64 = 1e-9;
const REFINE_STEPS: usize = 50;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RootsError {
    #[error("root iteration did not converge in {0} steps")]
    NotConverged(usize),
    #[error("deadline exceeded after {0} steps")]
    Timeout(usize),
}

/// evaluates p and p' at z by Horner's scheme; `coeffs` are ascending
fn horner(coeffs: &[f64], z: Complex64) -> (Complex64, Complex64) {
    let mut p = Complex64::new(0.0, 0.0);
    let mut dp = Complex64::new(0.0, 0.0);
    for &c in coeffs.iter().rev() {
        dp = dp * z + p;
        p = p * z + c;
    }
    (p, dp)
}

/// bound of the rounding error of `horner` at z
fn rounding_bound(coeffs: &[f64], z: Complex64) -> f64 {
    let r = z.norm();
    let magnitude = coeffs.iter().rev().fold(0.0, |acc, c| acc * r + c.abs());
    4.0 * coeffs.len() as f64 * f64::EPSILON * magnitude
}

fn derivative(coeffs: &[f64]) -> Vec<f64> {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, c)| c * k as f64)
        .collect()
}

/// coefficients of p in powers of (x - c), ascending
fn taylor_coefficients(coeffs: &[f64], c: Complex64) -> Vec<Complex64> {
    let mut d: Vec<Complex64> = coeffs.iter().rev().map(|x| Complex64::new(*x, 0.0)).collect();
    let n = d.len() - 1;
    for i in 0..n {
        for j in 1..=(n - i) {
            let prev = d[j - 1];
            d[j] += c * prev;
        }
    }
    d.reverse();
    d
}

/// drops negligible imaginary parts and negative zeros
fn clean(z: Complex64) -> Complex64 {
    if z.im.abs() <= IMAG_EPS * z.norm().max(1.0) {
        Complex64::new(z.re + 0.0, 0.0)
    } else {
        Complex64::new(z.re + 0.0, z.im)
    }
}

fn quadratic_roots(c: f64, b: f64, a: f64) -> Vec<Complex64> {
    let disc = Complex64::new(b * b - 4.0 * a * c, 0.0).sqrt();
    // avoid cancellation: q = -(b + sign(b) sqrt(disc)) / 2
    let sign = if b >= 0.0 { 1.0 } else { -1.0 };
    let q = -(Complex64::new(b, 0.0) + disc * sign) / 2.0;
    if q.norm() == 0.0 {
        return vec![Complex64::new(0.0, 0.0); 2];
    }
    vec![q / a, Complex64::new(c, 0.0) / q]
}

/// The common value of clustered iterates if they are one root of multiplicity
/// `members.len()`: that root is a simple root of the (m-1)-th derivative.
fn multiple_root(coeffs: &[f64], members: &[Complex64]) -> Option<Complex64> {
    let m = members.len();
    let mut c = members.iter().sum::<Complex64>() / m as f64;
    let mut q = coeffs.to_vec();
    for _ in 1..m {
        q = derivative(&q);
    }
    for _ in 0..REFINE_STEPS {
        let (value, slope) = horner(&q, c);
        let step = value / slope;
        if !step.re.is_finite() || !step.im.is_finite() {
            break;
        }
        c -= step;
        if step.norm() <= f64::EPSILON * c.norm().max(1.0) {
            break;
        }
    }
    let taylor = taylor_coefficients(coeffs, c);
    let scale: f64 = taylor.iter().map(|t| t.norm()).sum();
    taylor[..m]
        .iter()
        .all(|t| t.norm() <= MULTIPLE_ROOT_EPS * scale)
        .then_some(c)
}

/// replaces every cluster of iterates that is one multiple root by that root
fn merge_multiple_roots(coeffs: &[f64], roots: Vec<Complex64>) -> Vec<Complex64> {
    let n = roots.len();
    let mut assigned = vec![false; n];
    let mut merged = Vec::with_capacity(n);
    for i in 0..n {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut cluster = vec![i];
        let mut k = 0;
        while k < cluster.len() {
            let center = roots[cluster[k]];
            for j in 0..n {
                if !assigned[j] && (roots[j] - center).norm() <= CLUSTER_RADIUS * center.norm().max(1.0) {
                    assigned[j] = true;
                    cluster.push(j);
                }
            }
            k += 1;
        }
        let members: Vec<Complex64> = cluster.iter().map(|&j| roots[j]).collect();
        if members.len() == 1 {
            merged.extend(members);
            continue;
        }
        match multiple_root(coeffs, &members) {
            Some(root) => {
                debug!("root {} of multiplicity {}", root, members.len());
                merged.extend(std::iter::repeat_n(root, members.len()));
            }
            None => merged.extend(members),
        }
    }
    merged
}

fn aberth(
    coeffs: &[f64],
    tolerance: f64,
    max_iterations: usize,
    deadline: Option<Instant>,
) -> Result<Vec<Complex64>, RootsError> {
    let n = coeffs.len() - 1;
    let lead = coeffs[n];
    let radius = 1.0
        + coeffs[..n]
            .iter()
            .map(|c| (c / lead).abs())
            .fold(0.0, f64::max);
    let mut z: Vec<Complex64> = (0..n)
        .map(|k| Complex64::from_polar(radius, 2.0 * PI * k as f64 / n as f64 + 0.4))
        .collect();
    for iteration in 0..max_iterations {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            warn!("Aberth iteration stopped by the deadline after {} steps", iteration);
            return Err(RootsError::Timeout(iteration));
        }
        let mut settled = true;
        for i in 0..n {
            let (p, dp) = horner(coeffs, z[i]);
            if p.norm() <= rounding_bound(coeffs, z[i]) {
                continue;
            }
            let ratio = p / dp;
            let repulsion: Complex64 = (0..n)
                .filter(|&j| j != i)
                .map(|j| Complex64::new(1.0, 0.0) / (z[i] - z[j]))
                .sum();
            let step = ratio / (Complex64::new(1.0, 0.0) - ratio * repulsion);
            if !step.re.is_finite() || !step.im.is_finite() {
                settled = false;
                continue;
            }
            z[i] -= step;
            if step.norm() / z[i].norm().max(1.0) >= tolerance {
                settled = false;
            }
        }
        if settled {
            debug!("Aberth iteration converged after {} steps", iteration + 1);
            return Ok(merge_multiple_roots(coeffs, z));
        }
    }
    warn!("Aberth iteration did not converge in {} steps", max_iterations);
    Err(RootsError::NotConverged(max_iterations))
}

/// Roots of `coeffs[0] + coeffs[1] x + ...`, repeated by multiplicity and sorted by
/// (real, imaginary) part.
///
/// Vanishing leading coefficients are dropped first; a constant polynomial has no roots.
/// For degree >= 3 the iteration may fail to converge or hit the `deadline`.
pub fn polynomial_roots(
    coeffs: &[f64],
    tolerance: f64,
    max_iterations: usize,
    deadline: Option<Instant>,
) -> Result<Vec<Complex64>, RootsError> {
    let mut coeffs = coeffs.to_vec();
    while coeffs.last().is_some_and(|c| *c == 0.0) {
        coeffs.pop();
    }
    // roots at zero
    let zeros = coeffs.iter().take_while(|c| **c == 0.0).count();
    let coeffs = &coeffs[zeros.min(coeffs.len())..];
    let mut roots = vec![Complex64::new(0.0, 0.0); if coeffs.is_empty() { 0 } else { zeros }];
    match coeffs.len() {
        0 | 1 => {}
        2 => roots.push(Complex64::new(-coeffs[0] / coeffs[1], 0.0)),
        3 => roots.extend(quadratic_roots(coeffs[0], coeffs[1], coeffs[2])),
        _ => roots.extend(aberth(coeffs, tolerance, max_iterations, deadline)?),
    }
    let mut roots: Vec<Complex64> = roots.into_iter().map(clean).collect();
    roots.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
    Ok(roots)
}
