//! Closed-form calculus on the monomial basis 1, x, x², ...
//!
//! Polynomials are stored as coefficient vectors `a` with `p(x) = Σ a_m x^m`.
//! All integrals here are exact, which is what lets the smoothness tables be
//! built without symbolic algebra.

/// Evaluate `Σ a_m x^m` with Horner's rule.
pub fn eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &a| acc * x + a)
}

/// Falling factorial `m (m-1) ... (m-l+1)`, the factor in `d^l/dx^l x^m`.
///
/// Returns 0 when `l > m`.
pub fn falling_factorial(m: usize, l: usize) -> f64 {
    if l > m {
        return 0.0;
    }
    ((m - l + 1)..=m).map(|j| j as f64).product()
}

/// Exact `∫_a^b x^p dx`.
pub fn integral(p: usize, a: f64, b: f64) -> f64 {
    let q = (p + 1) as i32;
    (b.powi(q) - a.powi(q)) / q as f64
}

/// Row of monomials `[1, x, ..., x^{n-1}]` at a point.
pub fn point_row(n: usize, x: f64) -> Vec<f64> {
    let mut row = Vec::with_capacity(n);
    let mut xm = 1.0;
    for _ in 0..n {
        row.push(xm);
        xm *= x;
    }
    row
}

/// Row of monomial averages over `[a, b]`: entry `m` is `(1/(b-a)) ∫_a^b x^m dx`.
pub fn average_row(n: usize, a: f64, b: f64) -> Vec<f64> {
    let width = b - a;
    (0..n).map(|m| integral(m, a, b) / width).collect()
}

/// Gram matrix of derivatives over `[a, b]`.
///
/// Entry `(m, n)` is `Σ_{l=1}^{n_coeffs-1} ∫_a^b (d^l x^m)(d^l x^n) dx`, so
/// that `aᵀ G a` is the Jiang-Shu smoothness of the polynomial `a` on a unit
/// cell `[a, b]`.
pub fn derivative_gram(n_coeffs: usize, a: f64, b: f64) -> Vec<Vec<f64>> {
    let mut gram = vec![vec![0.0; n_coeffs]; n_coeffs];
    for l in 1..n_coeffs {
        for m in l..n_coeffs {
            for n in l..n_coeffs {
                let factor = falling_factorial(m, l) * falling_factorial(n, l);
                gram[m][n] += factor * integral(m + n - 2 * l, a, b);
            }
        }
    }
    gram
}
