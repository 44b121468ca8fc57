//! Natural cubic spline coefficients and Bézier control points.

/// Second-derivative coefficients of the natural cubic spline through
/// `(xs[i], ys[i])`.
///
/// Solved with one forward sweep and back substitution. Fewer than three
/// points, mismatched lengths and repeated x values yield zero coefficients
/// (straight segments).
#[must_use]
pub fn natural_spline_coefficients(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let count = xs.len();
    let mut second = vec![0.0; count];
    if count < 3 || ys.len() != count {
        return second;
    }

    let mut dup = vec![0.0; count];
    for i in 1..count - 1 {
        let dx1 = xs[i] - xs[i - 1];
        let dx2 = xs[i + 1] - xs[i - 1];
        let dx3 = xs[i + 1] - xs[i];
        let dy1 = ys[i] - ys[i - 1];
        let dy2 = ys[i + 1] - ys[i];
        let denominator = dx1 * second[i - 1] + 2.0 * dx2;
        if dx1 == 0.0 || dx3 == 0.0 || denominator == 0.0 || !denominator.is_finite() {
            second[i] = 0.0;
            dup[i] = 0.0;
            continue;
        }
        let coef1 = 1.0 / denominator;
        second[i] = -coef1 * dx3;
        dup[i] = coef1 * (6.0 * (dy2 / dx3 - dy1 / dx1) - dx1 * dup[i - 1]);
    }

    second[count - 1] = 0.0;
    for k in (0..count - 1).rev() {
        second[k] = second[k] * second[k + 1] + dup[k];
    }
    for value in &mut second {
        if !value.is_finite() {
            *value = 0.0;
        }
    }
    second
}

/// Cubic Bézier control points for the spline segment `p0 → p1`.
///
/// `m0`/`m1` are the second-derivative coefficients at both ends.
#[must_use]
pub fn spline_control_points(
    p0: (f64, f64),
    p1: (f64, f64),
    m0: f64,
    m1: f64,
) -> ((f64, f64), (f64, f64)) {
    let (x0, y0) = p0;
    let (x1, y1) = p1;
    let h = x1 - x0;
    let h2 = h * h;
    let first = (
        (2.0 * x0 + x1) / 3.0,
        ((2.0 * y0 + y1) - h2 * (m0 + 0.5 * m1) / 3.0) / 3.0,
    );
    let second = (
        (x0 + 2.0 * x1) / 3.0,
        ((y0 + 2.0 * y1) - h2 * (0.5 * m0 + m1) / 3.0) / 3.0,
    );
    (first, second)
}
