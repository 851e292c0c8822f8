//! Chebyshev series evaluation for SPK type 2 records.

/// Value of `sum(c_k * T_k(s))` via the Clenshaw recurrence, `s` in `[-1, 1]`.
pub fn evaluate(coeffs: &[f64], s: f64) -> f64 {
    match coeffs.len() {
        0 => 0.0,
        1 => coeffs[0],
        n => {
            let two_s = 2.0 * s;
            let mut b1 = 0.0;
            let mut b2 = 0.0;
            for &c in coeffs[1..n].iter().rev() {
                let b0 = two_s * b1 - b2 + c;
                b2 = b1;
                b1 = b0;
            }
            s * b1 - b2 + coeffs[0]
        }
    }
}

/// Derivative of the series with respect to `s`.
///
/// Walks `T_k` and `T_k'` forward together:
/// `T_k' = 2 T_{k-1} + 2s T_{k-1}' - T_{k-2}'`.
pub fn derivative(coeffs: &[f64], s: f64) -> f64 {
    if coeffs.len() <= 1 {
        return 0.0;
    }

    let two_s = 2.0 * s;
    let (mut t2, mut dt2) = (1.0, 0.0);
    let (mut t1, mut dt1) = (s, 1.0);
    let mut sum = coeffs[1];

    for &c in &coeffs[2..] {
        let t = two_s * t1 - t2;
        let dt = 2.0 * t1 + two_s * dt1 - dt2;
        sum += c * dt;
        t2 = t1;
        t1 = t;
        dt2 = dt1;
        dt1 = dt;
    }

    sum
}
