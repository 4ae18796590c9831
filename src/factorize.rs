
// imports
use crate::error::{Error, Result};

use ndarray::{s, Array1, Array2, ArrayView2, Axis, Zip};
use ndarray_stats::QuantileExt;
use tracing::debug;

const MAX_SWEEPS: usize = 64;
// columns count as orthogonal once |<a_p, a_q>| <= TOLERANCE * |a_p| |a_q|
const TOLERANCE: f64 = 1e-11;

/// Left singular vectors of a matrix, columns ordered by descending singular value.
#[derive(Clone, Debug)]
pub struct Svd {
    /// `rows × k`, orthonormal columns.
    pub u: Array2<f64>,
    /// One value per column of `u`, non-increasing.
    pub singular_values: Array1<f64>,
}

/// Full singular value decomposition by one-sided (Hestenes) Jacobi rotations,
/// keeping `U` and the singular values.
///
/// Singular vectors are unique only up to sign, so each column is flipped to make
/// its largest-magnitude entry positive. Columns for zero singular values are
/// completed to an orthonormal basis from the standard basis, which keeps `U`
/// square when `max_dim` is `None`. With `max_dim` the leading columns are kept.
pub fn left_singular_vectors(a: ArrayView2<f64>, max_dim: Option<usize>) -> Result<Svd> {

    for ((row, col), v) in a.indexed_iter() {
        if !v.is_finite() {
            return Err(Error::NonFinite { row, col });
        }
    }

    let n = a.nrows();
    if n == 0 {
        return Ok(Svd { u: Array2::zeros((0, 0)), singular_values: Array1::zeros(0) });
    }

    // columns at or below this norm are rounding noise
    let frobenius = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let cutoff = frobenius * (n.max(a.ncols()) as f64) * f64::EPSILON;

    // rows of `w` are the columns of `a`, rotated until mutually orthogonal
    let mut w: Array2<f64> = a.t().to_owned();
    let sweeps = orthogonalize(&mut w, cutoff * cutoff)?;

    let norms: Vec<f64> = w.axis_iter(Axis(0)).map(|col| col.dot(&col).sqrt()).collect();
    let mut order: Vec<usize> = (0..norms.len()).collect();
    order.sort_by(|&i, &j| norms[j].total_cmp(&norms[i]));

    let mut columns: Vec<Array1<f64>> = Vec::with_capacity(n);
    let mut singular_values: Vec<f64> = Vec::with_capacity(n);
    for &i in &order {
        if columns.len() == n || norms[i] <= cutoff {
            break;
        }
        columns.push(w.row(i).mapv(|x| x / norms[i]));
        singular_values.push(norms[i]);
    }
    let rank = columns.len();

    complete_basis(&mut columns, n)?;
    singular_values.resize(n, 0.0);

    let k = max_dim.map(|d| d.min(n)).unwrap_or(n);
    let mut u: Array2<f64> = Array2::zeros((n, k));
    for (j, mut col) in u.axis_iter_mut(Axis(1)).enumerate() {
        let source = &columns[j];
        // pivot on the largest magnitude entry for a deterministic sign
        let pivot = source
            .mapv(f64::abs)
            .argmax()
            .map_err(|e| Error::Factorization(e.to_string()))?;
        let sign = if source[pivot] < 0.0 { -1.0 } else { 1.0 };
        col.assign(&source.mapv(|x| sign * x));
    }

    debug!(n, k, rank, sweeps, "factorized matrix");
    Ok(Svd { u, singular_values: Array1::from(singular_values).slice_move(s![..k]) })
}

/// Cyclic Jacobi sweeps over row pairs of `w`. Returns the number of sweeps taken.
///
/// Rows whose squared norm is at or below `negligible` are left alone: their
/// inner products are rounding noise and would never pass the relative test.
fn orthogonalize(w: &mut Array2<f64>, negligible: f64) -> Result<usize> {

    let m = w.nrows();

    for sweep in 0..MAX_SWEEPS {

        let mut rotated = false;

        for p in 0..m {
            for q in (p + 1)..m {

                let (mut ap, mut aq) = w.multi_slice_mut((s![p, ..], s![q, ..]));
                let alpha = ap.dot(&ap);
                let beta = aq.dot(&aq);
                let gamma = ap.dot(&aq);

                if alpha <= negligible || beta <= negligible {
                    continue;
                }
                if gamma.abs() <= TOLERANCE * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;

                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + zeta.hypot(1.0));
                let c = 1.0 / t.hypot(1.0);
                let s = c * t;

                Zip::from(&mut ap).and(&mut aq).for_each(|x, y| {
                    let (xp, yq) = (*x, *y);
                    *x = c * xp - s * yq;
                    *y = s * xp + c * yq;
                });
            }
        }

        if !rotated {
            return Ok(sweep + 1);
        }
    }

    Err(Error::Factorization(format!("no convergence after {} sweeps", MAX_SWEEPS)))
}

/// Extends orthonormal `columns` to `n` vectors with Gram-Schmidt over the standard basis.
fn complete_basis(columns: &mut Vec<Array1<f64>>, n: usize) -> Result<()> {

    let mut e = 0;
    while columns.len() < n {

        if e == n {
            return Err(Error::Factorization("could not complete the singular basis".into()));
        }

        let mut v: Array1<f64> = Array1::zeros(n);
        v[e] = 1.0;
        e += 1;

        // twice is enough
        for _ in 0..2 {
            for col in columns.iter() {
                let proj = col.dot(&v);
                v.scaled_add(-proj, col);
            }
        }

        let norm = v.dot(&v).sqrt();
        if norm > 1e-8 {
            v.mapv_inplace(|x| x / norm);
            columns.push(v);
        }
    }
    Ok(())
}
