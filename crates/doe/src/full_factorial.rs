use crate::SamplingMethod;
use linfa::Float;
use ndarray::{Array, Array1, Array2, ArrayBase, Data, Ix2};
use ndarray_stats::QuantileExt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// The FullFactorial design consists of all possible combinations
/// of levels for all factors within the design space.
///
/// Rows are enumerated with the first factor varying slowest and the last
/// factor varying fastest, so the row order is stable and can be used as
/// candidate index by the optimal design engine.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct FullFactorial<F: Float> {
    /// Design space definition as a (nx, 2) matrix
    /// The ith row is the [lower_bound, upper_bound] of xi, the ith factor of a point x
    xlimits: Array2<F>,
}

impl<F: Float> FullFactorial<F> {
    /// Constructor given a design space given a (nx, 2) matrix \[\[lower bound, upper bound\], ...\]
    ///
    /// ```
    /// use optdoe_doe::FullFactorial;
    /// use ndarray::arr2;
    ///
    /// let doe = FullFactorial::new(&arr2(&[[-1.0, 1.0], [5.0, 10.0]]));
    /// ```
    ///
    /// **Panics** if xlimits number of columns is different from 2.
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Self {
        if xlimits.ncols() != 2 {
            panic!("xlimits must have 2 columns (lower, upper)");
        }
        FullFactorial {
            xlimits: xlimits.to_owned(),
        }
    }

    /// Number of factors of the design space
    pub fn n_factors(&self) -> usize {
        self.xlimits.nrows()
    }

    /// Generates the complete grid with `levels[j]` evenly spaced levels
    /// for the jth factor, bounds included.
    ///
    /// The resulting (prod(levels), nx) matrix belongs to the design space.
    ///
    /// ```
    /// use optdoe_doe::FullFactorial;
    /// use ndarray::arr2;
    ///
    /// let grid = FullFactorial::new(&arr2(&[[-1.0, 1.0], [-1.0, 1.0]])).levels(&[3, 2]);
    /// assert_eq!(grid.nrows(), 6);
    /// ```
    ///
    /// **Panics** if `levels` length differs from the number of factors
    /// or if a factor is given no level.
    pub fn levels(&self, levels: &[usize]) -> Array2<F> {
        let nx = self.n_factors();
        if levels.len() != nx {
            panic!(
                "levels must be given for each of the {nx} factors, got {}",
                levels.len()
            );
        }
        if levels.iter().any(|&n| n == 0) {
            panic!("each factor requires at least one level");
        }
        let grid = Self::normalized_grid(&Array1::from_vec(levels.to_vec()));
        let lower = self.xlimits.column(0);
        let scaler = &self.xlimits.column(1) - &lower;
        grid * scaler + lower
    }

    /// Grid within `[0., 1.]^nx` with `num_list[j]` levels for the jth factor.
    fn normalized_grid(num_list: &Array1<usize>) -> Array2<F> {
        let nx = num_list.len();
        let nrows = num_list.fold(1, |acc, n| acc * n);
        let mut doe = Array2::<F>::zeros((nrows, nx));

        let mut level_repeat = nrows;
        for j in 0..nx {
            let n = num_list[j];
            level_repeat /= n;
            for (i, mut row) in doe.rows_mut().into_iter().enumerate() {
                let level = (i / level_repeat) % n;
                row[j] = if n > 1 {
                    F::cast(level) / F::cast(n - 1)
                } else {
                    F::zero()
                };
            }
        }
        doe
    }
}

impl<F: Float> SamplingMethod<F> for FullFactorial<F> {
    fn sampling_space(&self) -> &Array2<F> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Array2<F> {
        //! the number of levels by factor is choosen as evenly as possible
        //! so that the grid holds at least ns points, then truncated to ns rows
        let nx = self.xlimits.nrows();
        let weights: Array1<F> = Array1::ones(nx) / F::cast(nx);
        let mut num_list: Array1<usize> = Array::ones(nx);

        while num_list.fold(1, |acc, n| acc * n) < ns {
            let w: Array1<F> = &num_list.mapv(|v| F::cast(v)) / F::cast(num_list.sum());
            let ind = (&weights - &w).argmax().unwrap();
            num_list[ind] += 1;
        }
        let grid = Self::normalized_grid(&num_list);
        grid.slice(ndarray::s![0..ns, ..]).to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr2, array};

    #[test]
    fn test_ffact() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let expected = array![
            [5., 0.],
            [5., 0.5],
            [5., 1.],
            [7.5, 0.],
            [7.5, 0.5],
            [7.5, 1.],
            [10., 0.],
            [10., 0.5],
            [10., 1.],
        ];
        let actual = FullFactorial::new(&xlimits).sample(9);
        assert_abs_diff_eq!(expected, actual, epsilon = 1e-6);
    }

    #[test]
    fn test_ffact_levels() {
        let xlimits = arr2(&[[-1., 1.], [0., 10.]]);
        let expected = array![
            [-1., 0.],
            [-1., 10.],
            [0., 0.],
            [0., 10.],
            [1., 0.],
            [1., 10.],
        ];
        let actual = FullFactorial::new(&xlimits).levels(&[3, 2]);
        assert_abs_diff_eq!(expected, actual, epsilon = 1e-12);
    }

    #[test]
    fn test_ffact_single_level_at_lower_bound() {
        let xlimits = arr2(&[[-1., 1.], [2., 4.]]);
        let actual = FullFactorial::new(&xlimits).levels(&[2, 1]);
        assert_abs_diff_eq!(array![[-1., 2.], [1., 2.]], actual, epsilon = 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_ffact_levels_bad_length() {
        let xlimits = arr2(&[[-1., 1.], [0., 10.]]);
        FullFactorial::new(&xlimits).levels(&[3]);
    }
}
