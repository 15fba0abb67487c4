use linfa::Float;
use ndarray::Array2;

/// A generator of points within a box-shaped design space.
///
/// The design space is `[lower_1, upper_1] x ... x [lower_nx, upper_nx]`,
/// `nx` being the number of factors. Generated points are meant to be used
/// as candidates among which an optimal design is selected.
pub trait SamplingMethod<F: Float> {
    /// The (nx, 2) matrix of factor bounds, the ith row being `[lower_i, upper_i]`
    fn sampling_space(&self) -> &Array2<F>;

    /// Generates `ns` points within the unit hypercube `[0., 1.]^nx`
    fn normalized_sample(&self, ns: usize) -> Array2<F>;

    /// Generates `ns` points within the design space as a (ns, nx) matrix,
    /// that is the normalized sample mapped onto the factor bounds.
    fn sample(&self, ns: usize) -> Array2<F> {
        let xlimits = self.sampling_space();
        let lower = xlimits.column(0);
        let width = &xlimits.column(1) - &lower;
        self.normalized_sample(ns) * width + lower
    }
}
