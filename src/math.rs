/// Piecewise-linear interpolation of `ys` over the strictly ascending grid
/// `xs`, clamped to the boundary values outside the grid.
pub(crate) fn interp_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert!(xs.len() == ys.len());
    debug_assert!(xs.len() >= 2);

    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    // First grid index with xs[hi] >= x; the checks above pin hi to 1..=last.
    let hi = xs.partition_point(|&grid| grid < x);
    let lo = hi - 1;
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + t * (ys[hi] - ys[lo])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn check_linear_grid(x in -1f64..5f64) {
            let xs = [0., 1., 2., 3.];
            let ys = [0., 10., 20., 30.];
            let expected = 10. * x.clamp(0., 3.);
            let got = interp_clamped(&xs, &ys, x);
            prop_assert!((got - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn check_grid_nodes() {
        let xs = [0., 0.5, 2., 4.];
        let ys = [1., -3., 7., 7.5];
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            assert_eq!(interp_clamped(&xs, &ys, x), y);
        }
    }

    #[test]
    fn check_midpoints() {
        let xs = [0., 2., 6.];
        let ys = [4., 8., 0.];
        assert_eq!(interp_clamped(&xs, &ys, 1.), 6.);
        assert_eq!(interp_clamped(&xs, &ys, 4.), 4.);
    }

    #[test]
    fn check_clamping() {
        let xs = [1., 2., 3.];
        let ys = [5., 6., 9.];
        assert_eq!(interp_clamped(&xs, &ys, 0.), 5.);
        assert_eq!(interp_clamped(&xs, &ys, 10.), 9.);
    }
}
