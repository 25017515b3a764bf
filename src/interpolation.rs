// Chebyshev polynomial interpolation on a finite interval
//
// Used by the continuum channels to approximate an excitation-energy density,
// integrate it into a cumulative distribution and invert that distribution by
// root finding.

use crate::error::{DecayError, Result};

/// Polynomial approximation f(x) ≈ Σ c_j T_j(t) with t the image of x in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevInterpolant {
    a: f64,
    b: f64,
    coefficients: Vec<f64>,
}

/// Outcome of an adaptive build
#[derive(Debug, Clone)]
pub struct AdaptiveBuild {
    pub interpolant: ChebyshevInterpolant,
    /// Whether the trailing coefficients fell below the requested tolerance
    pub converged: bool,
}

/// Chebyshev-Lobatto node k of an n-interval grid, mapped to [a, b]
fn lobatto_node(a: f64, b: f64, k: usize, n: usize) -> f64 {
    let t = (std::f64::consts::PI * k as f64 / n as f64).cos();
    0.5 * (a + b) + 0.5 * (b - a) * t
}

impl ChebyshevInterpolant {
    /// Interpolate `f` on `[a, b]` using `degree + 1` Chebyshev-Lobatto nodes.
    pub fn build<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, degree: usize) -> Self {
        let n = degree.max(1);
        let values: Vec<f64> = (0..=n).map(|k| f(lobatto_node(a, b, k, n))).collect();
        Self::from_node_values(a, b, &values)
    }

    /// Interpolate a fallible function, doubling the node count from
    /// `initial_degree` until the trailing coefficients are below `tolerance`
    /// (relative to the largest coefficient) or `max_degree` is reached.
    ///
    /// Node values are reused between doublings: the Lobatto grid with 2n
    /// intervals contains the grid with n intervals at its even indices.
    pub fn build_adaptive<F>(
        mut f: F,
        a: f64,
        b: f64,
        initial_degree: usize,
        max_degree: usize,
        tolerance: f64,
    ) -> Result<AdaptiveBuild>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        let mut n = initial_degree.max(2);
        let mut values = Vec::with_capacity(n + 1);
        for k in 0..=n {
            values.push(f(lobatto_node(a, b, k, n))?);
        }

        loop {
            let interpolant = Self::from_node_values(a, b, &values);
            let converged = interpolant.tail_is_small(tolerance);
            if converged || 2 * n > max_degree {
                return Ok(AdaptiveBuild {
                    interpolant,
                    converged,
                });
            }

            let n2 = 2 * n;
            let mut refined = Vec::with_capacity(n2 + 1);
            for k in 0..=n2 {
                if k % 2 == 0 {
                    refined.push(values[k / 2]);
                } else {
                    refined.push(f(lobatto_node(a, b, k, n2))?);
                }
            }
            values = refined;
            n = n2;
        }
    }

    /// Build from function values at the Lobatto nodes x_k, k = 0..=n
    /// (x_0 = b, x_n = a).
    pub fn from_node_values(a: f64, b: f64, values: &[f64]) -> Self {
        let n = values.len().saturating_sub(1);
        if n == 0 {
            return Self {
                a,
                b,
                coefficients: vec![values.first().copied().unwrap_or(0.0)],
            };
        }

        let pi_over_n = std::f64::consts::PI / n as f64;
        let mut coefficients = Vec::with_capacity(n + 1);
        for j in 0..=n {
            let mut sum = 0.0;
            for (k, &v) in values.iter().enumerate() {
                let term = v * (pi_over_n * (j * k) as f64).cos();
                sum += if k == 0 || k == n { 0.5 * term } else { term };
            }
            let mut c = 2.0 * sum / n as f64;
            if j == 0 || j == n {
                c *= 0.5;
            }
            coefficients.push(c);
        }

        Self { a, b, coefficients }
    }

    fn tail_is_small(&self, tolerance: f64) -> bool {
        let scale = self
            .coefficients
            .iter()
            .fold(0.0_f64, |m, c| m.max(c.abs()));
        if scale == 0.0 {
            return true;
        }
        let n = self.coefficients.len();
        let tail = self.coefficients[n.saturating_sub(2)..]
            .iter()
            .fold(0.0_f64, |m, c| m.max(c.abs()));
        tail <= tolerance * scale
    }

    pub fn lower_bound(&self) -> f64 {
        self.a
    }

    pub fn upper_bound(&self) -> f64 {
        self.b
    }

    /// Polynomial degree of the approximation
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluate the interpolant (Clenshaw recurrence). Points outside
    /// `[a, b]` are clamped to the interval.
    pub fn evaluate(&self, x: f64) -> f64 {
        let width = self.b - self.a;
        let t = if width > 0.0 {
            ((2.0 * x - self.a - self.b) / width).clamp(-1.0, 1.0)
        } else {
            0.0
        };

        let mut b1 = 0.0;
        let mut b2 = 0.0;
        for &c in self.coefficients.iter().skip(1).rev() {
            let b0 = 2.0 * t * b1 - b2 + c;
            b2 = b1;
            b1 = b0;
        }
        t * b1 - b2 + self.coefficients[0]
    }

    /// Antiderivative of the interpolant that vanishes at the lower bound.
    pub fn cdf(&self) -> ChebyshevInterpolant {
        let c = &self.coefficients;
        let n = c.len();
        let half_width = 0.5 * (self.b - self.a);
        let coef = |j: usize| if j < n { c[j] } else { 0.0 };

        let mut integral = vec![0.0; n + 1];
        integral[1] = coef(0) - 0.5 * coef(2);
        for (j, slot) in integral.iter_mut().enumerate().skip(2) {
            *slot = (coef(j - 1) - coef(j + 1)) / (2.0 * j as f64);
        }
        for slot in integral.iter_mut() {
            *slot *= half_width;
        }

        // choose the constant so that F(a) = F(t = -1) = 0
        let mut at_lower = 0.0;
        for (j, &cj) in integral.iter().enumerate().skip(1) {
            at_lower += if j % 2 == 0 { cj } else { -cj };
        }
        integral[0] = -at_lower;

        ChebyshevInterpolant {
            a: self.a,
            b: self.b,
            coefficients: integral,
        }
    }

    /// Solve `self(x) = target` on `[a, b]` for a non-decreasing interpolant.
    ///
    /// Newton steps use `derivative`; a step that leaves the current bracket
    /// or meets a non-positive derivative is replaced by bisection.
    pub fn invert(
        &self,
        target: f64,
        derivative: &ChebyshevInterpolant,
        tolerance: f64,
        max_iterations: usize,
    ) -> Result<f64> {
        let (mut lo, mut hi) = (self.a, self.b);
        let f_lo = self.evaluate(lo);
        let f_hi = self.evaluate(hi);
        if !(f_lo.is_finite() && f_hi.is_finite() && target.is_finite()) {
            return Err(DecayError::NumericalConvergenceFailure {
                target,
                iterations: 0,
            });
        }
        if target <= f_lo {
            return Ok(lo);
        }
        if target >= f_hi {
            return Ok(hi);
        }

        let x_tol = tolerance * (hi - lo).max(f64::MIN_POSITIVE);
        let y_tol = 1e-15 * f_hi.abs().max(f_lo.abs()).max(f64::MIN_POSITIVE);
        let mut x = lo + (target - f_lo) / (f_hi - f_lo) * (hi - lo);

        for _ in 0..max_iterations {
            let g = self.evaluate(x) - target;
            if !g.is_finite() {
                break;
            }
            if g.abs() <= y_tol {
                return Ok(x);
            }
            if g < 0.0 {
                lo = x;
            } else {
                hi = x;
            }
            if hi - lo <= x_tol {
                return Ok(0.5 * (lo + hi));
            }

            let slope = derivative.evaluate(x);
            let newton = x - g / slope;
            x = if slope > 0.0 && newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };
        }

        Err(DecayError::NumericalConvergenceFailure {
            target,
            iterations: max_iterations,
        })
    }
}
