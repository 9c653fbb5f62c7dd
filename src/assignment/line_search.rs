//! Numerical helpers of the Frank-Wolfe solver. They only see plain slices and
//! closures, never the graph.

/// `1 / φ`
pub const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// Relative difference under which two objective values are considered equal.
const VALUE_EPSILON: f64 = 1e-14;

/// Minimises a unimodal `objective` on `[lower, upper]` and returns the
/// midpoint of the final bracket.
///
/// Stops after `max_steps` refinements, when the bracket is narrower than
/// `tolerance`, or when both interior values coincide.
pub fn golden_section<F>(objective: F, lower: f64, upper: f64, tolerance: f64, max_steps: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (lower, upper);
    let mut x1 = b - INV_PHI * (b - a);
    let mut x2 = a + INV_PHI * (b - a);
    let mut f1 = objective(x1);
    let mut f2 = objective(x2);

    for _ in 0..max_steps {
        if b - a < tolerance {
            break;
        }
        if (f1 - f2).abs() <= VALUE_EPSILON * f1.abs().max(f2.abs()) {
            a = x1;
            b = x2;
            break;
        }
        if f1 < f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = b - INV_PHI * (b - a);
            f1 = objective(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = a + INV_PHI * (b - a);
            f2 = objective(x2);
        }
    }

    ((a + b) / 2.0).clamp(lower, upper)
}

/// Smallest step [`golden_section`] can tell apart from zero: the final
/// bracket width on `[0, 1]`, bounded by either `tolerance` or `max_steps`.
pub fn resolution(tolerance: f64, max_steps: usize) -> f64 {
    let steps = i32::try_from(max_steps).unwrap_or(i32::MAX);
    tolerance.max(INV_PHI.powi(steps))
}

/// Method-of-successive-averages step for the zero-based `iteration`.
pub fn successive_averages_step(iteration: usize) -> f64 {
    1.0 / (iteration as f64 + 2.0)
}

/// `Σ_i cost(i, max(0, base_i + alpha * direction_i))`
pub fn objective_along<F>(base: &[f64], direction: &[f64], alpha: f64, cost: F) -> f64
where
    F: Fn(usize, f64) -> f64,
{
    base.iter()
        .zip(direction)
        .enumerate()
        .map(|(i, (x, d))| cost(i, (x + alpha * d).max(0.0)))
        .sum()
}

pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |m, v| m.max(v.abs()))
}

/// Flags a run whose step size stays below `threshold` for `patience`
/// consecutive iterations once `min_iterations` have been completed.
#[derive(Clone, Debug)]
pub struct StallDetector {
    min_iterations: usize,
    patience: usize,
    threshold: f64,
    quiet: usize,
}

impl StallDetector {
    pub fn new(min_iterations: usize, patience: usize, threshold: f64) -> Self {
        Self {
            min_iterations,
            patience,
            threshold,
            quiet: 0,
        }
    }

    /// Records the step of the `completed`-th iteration (one-based).
    pub fn observe(&mut self, completed: usize, step: f64) -> bool {
        if step < self.threshold {
            self.quiet += 1;
        } else {
            self.quiet = 0;
        }
        self.patience > 0 && self.quiet >= self.patience && completed >= self.min_iterations
    }
}
