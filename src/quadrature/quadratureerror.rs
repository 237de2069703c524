use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadratureError {
    #[error("invalid interval [{a}, {b}]: bounds must satisfy a <= b")]
    InvalidInterval { a: f32, b: f32 },

    #[error("non-finite bound in interval [{a}, {b}]")]
    NonFiniteBound { a: f32, b: f32 },

    #[error("invalid precision {0}: must be a non-negative number")]
    InvalidPrecision(f32),

    #[error("integrand returned non-finite value {value} at x = {x}")]
    NonFiniteSample { x: f64, value: f64 },

    #[error("exceeded {limit} iterations at x = {x0} (step {h:.3e})")]
    IterationLimitExceeded { limit: usize, x0: f32, h: f32 },
}
