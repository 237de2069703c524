use std::convert::Infallible;

use crate::quadrature::quadratureerror::QuadratureError;

// ─────────────────────────────────────────────────────────────────────────────
// Supervisor
// ─────────────────────────────────────────────────────────────────────────────
//
// 引擎在每次取樣與每次迭代時呼叫 supervisor。
// 預設的 Unsupervised 錯誤型別為 Infallible，檢查會被內聯消除，
// 不影響無驗證 API 的行為與成本。

pub trait Supervisor {
    type Error;

    fn check_sample(&mut self, x: f64, value: f64) -> Result<(), Self::Error>;

    /// `iteration` 從 1 起算，於取樣之前呼叫
    fn check_iteration(&mut self, iteration: usize, x0: f32, h: f32) -> Result<(), Self::Error>;
}

pub struct Unsupervised;

impl Supervisor for Unsupervised {
    type Error = Infallible;

    #[inline(always)]
    fn check_sample(&mut self, _x: f64, _value: f64) -> Result<(), Infallible> {
        Ok(())
    }

    #[inline(always)]
    fn check_iteration(&mut self, _iteration: usize, _x0: f32, _h: f32) -> Result<(), Infallible> {
        Ok(())
    }
}

/// 拒絕非有限值的取樣，並可限制迭代次數
pub struct Guarded {
    iteration_limit: Option<usize>,
}

impl Guarded {
    pub fn new(iteration_limit: Option<usize>) -> Guarded {
        Guarded { iteration_limit }
    }
}

impl Supervisor for Guarded {
    type Error = QuadratureError;

    fn check_sample(&mut self, x: f64, value: f64) -> Result<(), QuadratureError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(QuadratureError::NonFiniteSample { x, value })
        }
    }

    fn check_iteration(&mut self, iteration: usize, x0: f32, h: f32) -> Result<(), QuadratureError> {
        match self.iteration_limit {
            Some(limit) if iteration > limit => {
                Err(QuadratureError::IterationLimitExceeded { limit, x0, h })
            }
            _ => Ok(()),
        }
    }
}

pub fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
