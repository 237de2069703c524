use crate::configuration::IntegratorConfig;
use crate::quadrature::adaptivequadrature::{
    adapt4_supervised,
    adapt4_with_report
};
use crate::quadrature::integrationreport::{
    Engine,
    IntegrationReport
};
use crate::quadrature::quadratureerror::QuadratureError;
use crate::quadrature::supervisor::Guarded;
use crate::quadrature::vsvoquadrature::{
    vsvo_supervised,
    vsvo_with_report
};

/// precision 下限：2 · f32::EPSILON
pub const MIN_PRECISION: f32 = 2.0 * f32::EPSILON;

/// 裁切後 precision 不小於此值時使用 4 階引擎
pub const VSVO_SWITCH_PRECISION: f32 = 1e-4;

/// 低於下限（或 NaN）的 precision 一律提升至下限
pub fn clamp_precision(precision: f32) -> f32 {
    precision.max(MIN_PRECISION)
}

pub fn select_engine(clamped_precision: f32, switch_precision: f32) -> Engine {
    if clamped_precision >= switch_precision {
        Engine::Adaptive4
    } else {
        Engine::Vsvo
    }
}

/// 計算 ∫_a^b f(x) dx。
///
/// `precision` 為每單位長度的絕對誤差密度。不驗證輸入：`a > b`、
/// 非有限的邊界或不連續的 f 會得到未定義的結果，且可能無法終止。
///
/// 邊界與結果為 f32；f 接收以 f64 計算的取樣點，可回傳 f32 或 f64。
///
/// ```
/// let value = compquad::integrate(|x: f64| x * x * x, 0.0, 1.0, 1e-3);
/// assert_eq!(value, 0.25);
/// ```
pub fn integrate<F, Y>(f: F, a: f32, b: f32, precision: f32) -> f32
where
    F: Fn(f64) -> Y,
    Y: Into<f64>,
{
    integrate_with_report(f, a, b, precision).value()
}

pub fn integrate_with_report<F, Y>(f: F, a: f32, b: f32, precision: f32) -> IntegrationReport
where
    F: Fn(f64) -> Y,
    Y: Into<f64>,
{
    dispatch(f, a, b, precision, VSVO_SWITCH_PRECISION)
}

fn dispatch<F, Y>(f: F, a: f32, b: f32, precision: f32, switch_precision: f32) -> IntegrationReport
where
    F: Fn(f64) -> Y,
    Y: Into<f64>,
{
    let precision = clamp_precision(precision);
    match select_engine(precision, switch_precision) {
        Engine::Adaptive4 => adapt4_with_report(f, a, b, precision),
        Engine::Vsvo => vsvo_with_report(f, a, b, precision),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Integrator
// ─────────────────────────────────────────────────────────────────────────────

/// 依設定分派的積分器；`try_integrate` 額外驗證輸入並限制迭代次數
#[derive(Clone, Debug, Default)]
pub struct Integrator {
    config: IntegratorConfig,
}

impl Integrator {
    pub fn new(config: IntegratorConfig) -> Integrator {
        Integrator { config }
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    pub fn integrate<F, Y>(&self, f: F, a: f32, b: f32, precision: f32) -> f32
    where
        F: Fn(f64) -> Y,
        Y: Into<f64>,
    {
        self.integrate_with_report(f, a, b, precision).value()
    }

    pub fn integrate_with_report<F, Y>(&self, f: F, a: f32, b: f32, precision: f32) -> IntegrationReport
    where
        F: Fn(f64) -> Y,
        Y: Into<f64>,
    {
        dispatch(f, a, b, precision, self.config.switch_precision())
    }

    /// 與 `integrate_with_report` 相同的計算，但：
    ///
    /// - 拒絕 `a > b`、非有限邊界、負值或 NaN 的 precision
    /// - 取樣值非有限時中止
    /// - 迭代次數超過 `iteration_limit` 時中止
    ///
    /// 對合法輸入，結果與取樣順序和無驗證版本完全一致。
    pub fn try_integrate<F, Y>(&self, f: F, a: f32, b: f32, precision: f32) -> Result<IntegrationReport, QuadratureError>
    where
        F: Fn(f64) -> Y,
        Y: Into<f64>,
    {
        let result = validate_inputs(a, b, precision).and_then(|_| {
            let precision = clamp_precision(precision);
            let mut guard = Guarded::new(self.config.iteration_limit());
            match select_engine(precision, self.config.switch_precision()) {
                Engine::Adaptive4 => adapt4_supervised(&f, a, b, precision, &mut guard),
                Engine::Vsvo => vsvo_supervised(&f, a, b, precision, &mut guard),
            }
        });
        if let Err(error) = &result {
            log::warn!("integration on [{}, {}] failed: {}", a, b, error);
        }
        result
    }
}

fn validate_inputs(a: f32, b: f32, precision: f32) -> Result<(), QuadratureError> {
    if !(a.is_finite() && b.is_finite()) {
        return Err(QuadratureError::NonFiniteBound { a, b });
    }
    if a > b {
        return Err(QuadratureError::InvalidInterval { a, b });
    }
    if precision.is_nan() || precision < 0.0 {
        return Err(QuadratureError::InvalidPrecision(precision));
    }
    Ok(())
}
