use crate::quadrature::embeddedpair::Order;
use crate::quadrature::integrationframe::IntegrationFrame;
use crate::quadrature::integrationreport::{
    Engine,
    IntegrationReport
};
use crate::quadrature::supervisor::{
    into_ok,
    Supervisor,
    Unsupervised
};

// ─────────────────────────────────────────────────────────────────────────────
// 固定 4 階自適應求積
// ─────────────────────────────────────────────────────────────────────────────
//
// 每個子區間取樣 1/3、1/2、2/3 與右端點（左端點沿用上一段），
// 以 three-eighths (s3) 與 Simpson (s2) 組成內嵌對：
//
//   error  = 0.8 · |s3 - s2|
//   target = h · p / (b - a)          （h 為裁切後的實際寬度 x1 - x0）
//   h     ← h · 0.9 · (target / error)^(1/4)       （error = 0 時 h ← b - x0）
//
// error < target 時接受 s3；否則以縮小後的 h 從同一個 x0 重試。

const SLOTS: [usize; 4] = [2, 4, 6, 8];

/// 4 階自適應積分。
///
/// `precision` 應已經過下限裁切（見 `integrator::clamp_precision`）；
/// 直接傳入 0 時，除非估計誤差恰為 0，否則無法接受任何子區間。
pub fn adapt4<F, Y>(f: F, a: f32, b: f32, precision: f32) -> f32
where
    F: Fn(f64) -> Y,
    Y: Into<f64>,
{
    adapt4_with_report(f, a, b, precision).value()
}

pub fn adapt4_with_report<F, Y>(f: F, a: f32, b: f32, precision: f32) -> IntegrationReport
where
    F: Fn(f64) -> Y,
    Y: Into<f64>,
{
    into_ok(adapt4_supervised(&f, a, b, precision, &mut Unsupervised))
}

pub fn adapt4_supervised<F, Y, S>(
    f: &F,
    a: f32,
    b: f32,
    precision: f32,
    supervisor: &mut S,
) -> Result<IntegrationReport, S::Error>
where
    F: Fn(f64) -> Y,
    Y: Into<f64>,
    S: Supervisor,
{
    let pair = Order::Fourth.pair();
    let mut report = IntegrationReport::new(Engine::Adaptive4);
    let mut frame = IntegrationFrame::start(f, a, b, supervisor, &mut report)?;

    while !frame.is_complete() {
        report.record_iteration();
        supervisor.check_iteration(report.iterations(), frame.x0(), frame.h())?;

        let subinterval = frame.next_subinterval(precision);
        let samples = frame.sample(f, &subinterval, &SLOTS, supervisor, &mut report)?;
        let estimate = pair.estimate(&samples, subinterval.width());
        let error_target = subinterval.error_target();

        let next_h = pair.project_step(&estimate, subinterval.width(), error_target, frame.remaining());
        let accepted = estimate.error < error_target;
        log::trace!(
            "adapt4: x0 = {}, width = {:e}, error = {:e}, target = {:e}, accepted = {}",
            subinterval.x0(),
            subinterval.width(),
            estimate.error,
            error_target,
            accepted
        );

        frame.set_step(next_h);
        if accepted {
            frame.accept(&subinterval, estimate.approximation, &samples);
            report.record_acceptance(Order::Fourth);
        } else {
            report.record_rejection();
        }
    }

    report.set_value(frame.finish());
    log::debug!(
        "adapt4 on [{}, {}]: value = {}, iterations = {}, evaluations = {}",
        a,
        b,
        report.value(),
        report.iterations(),
        report.evaluations()
    );
    Ok(report)
}
