use crate::quadrature::embeddedpair::{
    Order,
    PairEstimate,
    EMBEDDED_PAIRS
};
use crate::quadrature::integrationframe::IntegrationFrame;
use crate::quadrature::integrationreport::{
    Engine,
    IntegrationReport
};
use crate::quadrature::ruletable::Samples;
use crate::quadrature::supervisor::{
    into_ok,
    Supervisor,
    Unsupervised
};

// ─────────────────────────────────────────────────────────────────────────────
// Variable-step variable-order (VSVO) 求積
// ─────────────────────────────────────────────────────────────────────────────
//
// 每個子區間固定取樣 8 次（1/7, 1/3, 3/7, 1/2, 4/7, 2/3, 6/7, 1），
// 由同一組取樣計算最多四組內嵌對（見 embeddedpair.rs）。
//
// 高階內嵌對受 stall counter（同一 x0 連續被拒次數）限制：
//   s7/s6 需 stall <= 1，s5/s4 與 s3/s2 需 stall <= 3，s1/s0 永遠計算。
//
// 只有目前選定階數的內嵌對決定本次是否接受；
// 其餘內嵌對僅用來預測步長，供下一次選擇階數。

const SLOTS: [usize; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

const INITIAL_ORDER: Order = Order::Fourth;

// ─────────────────────────────────────────────────────────────────────────────
// 階數選擇表
// ─────────────────────────────────────────────────────────────────────────────
//
// 以 order-2 的預測步長為基準，自上而下逐列比較：
//
//   order | 更新後的 stall 上限 | 比較對象
//   ------+---------------------+-------------
//     4   |         3           | 目前勝出者
//     6   |         3           | 目前勝出者
//     8   |         1           | order-2 基準
//
// 某列的 stall 上限不成立時即停止（上限由上而下遞減）。
// 本次未計算的預測步長不參與比較。

#[derive(Clone, Copy)]
enum Rival {
    Leader,
    Baseline,
}

struct SelectionRow {
    order: Order,
    stall_limit: usize,
    rival: Rival,
}

const SELECTION_TABLE: [SelectionRow; 3] = [
    SelectionRow { order: Order::Fourth, stall_limit: 3, rival: Rival::Leader },
    SelectionRow { order: Order::Sixth, stall_limit: 3, rival: Rival::Leader },
    SelectionRow { order: Order::Eighth, stall_limit: 1, rival: Rival::Baseline },
];

/// 選出下一次嘗試的階數與步長。
///
/// `projected` 依 `Order::index` 排列，None 表示該內嵌對本次未計算；
/// order-2 的位置不被讀取，基準一律使用 `baseline_step`。
pub fn select_order(baseline_step: f64, projected: &[Option<f64>; 4], stall_count: usize) -> (Order, f64) {
    let mut selected = (Order::Second, baseline_step);
    for row in &SELECTION_TABLE {
        if stall_count > row.stall_limit {
            break;
        }
        let Some(step) = projected[row.order.index()] else {
            continue;
        };
        let rival = match row.rival {
            Rival::Leader => selected.1,
            Rival::Baseline => baseline_step,
        };
        if step > rival {
            selected = (row.order, step);
        }
    }
    selected
}

/// 單一子區間嘗試的結果
#[derive(Clone, Copy, Debug, PartialEq)]
struct Attempt {
    /// 決定本次是否接受的階數
    order: Order,
    estimate: PairEstimate,
    accepted: bool,
    /// 依 `Order::index` 排列；None 表示被 stall 門檻擋下、本次未計算
    projected: [Option<f64>; 4],
    next_step: f64,
}

/// 目前階數與 stall counter
struct OrderState {
    order: Order,
    stall_count: usize,
}

impl OrderState {
    fn new() -> OrderState {
        OrderState { order: INITIAL_ORDER, stall_count: 0 }
    }

    /// 以同一組取樣計算嘗試前 stall counter 允許的內嵌對，
    /// 依目前階數判斷是否接受，更新 stall counter 後選出下一個階數與步長。
    fn attempt(&mut self, samples: &Samples, width: f64, error_target: f64, remaining: f64) -> Attempt {
        let baseline = Order::Second.pair();
        let baseline_estimate = baseline.estimate(samples, width);
        let baseline_step = baseline.project_step(&baseline_estimate, width, error_target, remaining);

        let mut estimates: [Option<PairEstimate>; 4] = [Some(baseline_estimate), None, None, None];
        let mut projected: [Option<f64>; 4] = [Some(baseline_step), None, None, None];
        for pair in EMBEDDED_PAIRS[1..].iter().filter(|pair| pair.is_open(self.stall_count)) {
            let estimate = pair.estimate(samples, width);
            projected[pair.order().index()] = Some(pair.project_step(&estimate, width, error_target, remaining));
            estimates[pair.order().index()] = Some(estimate);
        }

        // 選定階數在上一次選擇時已通過同一道門檻，這裡必定已計算
        let order = self.order;
        let estimate = estimates[order.index()].unwrap_or_else(|| order.pair().estimate(samples, width));

        let accepted = estimate.error <= error_target;
        if accepted {
            self.stall_count = 0;
        } else {
            self.stall_count += 1;
        }

        let (next_order, next_step) = select_order(baseline_step, &projected, self.stall_count);
        self.order = next_order;
        Attempt { order, estimate, accepted, projected, next_step }
    }
}

/// VSVO 積分。與 `adapt4` 相同，`precision` 應已經過下限裁切。
pub fn vsvo<F, Y>(f: F, a: f32, b: f32, precision: f32) -> f32
where
    F: Fn(f64) -> Y,
    Y: Into<f64>,
{
    vsvo_with_report(f, a, b, precision).value()
}

pub fn vsvo_with_report<F, Y>(f: F, a: f32, b: f32, precision: f32) -> IntegrationReport
where
    F: Fn(f64) -> Y,
    Y: Into<f64>,
{
    into_ok(vsvo_supervised(&f, a, b, precision, &mut Unsupervised))
}

pub fn vsvo_supervised<F, Y, S>(
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
    let mut report = IntegrationReport::new(Engine::Vsvo);
    let mut frame = IntegrationFrame::start(f, a, b, supervisor, &mut report)?;
    let mut state = OrderState::new();

    while !frame.is_complete() {
        report.record_iteration();
        supervisor.check_iteration(report.iterations(), frame.x0(), frame.h())?;

        let subinterval = frame.next_subinterval(precision);
        let samples = frame.sample(f, &subinterval, &SLOTS, supervisor, &mut report)?;
        let stall_count = state.stall_count;
        let attempt = state.attempt(&samples, subinterval.width(), subinterval.error_target(), frame.remaining());
        log::trace!(
            "vsvo: x0 = {}, width = {:e}, {}, stall = {}, pairs = {}, error = {:e}, target = {:e}, accepted = {}",
            subinterval.x0(),
            subinterval.width(),
            attempt.order,
            stall_count,
            attempt.projected.iter().flatten().count(),
            attempt.estimate.error,
            subinterval.error_target(),
            attempt.accepted
        );

        if attempt.accepted {
            frame.accept(&subinterval, attempt.estimate.approximation, &samples);
            report.record_acceptance(attempt.order);
        } else {
            report.record_rejection();
        }
        frame.set_step(attempt.next_step);
    }

    report.set_value(frame.finish());
    log::debug!(
        "vsvo on [{}, {}]: value = {}, iterations = {}, evaluations = {}, rejected = {}",
        a,
        b,
        report.value(),
        report.iterations(),
        report.evaluations(),
        report.rejected()
    );
    Ok(report)
}
