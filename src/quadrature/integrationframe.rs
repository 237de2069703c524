use crate::quadrature::integrationreport::IntegrationReport;
use crate::quadrature::ruletable::{
    Samples,
    LAST_SLOT,
    NODES,
    NODE_COUNT
};
use crate::quadrature::supervisor::Supervisor;

// ─────────────────────────────────────────────────────────────────────────────
// Subinterval
// ─────────────────────────────────────────────────────────────────────────────

/// 單次嘗試的子區間 [x0, x1]，x1 已被裁切使其不超過 b
///
/// 規則權重與內部取樣點都以實際寬度 x1 - x0（f64 精確相減）計算，
/// 而非 f32 的步長 h：h 很小時 x0 + h 經 f32 捨入後與 h 相差可達半個 ulp。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Subinterval {
    x0: f32,
    x1: f32,
    width: f64,
    error_target: f64,
}

impl Subinterval {
    pub fn x0(&self) -> f32 {
        self.x0
    }

    pub fn x1(&self) -> f32 {
        self.x1
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// 依寬度比例分配的局部誤差預算：width · p / (b - a)
    pub fn error_target(&self) -> f64 {
        self.error_target
    }

    /// slot 對應的取樣點，以 f64 傳給被積函數；端點直接使用 x0、x1
    pub fn abscissa(&self, slot: usize) -> f64 {
        match slot {
            0 => self.x0 as f64,
            LAST_SLOT => self.x1 as f64,
            _ => self.x0 as f64 + NODES[slot] * self.width,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IntegrationFrame
// ─────────────────────────────────────────────────────────────────────────────
//
// 單次積分呼叫的全部狀態。
//
// x0、h、b 以呼叫端寬度（f32）保存：終止條件是 x0 == b 的精確比較，
// 而每次接受時 x0 直接取自已裁切的 x1，因此最終必定恰好等於 b。
// 內部取樣點、取樣值與累加器則以 f64 計算與保存。

pub struct IntegrationFrame {
    b: f32,
    span: f64,
    x0: f32,
    h: f32,
    f_start: f64,
    accumulator: f64,
}

impl IntegrationFrame {
    /// 於 a 處取樣一次並建立狀態
    pub fn start<F, Y, S>(
        f: &F,
        a: f32,
        b: f32,
        supervisor: &mut S,
        report: &mut IntegrationReport,
    ) -> Result<IntegrationFrame, S::Error>
    where
        F: Fn(f64) -> Y,
        Y: Into<f64>,
        S: Supervisor,
    {
        let f_start = evaluate(f, a as f64, supervisor, report)?;
        Ok(IntegrationFrame {
            b,
            span: b as f64 - a as f64,
            x0: a,
            h: b - a,
            f_start,
            accumulator: 0.0,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.x0 == self.b
    }

    pub fn x0(&self) -> f32 {
        self.x0
    }

    pub fn h(&self) -> f32 {
        self.h
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// b - x0，誤差為 0 時的下一步長
    pub fn remaining(&self) -> f64 {
        (self.b - self.x0) as f64
    }

    pub fn next_subinterval(&mut self, precision: f32) -> Subinterval {
        let mut x1 = self.x0 + self.h;
        if x1 > self.b {
            self.h = self.b - self.x0;
            x1 = self.b;
        }
        let width = x1 as f64 - self.x0 as f64;
        Subinterval {
            x0: self.x0,
            x1,
            width,
            error_target: width * precision as f64 / self.span,
        }
    }

    /// 依序對 `slots` 取樣；slot 0 沿用上一個子區間的右端值
    pub fn sample<F, Y, S>(
        &self,
        f: &F,
        subinterval: &Subinterval,
        slots: &[usize],
        supervisor: &mut S,
        report: &mut IntegrationReport,
    ) -> Result<Samples, S::Error>
    where
        F: Fn(f64) -> Y,
        Y: Into<f64>,
        S: Supervisor,
    {
        let mut samples = [0.0; NODE_COUNT];
        samples[0] = self.f_start;
        for &slot in slots {
            samples[slot] = evaluate(f, subinterval.abscissa(slot), supervisor, report)?;
        }
        Ok(samples)
    }

    pub fn accept(&mut self, subinterval: &Subinterval, approximation: f64, samples: &Samples) {
        self.accumulator += approximation;
        self.x0 = subinterval.x1;
        self.f_start = samples[LAST_SLOT];
    }

    pub fn set_step(&mut self, h: f64) {
        self.h = h as f32;
    }

    pub fn finish(self) -> f32 {
        self.accumulator as f32
    }
}

fn evaluate<F, Y, S>(f: &F, x: f64, supervisor: &mut S, report: &mut IntegrationReport) -> Result<f64, S::Error>
where
    F: Fn(f64) -> Y,
    Y: Into<f64>,
    S: Supervisor,
{
    let value: f64 = f(x).into();
    report.record_evaluation();
    supervisor.check_sample(x, value)?;
    Ok(value)
}
