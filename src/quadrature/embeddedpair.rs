use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize
};

use crate::quadrature::ruletable::{
    QuadratureRule,
    Samples,
    MIDPOINT,
    MIXED_EIGHT_POINT,
    MIXED_SEVEN_POINT,
    SEVENTHS_SIX_POINT,
    SIMPSON,
    THIRDS_FIVE_POINT,
    THREE_EIGHTHS,
    TRAPEZOID
};

/// 每次步長預測乘上的安全係數
pub const SAFETY_FACTOR: f64 = 0.9;

// ─────────────────────────────────────────────────────────────────────────────
// Order
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    Second,
    Fourth,
    Sixth,
    Eighth,
}

impl Order {
    pub const ALL: [Order; 4] = [Order::Second, Order::Fourth, Order::Sixth, Order::Eighth];

    pub fn value(&self) -> u32 {
        match self {
            Order::Second => 2,
            Order::Fourth => 4,
            Order::Sixth => 6,
            Order::Eighth => 8,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Order::Second => 0,
            Order::Fourth => 1,
            Order::Sixth => 2,
            Order::Eighth => 3,
        }
    }

    pub fn pair(&self) -> &'static EmbeddedPair {
        &EMBEDDED_PAIRS[self.index()]
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order-{}", self.value())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EmbeddedPair
// ─────────────────────────────────────────────────────────────────────────────
//
// 兩條規則共用同一組取樣，差值乘上誤差尺度即為高階規則的局部誤差估計：
//
//   error = | scale · (s_high - s_low) |
//
// 尺度由兩者截斷誤差係數 c_high、c_low 導出：scale = c_high / (c_low - c_high)
//
//   s3/s2:  (1/270) / (1/120 - 1/270)              = 4/5
//   s5/s4:  (1/9604) / (1/1512 + 1/9604)           = 54/397
//   s7/s6:  (1/72030) / (11/740880 - 1/72030)      = 72/5
//
// s1/s0 使用固定的 1/3。

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairEstimate {
    /// 高階規則的近似值
    pub approximation: f64,
    pub error: f64,
}

pub struct EmbeddedPair {
    order: Order,
    higher: &'static QuadratureRule,
    lower: &'static QuadratureRule,
    error_scale: f64,
    step_exponent: f64,
    /// 嘗試前的 stall counter 不得超過此值；None 表示永遠計算
    stall_gate: Option<usize>,
}

impl EmbeddedPair {
    pub fn order(&self) -> Order {
        self.order
    }

    pub fn higher(&self) -> &'static QuadratureRule {
        self.higher
    }

    pub fn lower(&self) -> &'static QuadratureRule {
        self.lower
    }

    pub fn is_open(&self, stall_count: usize) -> bool {
        self.stall_gate.is_none_or(|gate| stall_count <= gate)
    }

    pub fn estimate(&self, samples: &Samples, h: f64) -> PairEstimate {
        let high = self.higher.apply(samples, h);
        let low = self.lower.apply(samples, h);
        PairEstimate {
            approximation: high,
            error: (self.error_scale * (high - low)).abs(),
        }
    }

    /// 依估計誤差預測下一步長
    ///
    ///   h_next = h · 0.9 · (target / error)^(1/order)
    ///
    /// 誤差為 0 時直接跳到區間終點：回傳 `remaining`（= b - x0）。
    pub fn project_step(&self, estimate: &PairEstimate, h: f64, error_target: f64, remaining: f64) -> f64 {
        if estimate.error == 0.0 {
            remaining
        } else {
            h * SAFETY_FACTOR * (error_target / estimate.error).powf(self.step_exponent)
        }
    }
}

/// 依 Order::index 排列
pub static EMBEDDED_PAIRS: [EmbeddedPair; 4] = [
    EmbeddedPair {
        order: Order::Second,
        higher: &TRAPEZOID,
        lower: &MIDPOINT,
        error_scale: 1.0 / 3.0,
        step_exponent: 1.0 / 2.0,
        stall_gate: None,
    },
    EmbeddedPair {
        order: Order::Fourth,
        higher: &THREE_EIGHTHS,
        lower: &SIMPSON,
        error_scale: 4.0 / 5.0,
        step_exponent: 1.0 / 4.0,
        stall_gate: Some(3),
    },
    EmbeddedPair {
        order: Order::Sixth,
        higher: &SEVENTHS_SIX_POINT,
        lower: &THIRDS_FIVE_POINT,
        error_scale: 54.0 / 397.0,
        step_exponent: 1.0 / 6.0,
        stall_gate: Some(3),
    },
    EmbeddedPair {
        order: Order::Eighth,
        higher: &MIXED_EIGHT_POINT,
        lower: &MIXED_SEVEN_POINT,
        error_scale: 72.0 / 5.0,
        step_exponent: 1.0 / 8.0,
        stall_gate: Some(1),
    },
];
