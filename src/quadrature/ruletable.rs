// ─────────────────────────────────────────────────────────────────────────────
// 共用取樣節點
// ─────────────────────────────────────────────────────────────────────────────
//
// 所有求積規則共用同一組子區間內的相對位置（以子區間寬度 h 為單位）：
//
//   slot:   0    1    2    3    4    5    6    7    8
//   node:   0   1/7  1/3  3/7  1/2  4/7  2/3  6/7   1
//
// 節點對中點對稱：slot i 與 slot 8 - i 互為鏡像，
// 因此每條規則只儲存中點左側的權重，右側由鏡像補齊。

pub const NODE_COUNT: usize = 9;

pub const MIDPOINT_SLOT: usize = 4;

pub const LAST_SLOT: usize = NODE_COUNT - 1;

pub const NODES: [f64; NODE_COUNT] = [
    0.0,
    1.0 / 7.0,
    1.0 / 3.0,
    3.0 / 7.0,
    0.5,
    4.0 / 7.0,
    2.0 / 3.0,
    6.0 / 7.0,
    1.0,
];

/// 一次子區間取樣的結果，以 slot 索引。
///
/// 未被取樣的 slot 保持 0.0；每條規則只會讀取自己用到的 slot。
pub type Samples = [f64; NODE_COUNT];

pub const fn mirror_slot(slot: usize) -> usize {
    LAST_SLOT - slot
}

// ─────────────────────────────────────────────────────────────────────────────
// QuadratureRule
// ─────────────────────────────────────────────────────────────────────────────

/// Composite Newton-Cotes-family rule over the shared node set.
///
/// The rule applied to `[x0, x0 + h]` is `h · Σ wᵢ · f(x0 + nodeᵢ · h)`.
pub struct QuadratureRule {
    name: &'static str,
    /// (slot, weight)，僅含中點左側
    half_weights: &'static [(usize, f64)],
    midpoint_weight: Option<f64>,
    degree: u32,
}

impl QuadratureRule {
    const fn new(
        name: &'static str,
        half_weights: &'static [(usize, f64)],
        midpoint_weight: Option<f64>,
        degree: u32,
    ) -> QuadratureRule {
        QuadratureRule { name, half_weights, midpoint_weight, degree }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 規則可精確積分的多項式最高次數
    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn uses_slot(&self, slot: usize) -> bool {
        self.weight(slot) != 0.0
    }

    /// 展開後（含鏡像）在 slot 上的權重
    pub fn weight(&self, slot: usize) -> f64 {
        if slot == MIDPOINT_SLOT {
            return self.midpoint_weight.unwrap_or(0.0);
        }
        let left = if slot < MIDPOINT_SLOT { slot } else { mirror_slot(slot) };
        self.half_weights
            .iter()
            .find(|(s, _)| *s == left)
            .map_or(0.0, |(_, w)| *w)
    }

    pub fn apply(&self, samples: &Samples, h: f64) -> f64 {
        let mut sum = 0.0;
        for &(slot, w) in self.half_weights {
            sum += w * (samples[slot] + samples[mirror_slot(slot)]);
        }
        if let Some(w) = self.midpoint_weight {
            sum += w * samples[MIDPOINT_SLOT];
        }
        h * sum
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 權重表
// ─────────────────────────────────────────────────────────────────────────────
//
// 各規則的截斷誤差（於單位區間上，以 f^(d+1) 的首項係數表示）：
//
//   s0 midpoint       -1/12      s1 trapezoid       1/6
//   s2 Simpson         1/120     s3 three-eighths   1/270
//   s4                 1/1512    s5                -1/9604
//   s6                11/740880  s7                 1/72030
//
// 內嵌對（embedded pair）的誤差尺度即由兩者比例導出，見 embeddedpair.rs。

/// s0
pub const MIDPOINT: QuadratureRule = QuadratureRule::new("midpoint", &[], Some(1.0), 1);

/// s1
pub const TRAPEZOID: QuadratureRule = QuadratureRule::new("trapezoid", &[(0, 0.5)], None, 1);

/// s2
pub const SIMPSON: QuadratureRule =
    QuadratureRule::new("simpson", &[(0, 1.0 / 6.0)], Some(2.0 / 3.0), 3);

/// s3
pub const THREE_EIGHTHS: QuadratureRule =
    QuadratureRule::new("three-eighths", &[(0, 1.0 / 8.0), (2, 3.0 / 8.0)], None, 3);

/// s4：節點 0, 1/3, 1/2, 2/3, 1
pub const THIRDS_FIVE_POINT: QuadratureRule = QuadratureRule::new(
    "thirds-five-point",
    &[(0, 11.0 / 120.0), (2, 27.0 / 40.0)],
    Some(-8.0 / 15.0),
    5,
);

/// s5：節點 0, 1/7, 3/7, 4/7, 6/7, 1
pub const SEVENTHS_SIX_POINT: QuadratureRule = QuadratureRule::new(
    "sevenths-six-point",
    &[(0, 151.0 / 4320.0), (1, 539.0 / 2160.0), (3, 931.0 / 4320.0)],
    None,
    5,
);

/// s6：節點 0, 1/7, 1/3, 1/2, 2/3, 6/7, 1
pub const MIXED_SEVEN_POINT: QuadratureRule = QuadratureRule::new(
    "mixed-seven-point",
    &[(0, 31.0 / 720.0), (1, 16807.0 / 79200.0), (2, 243.0 / 1760.0)],
    Some(16.0 / 75.0),
    7,
);

/// s7：除中點外全部節點
pub const MIXED_EIGHT_POINT: QuadratureRule = QuadratureRule::new(
    "mixed-eight-point",
    &[
        (0, 739.0 / 17280.0),
        (1, 40817.0 / 190080.0),
        (2, 729.0 / 7040.0),
        (3, 2401.0 / 17280.0),
    ],
    None,
    7,
);

pub const ALL_RULES: [&QuadratureRule; 8] = [
    &MIDPOINT,
    &TRAPEZOID,
    &SIMPSON,
    &THREE_EIGHTHS,
    &THIRDS_FIVE_POINT,
    &SEVENTHS_SIX_POINT,
    &MIXED_SEVEN_POINT,
    &MIXED_EIGHT_POINT,
];
