use serde::{
    Deserialize,
    Serialize
};

use crate::quadrature::embeddedpair::Order;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engine {
    /// 固定 4 階自適應
    Adaptive4,
    /// variable-step variable-order
    Vsvo,
}

/// 單次積分的結果與統計
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrationReport {
    value: f32,
    engine: Engine,
    evaluations: usize,
    iterations: usize,
    rejected: usize,
    /// 依 Order::index 累計已接受的子區間數
    accepted_by_order: [usize; 4],
}

impl IntegrationReport {
    pub fn new(engine: Engine) -> IntegrationReport {
        IntegrationReport {
            value: 0.0,
            engine,
            evaluations: 0,
            iterations: 0,
            rejected: 0,
            accepted_by_order: [0; 4],
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn accepted(&self) -> usize {
        self.accepted_by_order.iter().sum()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn accepted_with(&self, order: Order) -> usize {
        self.accepted_by_order[order.index()]
    }

    pub(crate) fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    pub(crate) fn record_evaluation(&mut self) {
        self.evaluations += 1;
    }

    pub(crate) fn record_iteration(&mut self) {
        self.iterations += 1;
    }

    pub(crate) fn record_acceptance(&mut self, order: Order) {
        self.accepted_by_order[order.index()] += 1;
    }

    pub(crate) fn record_rejection(&mut self) {
        self.rejected += 1;
    }
}
