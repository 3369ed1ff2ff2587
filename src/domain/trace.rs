// ==========================================
// 生命周期评价引擎 - 影响溯源结果
// ==========================================
// 临时对象,按需计算,不持久化
// ==========================================

use crate::domain::types::{LifeCycleStage, MethodFamily};
use serde::{Deserialize, Serialize};

/// 排放层交换 (单条排放 × 特征化因子)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceExchange {
    pub flow_name: String,
    pub flow_amount: f64,
    pub flow_unit: String,
    pub emission_name: String,
    pub emission_amount: f64,
    pub emission_unit: String,
    pub characterization_factor: f64,
    pub cf_unit: String,
    pub impact_contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTrace {
    pub activity_name: String,
    pub activity_code: String,
    pub exchanges: Vec<TraceExchange>,
    pub subtotal_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub num_activities: usize,
    pub num_exchanges: usize,
    /// 小计最高的活动,无活动时为 "N/A"
    pub dominant_activity: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorUsed {
    pub emission: String,
    pub factor: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceMethodology {
    pub description: String,
    pub formula: String,
    pub characterization_factors_used: Vec<FactorUsed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    pub impact_category: String,
    pub life_cycle_stage: LifeCycleStage,
    pub product_weight_kg: f64,
    pub activities: Vec<ActivityTrace>,
    pub total_stage_impact: f64,
    pub calculation_method: MethodFamily,
    pub database: String,
    pub summary: TraceSummary,
    pub methodology: TraceMethodology,
}
