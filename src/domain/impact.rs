// ==========================================
// 生命周期评价引擎 - 影响类别与计算结果
// ==========================================
// 职责: 影响类别定义 / 单类别结果 / 阶段贡献 / 持久化结果
// 约定: 同一项目多次计算不合并,按计算序号与时间倒序"最新者为准"
// ==========================================

use crate::domain::types::{ImpactSource, LifeCycleStage, MethodFamily};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// 阶段 → 贡献值
pub type StageContributions = BTreeMap<LifeCycleStage, f64>;

// ==========================================
// ImpactCategoryDef - 影响类别定义
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactCategoryDef {
    pub method: MethodFamily,
    /// 类别键 (如 climate_change)
    pub key: String,
    /// 描述短语,兼作展示名称与求解器匹配短语
    pub name: String,
    pub abbreviation: String,
    pub unit: String,
}

// ==========================================
// CategoryImpact - 单类别结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryImpact {
    pub value: f64,
    pub unit: String,
    pub abbreviation: String,
    pub name: String,
}

impl CategoryImpact {
    pub fn from_def(def: &ImpactCategoryDef, value: f64) -> Self {
        Self {
            value,
            unit: def.unit.clone(),
            abbreviation: def.abbreviation.clone(),
            name: def.name.clone(),
        }
    }
}

/// 汇总指标
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalImpacts {
    pub climate_change: f64,
    pub water_use: f64,
}

// ==========================================
// ImpactCalculation - 引擎计算产物 (未持久化)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactCalculation {
    pub method: MethodFamily,
    pub impact_categories: BTreeMap<String, CategoryImpact>,
    pub contribution_by_stage: BTreeMap<String, StageContributions>,
    pub total_impacts: TotalImpacts,
    /// 每个类别的取值来源
    pub category_sources: BTreeMap<String, ImpactSource>,
}

impl ImpactCalculation {
    /// 估算来源的类别数
    pub fn estimated_count(&self) -> usize {
        self.category_sources
            .values()
            .filter(|s| **s == ImpactSource::Estimated)
            .count()
    }
}

// ==========================================
// ImpactResult - 持久化结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub id: String,
    pub project_id: String,
    pub method_name: MethodFamily,
    pub impact_categories: BTreeMap<String, CategoryImpact>,
    pub contribution_by_stage: BTreeMap<String, StageContributions>,
    pub total_impacts: TotalImpacts,
    pub category_sources: BTreeMap<String, ImpactSource>,
    /// 总量指标 (气候变化)
    pub total_impact: f64,
    pub unit: String,
    /// 产生该结果的计算序号
    pub calc_version: i64,
    pub calculated_at: DateTime<Utc>,
}

impl ImpactResult {
    pub const HEADLINE_UNIT: &'static str = "kg CO2 eq";

    pub fn from_calculation(project_id: &str, calc_version: i64, calc: ImpactCalculation) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            method_name: calc.method,
            total_impact: calc.total_impacts.climate_change,
            impact_categories: calc.impact_categories,
            contribution_by_stage: calc.contribution_by_stage,
            total_impacts: calc.total_impacts,
            category_sources: calc.category_sources,
            unit: Self::HEADLINE_UNIT.to_string(),
            calc_version,
            calculated_at: Utc::now(),
        }
    }
}
