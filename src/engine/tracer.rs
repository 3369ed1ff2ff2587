// ==========================================
// 生命周期评价引擎 - 影响溯源器
// ==========================================
// 职责: 按需分解某类别某阶段的影响来源 (活动 → 排放 → 特征化因子)
// 输入: Project + InputDocument + 类别键 + 阶段
// 输出: TraceResult (临时对象,不持久化)
// 红线: 仅读静态因子表,不依赖已有计算结果;相同输入得到相同输出
// ==========================================

use crate::catalog::factor_tables::{CharacterizationFactor, ELECTRICITY_KWH, STEAM_MJ, WATER_FLOWS};
use crate::domain::input::InputDocument;
use crate::domain::project::Project;
use crate::domain::trace::{
    ActivityTrace, FactorUsed, TraceExchange, TraceMethodology, TraceResult, TraceSummary,
};
use crate::domain::types::LifeCycleStage;
use crate::engine::context::EngineContext;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const ELECTRICITY_EMISSION: &str = "CO2 (from electricity)";
const TRACE_FORMULA: &str =
    "Impact = Σ (Emission amount × Characterization factor), emission amount = factor per kg × product weight";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceError {
    #[error("未知影响类别: {category} (method={method})")]
    UnknownCategory { method: String, category: String },
}

// ==========================================
// ImpactOriginTracer - 影响溯源器
// ==========================================
pub struct ImpactOriginTracer {
    ctx: Arc<EngineContext>,
}

impl ImpactOriginTracer {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// 分解阶段影响来源
    ///
    /// # 参数
    /// - project: 项目 (重量 / 行业 / 方法 / 数据库)
    /// - doc: 输入文档 (只用于确认行业,分解本身只读静态表)
    /// - category: 类别键,必须属于项目方法族
    /// - stage: 生命周期阶段,行业未定义的阶段返回空活动列表
    ///
    /// # 返回
    /// - Err(UnknownCategory): 类别不在项目方法族下
    pub fn trace(
        &self,
        project: &Project,
        doc: &InputDocument,
        category: &str,
        stage: LifeCycleStage,
    ) -> Result<TraceResult, TraceError> {
        if self.ctx.methods.find(project.method, category).is_none() {
            return Err(TraceError::UnknownCategory {
                method: project.method.to_string(),
                category: category.to_string(),
            });
        }

        let config = &self.ctx.config;
        let weight_kg = project.weight_kg();
        let factors = self.ctx.trace.characterization_for(category);

        let (activities, raw_subtotals): (Vec<ActivityTrace>, Vec<f64>) = self
            .ctx
            .trace
            .stage_activities(doc.industry(), stage)
            .iter()
            .filter_map(|code| self.trace_activity(code, factors, weight_kg))
            .unzip();

        // 未舍入贡献求和,只在最后舍入一次
        let total_stage_impact = config.round(raw_subtotals.iter().sum());

        // 并列时取第一个
        let dominant_activity = activities
            .iter()
            .fold(None::<&ActivityTrace>, |best, a| match best {
                Some(b) if a.subtotal_impact <= b.subtotal_impact => Some(b),
                _ => Some(a),
            })
            .map(|a| a.activity_name.clone())
            .unwrap_or_else(|| "N/A".to_string());

        let summary = TraceSummary {
            num_activities: activities.len(),
            num_exchanges: activities.iter().map(|a| a.exchanges.len()).sum(),
            dominant_activity,
            unit: self.ctx.methods.unit_for(project.method, category).to_string(),
        };

        debug!(
            project_id = %project.id,
            category,
            stage = %stage,
            activities = summary.num_activities,
            total = total_stage_impact,
            "影响溯源完成"
        );

        Ok(TraceResult {
            impact_category: category.to_string(),
            life_cycle_stage: stage,
            product_weight_kg: weight_kg,
            activities,
            total_stage_impact,
            calculation_method: project.method,
            database: project.database.clone(),
            summary,
            methodology: TraceMethodology {
                description: format!(
                    "Impact calculated using {} methodology with {} database",
                    project.method, project.database
                ),
                formula: TRACE_FORMULA.to_string(),
                characterization_factors_used: factors
                    .iter()
                    .map(|cf| FactorUsed {
                        emission: cf.emission.clone(),
                        factor: cf.factor,
                        unit: cf.unit.clone(),
                    })
                    .collect(),
            },
        })
    }

    /// 单个活动的排放分解,无合格排放时返回 None
    ///
    /// # 返回
    /// - (活动分解, 未舍入的活动小计)
    fn trace_activity(
        &self,
        code: &str,
        factors: &[CharacterizationFactor],
        weight_kg: f64,
    ) -> Option<(ActivityTrace, f64)> {
        let config = &self.ctx.config;
        let co2_factor = factors.iter().find(|cf| cf.emission == "CO2");
        let mut exchanges = Vec::new();
        let mut subtotal = 0.0;

        for (emission, per_kg) in self.ctx.trace.activity_emissions(code) {
            match emission.as_str() {
                ELECTRICITY_KWH => {
                    let Some(cf) = co2_factor else { continue };
                    let kwh = per_kg * weight_kg;
                    let co2 = kwh * config.grid_co2_per_kwh;
                    subtotal += co2 * cf.factor;
                    exchanges.push(TraceExchange {
                        flow_name: "Electricity consumption".to_string(),
                        flow_amount: config.round(kwh),
                        flow_unit: "kWh".to_string(),
                        emission_name: ELECTRICITY_EMISSION.to_string(),
                        emission_amount: config.round(co2),
                        emission_unit: "kg".to_string(),
                        characterization_factor: cf.factor,
                        cf_unit: cf.unit.clone(),
                        impact_contribution: config.round(co2 * cf.factor),
                    });
                }
                STEAM_MJ => continue,
                _ => {
                    let Some(cf) = factors.iter().find(|cf| cf.emission == *emission) else {
                        continue;
                    };
                    let amount = per_kg * weight_kg;
                    let unit = if WATER_FLOWS.contains(&emission.as_str()) { "m3" } else { "kg" };
                    subtotal += amount * cf.factor;
                    exchanges.push(TraceExchange {
                        flow_name: format!("{} emission", emission.to_uppercase()),
                        flow_amount: config.round(amount),
                        flow_unit: unit.to_string(),
                        emission_name: emission.to_uppercase(),
                        emission_amount: config.round(amount),
                        emission_unit: unit.to_string(),
                        characterization_factor: cf.factor,
                        cf_unit: cf.unit.clone(),
                        impact_contribution: config.round(amount * cf.factor),
                    });
                }
            }
        }

        if exchanges.is_empty() {
            return None;
        }

        let trace = ActivityTrace {
            activity_name: activity_display_name(code),
            activity_code: code.to_string(),
            exchanges,
            subtotal_impact: config.round(subtotal),
        };
        Some((trace, subtotal))
    }
}

/// "road_transport" → "Road Transport"
fn activity_display_name(code: &str) -> String {
    code.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
