// ==========================================
// 生命周期评价引擎 - 确定性估算器
// ==========================================
// 职责: 求解器无法给出结果时,按排放因子估算类别值与阶段分摊
// 红线: 全函数,任何输入都返回数值;不依赖外部状态
// ==========================================
// 估算公式:
//   base = Σ weight × yarn_share × fiber_share × EF(material)
//   value = base × 加工系数 × 运输系数 × 类别乘数
//         [+ 洗涤次数 × 单次排放 × 类别乘数] (含坟墓阶段且纳入使用阶段)
// ==========================================

use crate::domain::impact::StageContributions;
use crate::domain::input::{InputDocument, TextileInput};
use crate::domain::project::Project;
use crate::engine::composition::SharePolicy;
use crate::engine::context::EngineContext;
use std::sync::Arc;

// ==========================================
// DeterministicEstimator - 确定性估算器
// ==========================================
pub struct DeterministicEstimator {
    ctx: Arc<EngineContext>,
}

impl DeterministicEstimator {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// 估算单个类别值
    ///
    /// # 参数
    /// - project: 项目 (重量 / 范围)
    /// - doc: 输入文档
    /// - category: 类别键
    ///
    /// # 返回
    /// - 按配置小数位取整后的估算值
    pub fn estimate(&self, project: &Project, doc: &InputDocument, category: &str) -> f64 {
        let config = &self.ctx.config;
        let weight_kg = project.weight_kg();
        let multiplier = self.ctx.estimation.category_multiplier(category);

        let base = match doc {
            InputDocument::Textile(textile) => self.composition_base(textile, weight_kg),
            _ => None,
        }
        .unwrap_or(weight_kg * config.cotton_fallback_ef);

        let mut total = base * config.process_overhead * config.transport_overhead * multiplier;

        if project.scope.includes_grave() && doc.use_phase_included() {
            let cycles = match doc {
                InputDocument::Textile(textile) => textile
                    .use_phase
                    .as_ref()
                    .and_then(|u| u.lifetime_washing_cycles),
                _ => None,
            }
            .unwrap_or(config.default_wash_cycles);
            total += cycles * config.co2_per_wash * multiplier;
        }

        config.round(total)
    }

    /// 估算阶段分摊
    ///
    /// # 规则
    /// - 行业静态比例表 (含坟墓阶段时追加使用 / 废弃)
    /// - 比例归一化后乘以估算值,逐项取整
    pub fn estimate_contributions(
        &self,
        project: &Project,
        doc: &InputDocument,
        category: &str,
    ) -> StageContributions {
        let total = self.estimate(project, doc, category);
        let allocation = self
            .ctx
            .estimation
            .stage_allocation(project.industry, project.scope.includes_grave());
        let share_sum: f64 = allocation.iter().map(|(_, share)| share).sum();

        allocation
            .into_iter()
            .map(|(stage, share)| {
                let value = if share_sum > 0.0 {
                    share / share_sum * total
                } else {
                    0.0
                };
                (stage, self.ctx.config.round(value))
            })
            .collect()
    }

    /// 纺织组分加权排放 (kg CO2e)
    ///
    /// # 返回
    /// - None: 无有效组分或合计为 0,由调用方回退棉当量
    fn composition_base(&self, textile: &TextileInput, weight_kg: f64) -> Option<f64> {
        let config = &self.ctx.config;
        let mut total = 0.0;
        let mut has_valid_input = false;

        for yarn in &textile.yarns {
            let yarn_share = SharePolicy::SingletonDefault.fraction(yarn.percentage, textile.yarns.len());

            if yarn.fibers.is_empty() {
                total += weight_kg * yarn_share * config.cotton_fallback_ef;
                has_valid_input |= yarn_share > 0.0;
                continue;
            }

            for fiber in &yarn.fibers {
                let fiber_share =
                    SharePolicy::SingletonDefault.fraction(fiber.percentage, yarn.fibers.len());
                let ef = self
                    .ctx
                    .estimation
                    .material_ef(&material_key(fiber.material.as_deref()))
                    .unwrap_or(config.unknown_material_ef);

                total += weight_kg * yarn_share * fiber_share * ef;
                has_valid_input |= fiber_share > 0.0;
            }
        }

        if has_valid_input && total != 0.0 {
            Some(total)
        } else {
            None
        }
    }
}

/// 材料键: 小写后的首个词 ("Cotton fiber (Global)" → "cotton")
fn material_key(label: Option<&str>) -> String {
    label
        .and_then(|l| l.split_whitespace().next())
        .map(|token| token.to_lowercase())
        .unwrap_or_else(|| "cotton".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::ProjectDraft;
    use crate::domain::types::{Industry, LifeCycleStage, MethodFamily, Scope};
    use serde_json::json;

    fn project(industry: Industry, scope: Scope, grams: f64) -> Project {
        Project::new_draft(ProjectDraft {
            name: "p".to_string(),
            description: None,
            industry,
            scope,
            database: "USLCI".to_string(),
            method: MethodFamily::ReCiPe,
            product_weight_grams: grams,
            product_scenario: String::new(),
        })
    }

    fn estimator() -> DeterministicEstimator {
        DeterministicEstimator::new(Arc::new(EngineContext::builtin()))
    }

    fn cotton_tee(yarn_pct: f64, fiber_pct: f64) -> InputDocument {
        InputDocument::from_value(
            Industry::Textile,
            &json!({"yarns": [{"percentage": yarn_pct, "fibers": [{"material": "Cotton fiber (Global)", "percentage": fiber_pct}]}]}),
        )
        .unwrap()
    }

    #[test]
    fn test_single_cotton_yarn() {
        let value = estimator().estimate(
            &project(Industry::Textile, Scope::CradleToGate, 250.0),
            &cotton_tee(100.0, 100.0),
            "climate_change",
        );
        assert_eq!(value, 2.43375);
    }

    #[test]
    fn test_singleton_zero_percent_defaults_to_full() {
        let est = estimator();
        let project = project(Industry::Textile, Scope::CradleToGate, 250.0);
        assert_eq!(
            est.estimate(&project, &cotton_tee(0.0, 0.0), "climate_change"),
            est.estimate(&project, &cotton_tee(100.0, 100.0), "climate_change")
        );
    }

    #[test]
    fn test_material_lookup_and_unknown() {
        assert_eq!(material_key(Some("Polyester fiber (Global)")), "polyester");
        assert_eq!(material_key(Some("  ")), "cotton");
        assert_eq!(material_key(None), "cotton");

        // 未登记材料取 5.0
        let doc = InputDocument::from_value(
            Industry::Textile,
            &json!({"yarns": [{"percentage": 100, "fibers": [{"material": "Kapok fiber", "percentage": 100}]}]}),
        )
        .unwrap();
        let value = estimator().estimate(
            &project(Industry::Textile, Scope::CradleToGate, 1000.0),
            &doc,
            "climate_change",
        );
        assert_eq!(value, 8.25);
    }

    #[test]
    fn test_non_textile_flat_fallback_with_multiplier() {
        let doc = InputDocument::empty(Industry::Battery);
        let value = estimator().estimate(
            &project(Industry::Battery, Scope::CradleToGate, 1000.0),
            &doc,
            "water_use",
        );
        // 1 kg × 5.9 × 1.5 × 1.1 × 50
        assert_eq!(value, 486.75);
    }

    #[test]
    fn test_use_phase_default_cycles() {
        let doc = InputDocument::from_value(Industry::Footwear, &json!({"use_phase": {"include": true}})).unwrap();
        let est = estimator();
        let gate = est.estimate(&project(Industry::Footwear, Scope::CradleToGate, 1000.0), &doc, "climate_change");
        let grave = est.estimate(&project(Industry::Footwear, Scope::Both, 1000.0), &doc, "climate_change");
        assert!((grave - gate - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_contributions_sum_to_total_every_industry() {
        let est = estimator();
        for industry in Industry::ALL {
            for scope in [Scope::CradleToGate, Scope::CradleToGrave] {
                let project = project(industry, scope, 730.0);
                let doc = InputDocument::empty(industry);
                let total = est.estimate(&project, &doc, "climate_change");
                let split = est.estimate_contributions(&project, &doc, "climate_change");

                let sum: f64 = split.values().sum();
                assert!((sum - total).abs() < 1e-5, "{industry} {scope}: {sum} vs {total}");
                assert_eq!(split.contains_key(&LifeCycleStage::EndOfLife), scope.includes_grave());
            }
        }
    }
}
