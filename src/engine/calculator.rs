// ==========================================
// 生命周期评价引擎 - 影响计算器
// ==========================================
// 职责: 逐类别求解影响值并归因到生命周期阶段
// 输入: Project + InputDocument
// 输出: ImpactCalculation
// 红线: 逐类别降级 - 单个类别求解失败只影响该类别,不中断整体计算
// ==========================================
// 每个类别的取值路径:
//   1. 求解器解析方法标识 (方法族标签 + 类别短语子串匹配)
//   2. 解析成功 → 求解 → 总分 + 按阶段活动汇总特征化值
//   3. 解析失败 / 求解出错 / 总分为空 → 确定性估算 (值与阶段分摊)
// ==========================================

use crate::domain::exchange::ProductSystem;
use crate::domain::impact::{
    CategoryImpact, ImpactCalculation, ImpactCategoryDef, StageContributions, TotalImpacts,
};
use crate::domain::input::InputDocument;
use crate::domain::project::Project;
use crate::domain::types::ImpactSource;
use crate::engine::context::EngineContext;
use crate::engine::estimator::DeterministicEstimator;
use crate::engine::solver::{InventorySolver, SolverOutcome};
use crate::engine::stage_classifier::{StageActivityShares, StageClassifier};
use crate::engine::synthesizer::ExchangeSynthesizer;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// ImpactCalculator - 影响计算器
// ==========================================
pub struct ImpactCalculator {
    ctx: Arc<EngineContext>,
    solver: Arc<dyn InventorySolver>,
    synthesizer: ExchangeSynthesizer,
    estimator: DeterministicEstimator,
}

/// 单类别取值
struct CategoryOutcome {
    value: f64,
    contributions: StageContributions,
    source: ImpactSource,
}

impl ImpactCalculator {
    /// 创建计算器
    ///
    /// # 参数
    /// - ctx: 引擎上下文 (目录 / 因子表 / 参数)
    /// - solver: 外部清单求解器
    pub fn new(ctx: Arc<EngineContext>, solver: Arc<dyn InventorySolver>) -> Self {
        Self {
            synthesizer: ExchangeSynthesizer::new(ctx.clone()),
            estimator: DeterministicEstimator::new(ctx.clone()),
            ctx,
            solver,
        }
    }

    /// 计算项目方法族下全部类别
    ///
    /// # 返回
    /// - 每个类别的值 / 单位 / 缩写 / 名称,阶段贡献,汇总指标与取值来源
    #[instrument(skip_all, fields(project_id = %project.id, method = %project.method))]
    pub fn calculate(&self, project: &Project, doc: &InputDocument) -> ImpactCalculation {
        let system = self.synthesizer.product_system(project, doc);
        let shares = StageClassifier::new(&self.synthesizer).activity_shares(project, doc);

        let mut impact_categories = BTreeMap::new();
        let mut contribution_by_stage = BTreeMap::new();
        let mut category_sources = BTreeMap::new();

        for def in self.ctx.methods.categories(project.method) {
            let outcome = self
                .solve_category(project, def, &system, &shares)
                .unwrap_or_else(|| self.estimate_category(project, doc, &def.key));

            impact_categories.insert(def.key.clone(), CategoryImpact::from_def(def, outcome.value));
            contribution_by_stage.insert(def.key.clone(), outcome.contributions);
            category_sources.insert(def.key.clone(), outcome.source);
        }

        let total_impacts = TotalImpacts {
            climate_change: category_value(&impact_categories, "climate_change"),
            water_use: impact_categories
                .get("water_use")
                .or_else(|| impact_categories.get("water_depletion"))
                .map_or(0.0, |c| c.value),
        };

        let calculation = ImpactCalculation {
            method: project.method,
            impact_categories,
            contribution_by_stage,
            total_impacts,
            category_sources,
        };

        info!(
            categories = calculation.impact_categories.len(),
            estimated = calculation.estimated_count(),
            climate_change = calculation.total_impacts.climate_change,
            "影响计算完成"
        );
        calculation
    }

    /// 求解器路径
    ///
    /// # 返回
    /// - None: 方法未解析 / 求解出错 / 总分为空,由调用方改走估算
    fn solve_category(
        &self,
        project: &Project,
        def: &ImpactCategoryDef,
        system: &ProductSystem,
        shares: &StageActivityShares,
    ) -> Option<CategoryOutcome> {
        let Some(method_id) = self
            .solver
            .resolve_method(project.method.solver_label(), &def.name)
        else {
            debug!(category = %def.key, "求解器无匹配方法,改用估算");
            return None;
        };

        let outcome = match self.solver.compute(system, &method_id) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(category = %def.key, method = %method_id, error = %e, "求解失败,改用估算");
                return None;
            }
        };

        let Some(score) = outcome.score.filter(|s| s.is_finite()) else {
            debug!(category = %def.key, method = %method_id, "求解总分为空,改用估算");
            return None;
        };

        Some(CategoryOutcome {
            value: self.ctx.config.round(score),
            contributions: self.attribute_stages(&outcome, shares),
            source: ImpactSource::Solver,
        })
    }

    /// 阶段贡献 = Σ 阶段内活动特征化值 × 分摊比例 (不在索引中的活动计 0)
    fn attribute_stages(&self, outcome: &SolverOutcome, shares: &StageActivityShares) -> StageContributions {
        shares
            .iter()
            .map(|(stage, activities)| {
                let total: f64 = activities
                    .iter()
                    .map(|(key, share)| outcome.characterized(key) * share)
                    .sum();
                (*stage, self.ctx.config.round(total))
            })
            .collect()
    }

    fn estimate_category(&self, project: &Project, doc: &InputDocument, category: &str) -> CategoryOutcome {
        CategoryOutcome {
            value: self.estimator.estimate(project, doc, category),
            contributions: self.estimator.estimate_contributions(project, doc, category),
            source: ImpactSource::Estimated,
        }
    }
}

fn category_value(categories: &BTreeMap<String, CategoryImpact>, key: &str) -> f64 {
    categories.get(key).map_or(0.0, |c| c.value)
}
