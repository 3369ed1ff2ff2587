// ==========================================
// 生命周期评价引擎 - 交换合成器
// ==========================================
// 职责: 输入文档 + 产品重量 → 有序技术圈交换列表
// 输入: Project + InputDocument
// 输出: Vec<Exchange> / ProductSystem
// 红线: 纯函数,不修改外部状态;不校验同级百分比之和
// ==========================================

use crate::domain::exchange::{Exchange, ProductSystem, StagedExchange};
use crate::domain::input::InputDocument;
use crate::domain::project::Project;
use crate::engine::context::EngineContext;
use crate::engine::product_model::{ProductModel, StageWalker};
use std::sync::Arc;
use tracing::debug;

// ==========================================
// ExchangeSynthesizer - 交换合成器
// ==========================================
pub struct ExchangeSynthesizer {
    ctx: Arc<EngineContext>,
}

impl ExchangeSynthesizer {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// 带阶段标签的结构遍历 (阶段分类器共用)
    pub(crate) fn walk(&self, project: &Project, doc: &InputDocument) -> Vec<StagedExchange> {
        let walker = StageWalker::new(
            &project.database,
            project.weight_kg(),
            project.scope,
            &self.ctx.processes,
            &self.ctx.config,
        );
        ProductModel::from_document(doc).walk(walker)
    }

    /// 合成产品的技术圈交换
    ///
    /// # 参数
    /// - project: 项目 (数据库名 / 范围 / 重量)
    /// - doc: 输入文档
    ///
    /// # 返回
    /// - 按结构遍历顺序排列的交换
    pub fn synthesize(&self, project: &Project, doc: &InputDocument) -> Vec<Exchange> {
        let exchanges: Vec<Exchange> = self
            .walk(project, doc)
            .into_iter()
            .map(|staged| staged.exchange)
            .collect();

        debug!(
            project_id = %project.id,
            industry = %project.industry,
            count = exchanges.len(),
            "交换合成完成"
        );
        exchanges
    }

    /// 构建产品系统 (自产出 + 技术圈交换),交给清单求解器
    pub fn product_system(&self, project: &Project, doc: &InputDocument) -> ProductSystem {
        ProductSystem::new(&project.id, &project.name, self.synthesize(project, doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::ProjectDraft;
    use crate::domain::types::{Industry, MethodFamily, Scope};
    use serde_json::json;

    fn project(industry: Industry, scope: Scope, grams: f64) -> Project {
        Project::new_draft(ProjectDraft {
            name: "sample".to_string(),
            description: None,
            industry,
            scope,
            database: "USLCI".to_string(),
            method: MethodFamily::ReCiPe,
            product_weight_grams: grams,
            product_scenario: "Casual - T-shirt cotton".to_string(),
        })
    }

    fn synthesizer() -> ExchangeSynthesizer {
        ExchangeSynthesizer::new(Arc::new(EngineContext::builtin()))
    }

    #[test]
    fn test_textile_defaults_and_weights() {
        let project = project(Industry::Textile, Scope::CradleToGate, 500.0);
        let doc = InputDocument::from_value(
            Industry::Textile,
            &json!({
                "yarns": [{"percentage": 60, "fibers": [{"percentage": 50}, {"material": "Polyester fiber (Global)", "percentage": 50}]}],
                "fabrics": [{"construction_method": "Knitting - Circular", "percentage": 100, "coloring_method": "No dyeing/printing"}],
                "use_phase": {"include": true, "lifetime_washing_cycles": 40}
            }),
        )
        .unwrap();

        let exchanges = synthesizer().synthesize(&project, &doc);
        let codes: Vec<&str> = exchanges.iter().map(|e| e.input.code.as_str()).collect();

        // 摇篮到大门不含使用阶段;不染色不产生交换
        assert_eq!(
            codes,
            vec!["cotton_fiber_global", "polyester_fiber_global", "ring_spinning", "knitting_circular"]
        );
        assert!((exchanges[0].amount - 0.15).abs() < 1e-12);
        assert!((exchanges[2].amount - 0.3).abs() < 1e-12);
        assert!(exchanges.iter().all(|e| e.input.database == "USLCI"));
    }

    #[test]
    fn test_zero_percent_fiber_still_emitted() {
        let project = project(Industry::Textile, Scope::CradleToGate, 200.0);
        let doc = InputDocument::from_value(
            Industry::Textile,
            &json!({"yarns": [{"fibers": [{"material": "Wool fiber (Global)"}]}]}),
        )
        .unwrap();

        let exchanges = synthesizer().synthesize(&project, &doc);
        assert_eq!(exchanges.len(), 2);
        assert_eq!(exchanges[0].amount, 0.0);
    }

    #[test]
    fn test_footwear_adhoc_codes() {
        let project = project(Industry::Footwear, Scope::CradleToGrave, 800.0);
        let doc = InputDocument::from_value(
            Industry::Footwear,
            &json!({
                "upper_materials": [{"type": "Synthetic leather", "percentage": 40}, {"percentage": 20}],
                "sole_materials": [{"type": "EVA", "percentage": 40}],
                "transport": {"primary_mode": "Container ship", "distance": 10000},
                "end_of_life": {"include": true, "landfill": 100}
            }),
        )
        .unwrap();

        let exchanges = synthesizer().synthesize(&project, &doc);
        let codes: Vec<&str> = exchanges.iter().map(|e| e.input.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["synthetic_leather", "leather", "eva", "container_ship", "landfill"]
        );
        assert_eq!(exchanges[3].unit, "tkm");
        assert!((exchanges[3].amount - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_construction_main_material_full_weight() {
        let project = project(Industry::Construction, Scope::CradleToGate, 10_000.0);
        let doc = InputDocument::from_value(
            Industry::Construction,
            &json!({
                "main_material": {},
                "additives": [{"type": "Water reducer", "percentage": 2}, {"percentage": 5}]
            }),
        )
        .unwrap();

        let exchanges = synthesizer().synthesize(&project, &doc);
        assert_eq!(exchanges.len(), 2);
        assert_eq!(exchanges[0].input.code, "concrete");
        assert_eq!(exchanges[0].amount, 10.0);
        assert_eq!(exchanges[1].input.code, "water_reducer");
        assert!((exchanges[1].amount - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_battery_defaults() {
        let project = project(Industry::Battery, Scope::CradleToGate, 1000.0);
        let doc = InputDocument::from_value(
            Industry::Battery,
            &json!({
                "cathode": {"percentage": 30},
                "anode": {"percentage": 20},
                "electrolyte": {"type": "Liquid - LiPF6", "percentage": 10},
                "separator": {"material": "Polyethylene"}
            }),
        )
        .unwrap();

        let exchanges = synthesizer().synthesize(&project, &doc);
        let codes: Vec<&str> = exchanges.iter().map(|e| e.input.code.as_str()).collect();
        // 隔膜占比为 0 时跳过
        assert_eq!(codes, vec!["nmc", "graphite", "liquid_lipf6"]);
    }

    #[test]
    fn test_product_system_wraps_exchanges() {
        let project = project(Industry::Battery, Scope::CradleToGate, 1000.0);
        let doc = InputDocument::from_value(Industry::Battery, &json!({"cathode": {"percentage": 30}})).unwrap();

        let system = synthesizer().product_system(&project, &doc);
        assert_eq!(system.activity.database, format!("product_{}", project.id));
        assert_eq!(system.exchanges.len(), 2);
        assert_eq!(system.technosphere().count(), 1);
    }
}
