// ==========================================
// 引擎间集成测试
// ==========================================
// 职责: 验证合成器 → 阶段分类器 → 计算器 → 溯源器的协作与数据流转
// 场景: 纺织端到端样例 (13 条交换 / 8 个阶段)
// ==========================================


use std::collections::HashMap;
use std::sync::Arc;

use lca_impact_engine::domain::{ActivityKey, ImpactSource, InputDocument, ProductSystem};
use lca_impact_engine::engine::{
    DeterministicEstimator, EngineContext, ExchangeSynthesizer, ImpactCalculator,
    ImpactOriginTracer, InventorySolver, MethodId, OfflineSolver, SolverError, SolverOutcome,
    StageClassifier, TraceError,
};
use lca_impact_engine::{Industry, LifeCycleStage, MethodFamily, Scope};
use serde_json::json;
use test_helpers::*;

// ==========================================
// 测试用求解器
// ==========================================

/// 登记 ReCiPe 全部类别;每个活动的特征化值 = 交换量 × 系数
struct ProportionalSolver {
    factor: f64,
    fail_on: Vec<&'static str>,
}

impl InventorySolver for ProportionalSolver {
    fn registered_methods(&self) -> Vec<MethodId> {
        let ctx = EngineContext::builtin();
        ctx.methods
            .categories(MethodFamily::ReCiPe)
            .iter()
            .map(|def| MethodId::new(["ReCiPe Midpoint (H) V1.13", def.name.as_str(), def.abbreviation.as_str()]))
            .collect()
    }

    fn compute(&self, system: &ProductSystem, method: &MethodId) -> Result<SolverOutcome, SolverError> {
        if self.fail_on.iter().any(|phrase| method.0[1] == *phrase) {
            return Err(SolverError::Computation {
                method: method.to_string(),
                message: "singular matrix".to_string(),
            });
        }

        let mut index: HashMap<ActivityKey, usize> = HashMap::new();
        let mut inventory: Vec<f64> = Vec::new();
        for exchange in system.technosphere() {
            let idx = *index.entry(exchange.input.clone()).or_insert_with(|| {
                inventory.push(0.0);
                inventory.len() - 1
            });
            inventory[idx] += exchange.amount * self.factor;
        }

        Ok(SolverOutcome {
            score: Some(inventory.iter().sum()),
            characterized_inventory: inventory,
            activity_index: index,
        })
    }
}

/// 返回非有限总分的求解器
struct NanSolver;

impl InventorySolver for NanSolver {
    fn registered_methods(&self) -> Vec<MethodId> {
        vec![MethodId::new(["ReCiPe Midpoint (H)", "climate change", "GWP100"])]
    }

    fn compute(&self, _system: &ProductSystem, _method: &MethodId) -> Result<SolverOutcome, SolverError> {
        Ok(SolverOutcome {
            score: Some(f64::NAN),
            ..SolverOutcome::default()
        })
    }
}

fn ctx() -> Arc<EngineContext> {
    Arc::new(EngineContext::builtin())
}

// ==========================================
// 合成 + 阶段分类
// ==========================================

#[test]
fn test_textile_e2e_exchange_count_and_stages() {
    let project = project(Industry::Textile, Scope::CradleToGrave, MethodFamily::ReCiPe, 200.0);
    let doc = textile_e2e_document();
    let synthesizer = ExchangeSynthesizer::new(ctx());

    let exchanges = synthesizer.synthesize(&project, &doc);
    assert_eq!(exchanges.len(), 13, "纤维1 + 纺纱1 + 织造1 + 染色1 + 损耗3 + 运输1 + 使用2 + 废弃3");

    let classifier = StageClassifier::new(&synthesizer);
    let stages = classifier.classify(&project, &doc);

    let expected = [
        (LifeCycleStage::RawMaterials, 1),
        (LifeCycleStage::YarnProduction, 1),
        (LifeCycleStage::FabricProduction, 1),
        (LifeCycleStage::DyeingFinishing, 1),
        (LifeCycleStage::Manufacturing, 3),
        (LifeCycleStage::Transport, 1),
        (LifeCycleStage::UsePhase, 2),
        (LifeCycleStage::EndOfLife, 3),
    ];
    assert_eq!(stages.len(), expected.len());
    for (stage, count) in expected {
        assert_eq!(stages[&stage].len(), count, "阶段 {} 交换数", stage);
    }

    // 每条交换恰好归属一个阶段
    let classified: usize = stages.values().map(Vec::len).sum();
    assert_eq!(classified, exchanges.len());
}

#[test]
fn test_textile_e2e_amounts() {
    let project = project(Industry::Textile, Scope::CradleToGrave, MethodFamily::ReCiPe, 200.0);
    let synthesizer = ExchangeSynthesizer::new(ctx());
    let stages = StageClassifier::new(&synthesizer).classify(&project, &textile_e2e_document());

    // 0.2 kg × 1000 km / 1000 = 0.2 tkm
    let transport = &stages[&LifeCycleStage::Transport][0];
    assert_eq!(transport.unit, "tkm");
    assert!((transport.amount - 0.2).abs() < 1e-12);

    // 损耗 0.02 kg 按 50/30/20 三分
    let waste: Vec<f64> = stages[&LifeCycleStage::Manufacturing]
        .iter()
        .map(|e| e.amount)
        .collect();
    assert!((waste[0] - 0.01).abs() < 1e-12);
    assert!((waste[1] - 0.006).abs() < 1e-12);
    assert!((waste[2] - 0.004).abs() < 1e-12);

    // 30 次 × 50 L → 1.5 m3;30 次 × 0.5 kWh → 15 kWh
    let use_phase = &stages[&LifeCycleStage::UsePhase];
    assert_eq!(use_phase[0].input.code, "water");
    assert!((use_phase[0].amount - 1.5).abs() < 1e-12);
    assert_eq!(use_phase[1].input.code, "electricity");
    assert!((use_phase[1].amount - 15.0).abs() < 1e-12);
}

#[test]
fn test_cradle_to_gate_drops_grave_stages() {
    let project = project(Industry::Textile, Scope::CradleToGate, MethodFamily::ReCiPe, 200.0);
    let synthesizer = ExchangeSynthesizer::new(ctx());
    let stages = StageClassifier::new(&synthesizer).classify(&project, &textile_e2e_document());

    assert_eq!(stages.len(), 6);
    assert!(!stages.contains_key(&LifeCycleStage::UsePhase));
    assert!(!stages.contains_key(&LifeCycleStage::EndOfLife));
}

#[test]
fn test_synthesis_is_pure() {
    let project = project(Industry::Textile, Scope::Both, MethodFamily::ReCiPe, 200.0);
    let doc = textile_e2e_document();
    let synthesizer = ExchangeSynthesizer::new(ctx());

    assert_eq!(synthesizer.synthesize(&project, &doc), synthesizer.synthesize(&project, &doc));
}

// ==========================================
// 计算器
// ==========================================

#[test]
fn test_calculator_solver_path_attribution() {
    let project = project(Industry::Textile, Scope::CradleToGrave, MethodFamily::ReCiPe, 200.0);
    let doc = textile_e2e_document();
    let calculator = ImpactCalculator::new(
        ctx(),
        Arc::new(ProportionalSolver {
            factor: 2.0,
            fail_on: Vec::new(),
        }),
    );

    let result = calculator.calculate(&project, &doc);
    assert_eq!(result.impact_categories.len(), 18);
    assert_eq!(result.estimated_count(), 0);

    for (key, impact) in &result.impact_categories {
        let split = &result.contribution_by_stage[key];
        let sum: f64 = split.values().sum();
        assert!(
            (sum - impact.value).abs() < 1e-5,
            "{}: 阶段之和 {} != 总分 {}",
            key,
            sum,
            impact.value
        );
        assert_eq!(split.len(), 8);
    }

    // 运输: 0.2 tkm × 2
    let climate = &result.contribution_by_stage["climate_change"];
    assert!((climate[&LifeCycleStage::Transport] - 0.4).abs() < 1e-6);
}

#[test]
fn test_calculator_partial_failure_isolated() {
    let project = project(Industry::Textile, Scope::CradleToGrave, MethodFamily::ReCiPe, 200.0);
    let doc = textile_e2e_document();
    let calculator = ImpactCalculator::new(
        ctx(),
        Arc::new(ProportionalSolver {
            factor: 1.0,
            fail_on: vec!["metal depletion", "water depletion"],
        }),
    );

    let result = calculator.calculate(&project, &doc);
    assert_eq!(result.impact_categories.len(), 18);
    assert_eq!(result.estimated_count(), 2);
    assert_eq!(result.category_sources["metal_depletion"], ImpactSource::Estimated);
    assert_eq!(result.category_sources["climate_change"], ImpactSource::Solver);

    let estimator = DeterministicEstimator::new(ctx());
    assert_eq!(
        result.impact_categories["water_depletion"].value,
        estimator.estimate(&project, &doc, "water_depletion")
    );
    assert_eq!(result.total_impacts.water_use, result.impact_categories["water_depletion"].value);
}

#[test]
fn test_calculator_non_finite_score_falls_back() {
    let project = project(Industry::Textile, Scope::CradleToGate, MethodFamily::ReCiPe, 250.0);
    let doc = textile_e2e_document();
    let result = ImpactCalculator::new(ctx(), Arc::new(NanSolver)).calculate(&project, &doc);

    assert_eq!(result.category_sources["climate_change"], ImpactSource::Estimated);
    assert!(result.impact_categories.values().all(|c| c.value.is_finite()));
}

#[test]
fn test_offline_ef31_uses_water_use() {
    let project = project(Industry::Battery, Scope::CradleToGate, MethodFamily::Ef31, 1000.0);
    let doc = InputDocument::empty(Industry::Battery);
    let result = ImpactCalculator::new(ctx(), Arc::new(OfflineSolver)).calculate(&project, &doc);

    assert_eq!(result.impact_categories.len(), 16);
    assert_eq!(result.estimated_count(), 16);
    // 1 kg × 5.9 × 1.5 × 1.1 × 50
    assert_eq!(result.total_impacts.water_use, 486.75);
    assert_eq!(result.impact_categories["water_use"].unit, "m3 world eq");
}

// ==========================================
// 估算器
// ==========================================

#[test]
fn test_estimator_stage_split_every_scope() {
    let estimator = DeterministicEstimator::new(ctx());
    let doc = textile_e2e_document();

    for scope in [Scope::CradleToGate, Scope::CradleToGrave, Scope::Both] {
        let project = project(Industry::Textile, scope, MethodFamily::ReCiPe, 200.0);
        let total = estimator.estimate(&project, &doc, "climate_change");
        let split = estimator.estimate_contributions(&project, &doc, "climate_change");

        let sum: f64 = split.values().sum();
        assert!((sum - total).abs() < 1e-5, "{}: {} vs {}", scope, sum, total);
        assert!(split.values().all(|v| *v >= 0.0));
    }
}

#[test]
fn test_estimator_grave_adds_wash_cycles() {
    let estimator = DeterministicEstimator::new(ctx());
    let doc = textile_e2e_document();
    let gate = estimator.estimate(
        &project(Industry::Textile, Scope::CradleToGate, MethodFamily::ReCiPe, 200.0),
        &doc,
        "climate_change",
    );
    let grave = estimator.estimate(
        &project(Industry::Textile, Scope::CradleToGrave, MethodFamily::ReCiPe, 200.0),
        &doc,
        "climate_change",
    );

    // 30 次 × 0.5
    assert!((grave - gate - 15.0).abs() < 1e-6);
}

#[test]
fn test_estimator_zero_percentage_yarns_use_cotton_fallback() {
    let estimator = DeterministicEstimator::new(ctx());
    let doc = InputDocument::from_value(
        Industry::Textile,
        &json!({"yarns": [
            {"percentage": 0, "fibers": [{"material": "Wool fiber", "percentage": 100}]},
            {"percentage": 0, "fibers": []}
        ]}),
    )
    .unwrap();

    let value = estimator.estimate(
        &project(Industry::Textile, Scope::CradleToGate, MethodFamily::ReCiPe, 1000.0),
        &doc,
        "climate_change",
    );
    assert!(value.is_finite());
    assert!(value >= 0.0);
}

// ==========================================
// 溯源器
// ==========================================

#[test]
fn test_trace_is_deterministic() {
    let project = project(Industry::Textile, Scope::CradleToGrave, MethodFamily::ReCiPe, 200.0);
    let doc = textile_e2e_document();
    let tracer = ImpactOriginTracer::new(ctx());

    for stage in [
        LifeCycleStage::RawMaterials,
        LifeCycleStage::FabricProduction,
        LifeCycleStage::UsePhase,
        LifeCycleStage::EndOfLife,
    ] {
        let first = tracer.trace(&project, &doc, "climate_change", stage).unwrap();
        let second = tracer.trace(&project, &doc, "climate_change", stage).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let subtotal: f64 = first.activities.iter().map(|a| a.subtotal_impact).sum();
        assert!((subtotal - first.total_stage_impact).abs() < 1e-6);
        assert_eq!(first.summary.num_activities, first.activities.len());
    }
}

#[test]
fn test_trace_rejects_category_of_other_method() {
    let project = project(Industry::Textile, Scope::CradleToGate, MethodFamily::ReCiPe, 200.0);
    let tracer = ImpactOriginTracer::new(ctx());

    let err = tracer
        .trace(&project, &textile_e2e_document(), "water_use", LifeCycleStage::RawMaterials)
        .unwrap_err();
    assert!(matches!(err, TraceError::UnknownCategory { .. }));
}

#[test]
fn test_trace_stage_outside_industry_is_empty() {
    let project = project(Industry::Textile, Scope::CradleToGate, MethodFamily::ReCiPe, 200.0);
    let tracer = ImpactOriginTracer::new(ctx());

    let result = tracer
        .trace(&project, &textile_e2e_document(), "climate_change", LifeCycleStage::PackAssembly)
        .unwrap();
    assert!(result.activities.is_empty());
    assert_eq!(result.total_stage_impact, 0.0);
    assert_eq!(result.summary.dominant_activity, "N/A");
}

#[test]
fn test_trace_dominant_activity_tie_keeps_first() {
    let project = project(Industry::Textile, Scope::CradleToGate, MethodFamily::ReCiPe, 1000.0);
    let tracer = ImpactOriginTracer::new(ctx());

    let result = tracer
        .trace(&project, &textile_e2e_document(), "human_toxicity", LifeCycleStage::DyeingFinishing)
        .unwrap();

    // Dyeing 与 Finishing 舍入后都为 0,取先出现者
    let names: Vec<&str> = result.activities.iter().map(|a| a.activity_name.as_str()).collect();
    assert_eq!(names, vec!["Dyeing", "Finishing"]);
    assert!(result.activities.iter().all(|a| a.subtotal_impact == 0.0));
    assert_eq!(result.summary.dominant_activity, "Dyeing");
}

// ==========================================
// 宽松输入: 列表为 null / 类型不符
// ==========================================

/// 解析 → 合成 → 计算全链路不报错,结果有限
fn assert_pipeline_tolerates(industry: Industry, input: serde_json::Value) -> usize {
    let doc = InputDocument::from_value(industry, &input)
        .unwrap_or_else(|e| panic!("{} 输入应可解析: {}", industry, e));
    let project = project(industry, Scope::Both, MethodFamily::ReCiPe, 500.0);

    let exchanges = ExchangeSynthesizer::new(ctx()).synthesize(&project, &doc);
    let result = ImpactCalculator::new(ctx(), Arc::new(OfflineSolver)).calculate(&project, &doc);
    assert_eq!(result.impact_categories.len(), 18);
    assert!(result.impact_categories.values().all(|c| c.value.is_finite()));
    exchanges.len()
}

#[test]
fn test_textile_tolerates_null_and_mistyped_lists() {
    let input = json!({
        "yarns": [{"percentage": 100, "fibers": null}],
        "fabrics": [{"yarns": [1]}],
        "transport": {"legs": null}
    });
    // 纺纱 1 + 织造 1,无纤维、无运输
    assert_eq!(assert_pipeline_tolerates(Industry::Textile, input.clone()), 2);

    let project = project(Industry::Textile, Scope::CradleToGate, MethodFamily::ReCiPe, 500.0);
    let doc = InputDocument::from_value(Industry::Textile, &input).unwrap();
    let stages = StageClassifier::new(&ExchangeSynthesizer::new(ctx())).classify(&project, &doc);
    assert!(!stages.contains_key(&LifeCycleStage::RawMaterials));
    assert!(!stages.contains_key(&LifeCycleStage::Transport));
    assert_eq!(stages[&LifeCycleStage::YarnProduction].len(), 1);

    assert_pipeline_tolerates(Industry::Textile, json!({"yarns": null, "fabrics": "denim"}));
}

#[test]
fn test_footwear_tolerates_null_lists() {
    assert_pipeline_tolerates(
        Industry::Footwear,
        json!({"upper_materials": null, "sole_materials": [{"type": "EVA", "percentage": 40}, 3]}),
    );
}

#[test]
fn test_construction_tolerates_mistyped_additives() {
    assert_pipeline_tolerates(
        Industry::Construction,
        json!({"main_material": {"type": "Concrete"}, "additives": "x"}),
    );
}

#[test]
fn test_battery_tolerates_mistyped_components() {
    assert_pipeline_tolerates(
        Industry::Battery,
        json!({"cathode": "x", "anode": null, "separator": [1], "transport": {"mode": "Truck", "distance": 500}}),
    );
}
