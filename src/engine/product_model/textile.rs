// ==========================================
// 纺织产品结构遍历
// ==========================================
// 纤维 → 纱线 → 面料 → 成衣损耗 → 运输 → [使用 → 废弃]
// ==========================================

use super::{StageWalker, DEFAULT_TRANSPORT_CODE};
use crate::domain::input::TextileInput;
use crate::domain::types::LifeCycleStage;
use crate::engine::composition::SharePolicy;

/// 不染色哨兵值
pub const NO_DYEING_SENTINEL: &str = "No dyeing/printing";

pub(super) fn walk(input: &TextileInput, walker: &mut StageWalker<'_>) {
    let weight_kg = walker.weight_kg();

    // ===== 纤维与纺纱 =====
    for yarn in &input.yarns {
        let yarn_weight = weight_kg * SharePolicy::AsProvided.fraction(yarn.percentage, input.yarns.len());

        for fiber in &yarn.fibers {
            let fiber_weight =
                yarn_weight * SharePolicy::AsProvided.fraction(fiber.percentage, yarn.fibers.len());
            let code = walker.curated_code(
                fiber.material.as_deref().filter(|m| !m.is_empty()),
                "Cotton fiber (Global)",
                "cotton_fiber_global",
            );
            walker.push(LifeCycleStage::RawMaterials, code, fiber_weight, "kg");
        }

        let code = walker.curated_code(yarn.spinning_method.as_deref(), "Ring spinning", "ring_spinning");
        walker.push(LifeCycleStage::YarnProduction, code, yarn_weight, "kg");
    }

    // ===== 面料与染整 =====
    for fabric in &input.fabrics {
        let fabric_weight =
            weight_kg * SharePolicy::AsProvided.fraction(fabric.percentage, input.fabrics.len());

        let code = walker.curated_code(fabric.construction_method.as_deref(), "Weaving", "weaving");
        walker.push(LifeCycleStage::FabricProduction, code, fabric_weight, "kg");

        if let Some(coloring) = fabric
            .coloring_method
            .as_deref()
            .filter(|c| !c.is_empty() && *c != NO_DYEING_SENTINEL)
        {
            let code = walker.curated_code(Some(coloring), coloring, "dyeing_jet");
            walker.push(LifeCycleStage::DyeingFinishing, code, fabric_weight, "kg");
        }
    }

    // ===== 裁剪损耗 =====
    if let Some(mfg) = &input.manufacturing {
        let waste_kg = weight_kg * mfg.cutting_waste_percentage / 100.0;
        if waste_kg > 0.0 {
            walker.push_disposal_split(
                LifeCycleStage::Manufacturing,
                waste_kg,
                mfg.waste_recycled_percentage,
                mfg.waste_incinerated_percentage,
                mfg.waste_landfilled_percentage,
            );
        }
    }

    // ===== 运输 (每段一条,吨公里) =====
    if let Some(transport) = &input.transport {
        for leg in &transport.legs {
            let code = walker.curated_code(leg.mode.as_deref(), "Truck", DEFAULT_TRANSPORT_CODE);
            let tkm = weight_kg * leg.distance_km / 1000.0;
            walker.push(LifeCycleStage::Transport, code, tkm, "tkm");
        }
    }

    if !walker.includes_grave() {
        return;
    }

    // ===== 使用阶段 (洗涤用水 / 耗电) =====
    if let Some(use_phase) = input.use_phase.as_ref().filter(|u| u.include) {
        let cycles = use_phase.lifetime_washing_cycles.unwrap_or(0.0);
        let litres = walker.config().water_litres_per_wash;
        let kwh = walker.config().kwh_per_wash;

        // 立方米按 kg 计
        walker.push(LifeCycleStage::UsePhase, "water".to_string(), cycles * litres / 1000.0, "kg");
        walker.push(LifeCycleStage::UsePhase, "electricity".to_string(), cycles * kwh, "kWh");
    }

    // ===== 废弃 =====
    if let Some(eol) = input.end_of_life.as_ref().filter(|e| e.include) {
        walker.push_disposal_split(
            LifeCycleStage::EndOfLife,
            weight_kg,
            eol.recycled_percentage,
            eol.incinerated_percentage,
            eol.landfill_percentage,
        );
    }
}
