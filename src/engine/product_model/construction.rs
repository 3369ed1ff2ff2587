// ==========================================
// 建材产品结构遍历
// ==========================================
// 主材按整件重量计;添加剂按占比计,无类型者跳过
// ==========================================

use super::{StageWalker, LANDFILL_CODE, RECYCLING_CODE};
use crate::catalog::normalize;
use crate::domain::input::ConstructionInput;
use crate::domain::types::LifeCycleStage;
use crate::engine::composition::{portion, SharePolicy};

pub(super) fn walk(input: &ConstructionInput, walker: &mut StageWalker<'_>) {
    let weight_kg = walker.weight_kg();

    if let Some(main) = &input.main_material {
        let code = walker.adhoc_code(main.kind.as_deref(), "concrete");
        walker.push(LifeCycleStage::RawMaterials, code, weight_kg, "kg");
    }

    for additive in &input.additives {
        let code = additive.kind.as_deref().map(normalize).unwrap_or_default();
        if code.is_empty() {
            continue;
        }
        let mass = weight_kg * SharePolicy::AsProvided.fraction(additive.percentage, input.additives.len());
        walker.push(LifeCycleStage::RawMaterials, code, mass, "kg");
    }

    walker.push_simple_transport(input.transport.as_ref());

    if !walker.includes_grave() {
        return;
    }

    // 可回收与降级回收均记入回收
    if let Some(eol) = input.end_of_life.as_ref().filter(|e| e.include) {
        walker.push_nonzero(LifeCycleStage::EndOfLife, RECYCLING_CODE, portion(weight_kg, eol.recyclable), "kg");
        walker.push_nonzero(LifeCycleStage::EndOfLife, RECYCLING_CODE, portion(weight_kg, eol.downcyclable), "kg");
        walker.push_nonzero(LifeCycleStage::EndOfLife, LANDFILL_CODE, portion(weight_kg, eol.landfill), "kg");
    }
}
