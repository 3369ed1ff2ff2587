// ==========================================
// 鞋类产品结构遍历
// ==========================================
// 鞋面材料 → 原材料;鞋底材料 → 部件生产
// ==========================================

use super::StageWalker;
use crate::domain::input::FootwearInput;
use crate::domain::types::LifeCycleStage;
use crate::engine::composition::SharePolicy;

pub(super) fn walk(input: &FootwearInput, walker: &mut StageWalker<'_>) {
    let weight_kg = walker.weight_kg();

    for material in &input.upper_materials {
        let mass = weight_kg * SharePolicy::AsProvided.fraction(material.percentage, input.upper_materials.len());
        let code = walker.adhoc_code(material.kind.as_deref(), "leather");
        walker.push(LifeCycleStage::RawMaterials, code, mass, "kg");
    }

    for material in &input.sole_materials {
        let mass = weight_kg * SharePolicy::AsProvided.fraction(material.percentage, input.sole_materials.len());
        let code = walker.adhoc_code(material.kind.as_deref(), "rubber");
        walker.push(LifeCycleStage::ComponentProduction, code, mass, "kg");
    }

    walker.push_simple_transport(input.transport.as_ref());

    if !walker.includes_grave() {
        return;
    }

    if let Some(eol) = input.end_of_life.as_ref().filter(|e| e.include) {
        walker.push_disposal_split(
            LifeCycleStage::EndOfLife,
            weight_kg,
            eol.recycled,
            eol.incinerated,
            eol.landfill,
        );
    }
}
