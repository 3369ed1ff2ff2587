// ==========================================
// 电池产品结构遍历
// ==========================================
// 正极 / 负极 / 电解液 / 隔膜 → 原材料;壳体 → 电芯生产
// ==========================================

use super::{StageWalker, RECYCLING_CODE};
use crate::domain::input::BatteryInput;
use crate::domain::types::LifeCycleStage;
use crate::engine::composition::portion;

pub(super) fn walk(input: &BatteryInput, walker: &mut StageWalker<'_>) {
    let weight_kg = walker.weight_kg();

    if let Some(cathode) = &input.cathode {
        let code = walker.adhoc_code(cathode.chemistry.as_deref(), "nmc");
        walker.push(LifeCycleStage::RawMaterials, code, portion(weight_kg, cathode.percentage), "kg");
    }

    if let Some(anode) = &input.anode {
        let code = walker.adhoc_code(anode.material.as_deref(), "graphite");
        walker.push(LifeCycleStage::RawMaterials, code, portion(weight_kg, anode.percentage), "kg");
    }

    if let Some(electrolyte) = &input.electrolyte {
        let code = walker.adhoc_code(electrolyte.kind.as_deref(), "electrolyte");
        walker.push(LifeCycleStage::RawMaterials, code, portion(weight_kg, electrolyte.percentage), "kg");
    }

    if let Some(separator) = &input.separator {
        let code = walker.adhoc_code(separator.material.as_deref(), "separator");
        walker.push_nonzero(LifeCycleStage::RawMaterials, &code, portion(weight_kg, separator.percentage), "kg");
    }

    if let Some(housing) = &input.housing {
        let label = housing.housing_material.as_deref().or(housing.cell_format.as_deref());
        let code = walker.adhoc_code(label, "housing");
        walker.push_nonzero(
            LifeCycleStage::CellProduction,
            &code,
            portion(weight_kg, housing.housing_percentage),
            "kg",
        );
    }

    walker.push_simple_transport(input.transport.as_ref());

    if !walker.includes_grave() {
        return;
    }

    if let Some(eol) = input.end_of_life.as_ref().filter(|e| e.include) {
        walker.push_nonzero(
            LifeCycleStage::EndOfLife,
            RECYCLING_CODE,
            portion(weight_kg, eol.recycling_rate),
            "kg",
        );
    }
}
