// ==========================================
// 生命周期评价引擎 - 参考目录
// ==========================================
// 职责: 可选清单数据库 / 方法族概览 / 行业阶段说明
// ==========================================

use crate::domain::types::{Industry, LifeCycleStage, MethodFamily, Scope};
use serde::Serialize;

/// 默认清单数据库
pub const DEFAULT_DATABASE: &str = "USLCI";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryDatabase {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub source: &'static str,
}

pub const INVENTORY_DATABASES: [InventoryDatabase; 3] = [
    InventoryDatabase {
        id: "USLCI",
        name: "US Life Cycle Inventory Database",
        description: "Comprehensive US LCI data for manufacturing processes",
        source: "NREL",
    },
    InventoryDatabase {
        id: "Agribalyse",
        name: "Agribalyse",
        description: "French agricultural and food LCI database",
        source: "ADEME",
    },
    InventoryDatabase {
        id: "FORWAST",
        name: "FORWAST",
        description: "European waste treatment and resource database",
        source: "EU Project",
    },
];

pub fn find_database(id: &str) -> Option<&'static InventoryDatabase> {
    INVENTORY_DATABASES.iter().find(|db| db.id == id)
}

/// 方法族概览
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSummary {
    pub id: MethodFamily,
    pub name: &'static str,
    pub categories: Vec<String>,
}

/// 阶段说明
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageInfo {
    pub id: LifeCycleStage,
    pub name: &'static str,
    pub description: &'static str,
}

/// 行业全部阶段说明 (含使用与废弃阶段)
pub fn stage_catalog(industry: Industry) -> Vec<StageInfo> {
    LifeCycleStage::vocabulary(industry, Scope::CradleToGrave)
        .into_iter()
        .map(|stage| StageInfo {
            id: stage,
            name: stage.display_name(),
            description: stage_description(industry, stage),
        })
        .collect()
}

fn stage_description(industry: Industry, stage: LifeCycleStage) -> &'static str {
    use LifeCycleStage::*;

    match (industry, stage) {
        (Industry::Textile, RawMaterials) => "Fiber production and processing",
        (Industry::Textile, YarnProduction) => "Spinning, twisting, winding",
        (Industry::Textile, FabricProduction) => "Weaving, knitting, finishing prep",
        (Industry::Textile, DyeingFinishing) => "Dyeing, printing, finishing",
        (Industry::Textile, Manufacturing) => "Cutting, sewing, assembly",
        (Industry::Textile, Transport) => "Road, sea, air transport",
        (Industry::Textile, UsePhase) => "Washing, drying, ironing",
        (Industry::Footwear, RawMaterials) => "Leather, rubber, textile production",
        (Industry::Footwear, ComponentProduction) => "Sole and upper manufacturing",
        (Industry::Footwear, Assembly) => "Lasting, cementing, finishing",
        (Industry::Footwear, Transport) => "Road, sea transport",
        (Industry::Footwear, UsePhase) => "Cleaning, maintenance",
        (Industry::Construction, RawMaterials) => "Cement, aggregate, steel production",
        (Industry::Construction, Processing) => "Mixing, forming, curing",
        (Industry::Construction, Transport) => "Road, rail transport",
        (Industry::Construction, Installation) => "Site work, installation",
        (Industry::Construction, UsePhase) => "Maintenance, repair",
        (Industry::Construction, EndOfLife) => "Demolition, recycling, landfill",
        (Industry::Battery, RawMaterials) => "Lithium, cobalt, nickel extraction",
        (Industry::Battery, CellProduction) => "Electrode coating, cell assembly",
        (Industry::Battery, PackAssembly) => "Module assembly, BMS integration",
        (Industry::Battery, Transport) => "Road, sea transport",
        (Industry::Battery, UsePhase) => "Charging losses, thermal management",
        (Industry::Battery, EndOfLife) => "Disassembly, recycling, disposal",
        (_, EndOfLife) => "Recycling, incineration, landfill",
        _ => "",
    }
}
