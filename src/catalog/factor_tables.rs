// ==========================================
// 生命周期评价引擎 - 静态因子表
// ==========================================
// 职责:
// - 估算因子: 材料排放因子 / 类别乘数 / 行业阶段分摊比例
// - 溯源因子: 特征化因子 / 行业阶段活动 / 活动排放谱
// 约定: 表均为有序 Vec,保证溯源输出确定
// ==========================================

use crate::domain::types::{Industry, LifeCycleStage};
use std::collections::HashMap;

// ==========================================
// 估算因子
// ==========================================

// kg CO2-eq / kg 材料
const MATERIAL_EMISSION_FACTORS: &[(&str, f64)] = &[
    ("cotton", 5.9),
    ("polyester", 9.5),
    ("polyester_recycled", 2.1),
    ("wool", 28.0),
    ("viscose", 8.0),
    ("lyocell", 3.5),
    ("modal", 4.0),
    ("nylon", 12.0),
    ("elastane", 15.0),
    ("acrylic", 11.0),
    ("linen", 3.0),
    ("hemp", 2.5),
    ("silk", 100.0),
    ("leather", 17.0),
    ("rubber", 3.0),
    ("concrete", 0.1),
    ("steel", 2.0),
    ("aluminum", 8.0),
    ("lithium", 15.0),
    ("cobalt", 30.0),
    ("graphite", 3.0),
];

const CATEGORY_MULTIPLIERS: &[(&str, f64)] = &[
    ("climate_change", 1.0),
    ("ozone_depletion", 0.000001),
    ("terrestrial_acidification", 0.01),
    ("acidification", 0.01),
    ("freshwater_eutrophication", 0.001),
    ("marine_eutrophication", 0.005),
    ("human_toxicity", 0.1),
    ("human_toxicity_cancer", 0.00001),
    ("human_toxicity_non_cancer", 0.0001),
    ("photochemical_oxidant_formation", 0.005),
    ("photochemical_ozone_formation", 0.005),
    ("particulate_matter", 0.001),
    ("particulate_matter_formation", 0.001),
    ("terrestrial_ecotoxicity", 0.01),
    ("freshwater_ecotoxicity", 0.05),
    ("ecotoxicity_freshwater", 0.05),
    ("marine_ecotoxicity", 0.03),
    ("ionising_radiation", 0.1),
    ("agricultural_land_occupation", 5.0),
    ("urban_land_occupation", 0.5),
    ("natural_land_transformation", 0.01),
    ("land_use", 10.0),
    ("water_depletion", 50.0),
    ("water_use", 50.0),
    ("metal_depletion", 0.1),
    ("resource_use_minerals", 0.0001),
    ("fossil_depletion", 2.0),
    ("resource_use_fossils", 20.0),
    ("eutrophication_terrestrial", 0.02),
    ("eutrophication_freshwater", 0.001),
    ("eutrophication_marine", 0.005),
];

#[derive(Debug, Clone)]
pub struct EstimationFactors {
    material_ef: HashMap<String, f64>,
    category_multipliers: HashMap<String, f64>,
    stage_allocation: HashMap<Industry, Vec<(LifeCycleStage, f64)>>,
    grave_allocation: Vec<(LifeCycleStage, f64)>,
}

impl EstimationFactors {
    pub fn builtin() -> Self {
        use LifeCycleStage::*;

        let mut stage_allocation = HashMap::new();
        stage_allocation.insert(
            Industry::Textile,
            vec![
                (RawMaterials, 0.35),
                (YarnProduction, 0.10),
                (FabricProduction, 0.15),
                (DyeingFinishing, 0.15),
                (Manufacturing, 0.05),
                (Transport, 0.05),
            ],
        );
        stage_allocation.insert(
            Industry::Footwear,
            vec![
                (RawMaterials, 0.40),
                (ComponentProduction, 0.20),
                (Assembly, 0.10),
                (Transport, 0.10),
            ],
        );
        stage_allocation.insert(
            Industry::Construction,
            vec![
                (RawMaterials, 0.50),
                (Processing, 0.20),
                (Transport, 0.15),
                (Installation, 0.10),
            ],
        );
        stage_allocation.insert(
            Industry::Battery,
            vec![
                (RawMaterials, 0.45),
                (CellProduction, 0.25),
                (PackAssembly, 0.10),
                (Transport, 0.05),
            ],
        );

        Self {
            material_ef: to_map(MATERIAL_EMISSION_FACTORS),
            category_multipliers: to_map(CATEGORY_MULTIPLIERS),
            stage_allocation,
            grave_allocation: vec![(UsePhase, 0.10), (EndOfLife, 0.05)],
        }
    }

    /// 材料排放因子,未登记返回 None
    pub fn material_ef(&self, material_key: &str) -> Option<f64> {
        self.material_ef.get(material_key).copied()
    }

    /// 类别乘数,未登记为 1.0
    pub fn category_multiplier(&self, category: &str) -> f64 {
        self.category_multipliers.get(category).copied().unwrap_or(1.0)
    }

    /// 行业阶段分摊比例 (未归一化)
    pub fn stage_allocation(&self, industry: Industry, include_grave: bool) -> Vec<(LifeCycleStage, f64)> {
        let mut allocation = self
            .stage_allocation
            .get(&industry)
            .cloned()
            .unwrap_or_default();
        if include_grave {
            allocation.extend(self.grave_allocation.iter().copied());
        }
        allocation
    }
}

impl Default for EstimationFactors {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_map(rows: &[(&str, f64)]) -> HashMap<String, f64> {
    rows.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// ==========================================
// 溯源因子
// ==========================================

/// 单条特征化因子
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterizationFactor {
    pub emission: String,
    pub factor: f64,
    pub unit: String,
}

/// 活动排放谱中的能源项
pub const ELECTRICITY_KWH: &str = "electricity_kwh";
pub const STEAM_MJ: &str = "steam_mj";

/// 以立方米计量的水资源流
pub const WATER_FLOWS: [&str; 3] = ["freshwater", "groundwater", "surface_water"];

const CF_CLIMATE_CHANGE: &[(&str, f64, &str)] = &[
    ("CO2", 1.0, "kg CO2-eq/kg CO2"),
    ("CH4", 28.0, "kg CO2-eq/kg CH4"),
    ("N2O", 265.0, "kg CO2-eq/kg N2O"),
    ("SF6", 23500.0, "kg CO2-eq/kg SF6"),
    ("HFC-134a", 1300.0, "kg CO2-eq/kg HFC"),
];
const CF_WATER_DEPLETION: &[(&str, f64, &str)] = &[
    ("freshwater", 1.0, "m3/m3"),
    ("groundwater", 1.2, "m3/m3"),
    ("surface_water", 0.8, "m3/m3"),
];
const CF_TERRESTRIAL_ACIDIFICATION: &[(&str, f64, &str)] = &[
    ("SO2", 1.0, "kg SO2-eq/kg SO2"),
    ("NOx", 0.5, "kg SO2-eq/kg NOx"),
    ("NH3", 1.6, "kg SO2-eq/kg NH3"),
];
const CF_FRESHWATER_EUTROPHICATION: &[(&str, f64, &str)] = &[
    ("PO4", 1.0, "kg P-eq/kg PO4"),
    ("P", 3.06, "kg P-eq/kg P"),
];
const CF_HUMAN_TOXICITY: &[(&str, f64, &str)] = &[
    ("benzene", 1.9e-3, "CTUh/kg"),
    ("formaldehyde", 2.1e-6, "CTUh/kg"),
    ("lead", 4.5e-5, "CTUh/kg"),
];

/// 无专属特征化表的类别 → 同义表
///
/// 先查同义表再回退到气候变化表;EF3.1 水耗等类别因此按自身单位的排放溯源
const CF_ALIASES: &[(&str, &str)] = &[
    ("water_use", "water_depletion"),
    ("acidification", "terrestrial_acidification"),
    ("eutrophication_freshwater", "freshwater_eutrophication"),
    ("human_toxicity_cancer", "human_toxicity"),
    ("human_toxicity_non_cancer", "human_toxicity"),
];

/// 特征化表缺失时的回退类别
pub const FALLBACK_CF_CATEGORY: &str = "climate_change";

// 活动代码 → [(排放名, kg/kg 产品 或 kWh/MJ per kg)]
const ACTIVITY_EMISSIONS: &[(&str, &[(&str, f64)])] = &[
    // 纺纱
    ("spinning", &[("CO2", 0.45), ("CH4", 0.002), ("SO2", 0.001), ("NOx", 0.002), ("electricity_kwh", 2.5), ("steam_mj", 5.0)]),
    ("yarn_twisting", &[("CO2", 0.15), ("CH4", 0.001), ("SO2", 0.0005), ("NOx", 0.001), ("electricity_kwh", 1.2)]),
    ("yarn_winding", &[("CO2", 0.08), ("CH4", 0.0005), ("electricity_kwh", 0.8)]),
    // 原料
    ("fiber_production", &[("CO2", 3.5), ("CH4", 0.05), ("N2O", 0.02), ("SO2", 0.01), ("NOx", 0.02), ("freshwater", 50.0), ("PO4", 0.005), ("P", 0.001)]),
    ("fiber_processing", &[("CO2", 0.8), ("CH4", 0.01), ("SO2", 0.005), ("electricity_kwh", 3.0)]),
    // 织造
    ("weaving", &[("CO2", 0.6), ("CH4", 0.003), ("electricity_kwh", 4.0)]),
    ("knitting", &[("CO2", 0.4), ("CH4", 0.002), ("electricity_kwh", 2.8)]),
    ("finishing_prep", &[("CO2", 0.3), ("CH4", 0.001), ("freshwater", 20.0)]),
    // 染整
    ("dyeing", &[("CO2", 1.2), ("CH4", 0.01), ("SO2", 0.008), ("NOx", 0.005), ("freshwater", 100.0), ("steam_mj", 15.0), ("benzene", 0.00001)]),
    ("printing", &[("CO2", 0.5), ("CH4", 0.003), ("freshwater", 30.0)]),
    ("finishing", &[("CO2", 0.8), ("CH4", 0.005), ("formaldehyde", 0.0001)]),
    // 成衣制造
    ("cutting", &[("CO2", 0.1), ("electricity_kwh", 0.5)]),
    ("sewing", &[("CO2", 0.15), ("electricity_kwh", 0.8)]),
    ("assembly", &[("CO2", 0.08), ("electricity_kwh", 0.3)]),
    // 运输
    ("road_transport", &[("CO2", 0.1), ("CH4", 0.0001), ("NOx", 0.001), ("SO2", 0.0002)]),
    ("sea_transport", &[("CO2", 0.02), ("CH4", 0.00002), ("NOx", 0.0004), ("SO2", 0.0003)]),
    ("air_transport", &[("CO2", 1.2), ("CH4", 0.0003), ("NOx", 0.003)]),
    ("rail_transport", &[("CO2", 0.03), ("CH4", 0.00003), ("NOx", 0.0002)]),
    // 使用阶段
    ("washing", &[("CO2", 0.3), ("freshwater", 50.0), ("PO4", 0.001), ("electricity_kwh", 0.5)]),
    ("drying", &[("CO2", 0.5), ("CH4", 0.002), ("electricity_kwh", 2.5)]),
    ("ironing", &[("CO2", 0.2), ("electricity_kwh", 1.0)]),
    // 废弃
    ("recycling", &[("CO2", -0.5), ("CH4", 0.01)]),
    ("incineration", &[("CO2", 2.0), ("CH4", 0.001), ("SO2", 0.005), ("NOx", 0.003)]),
    ("landfill", &[("CO2", 0.1), ("CH4", 0.2)]),
];

#[derive(Debug, Clone)]
pub struct TraceFactors {
    characterization: HashMap<String, Vec<CharacterizationFactor>>,
    aliases: HashMap<String, String>,
    stage_activities: HashMap<(Industry, LifeCycleStage), Vec<String>>,
    activity_emissions: HashMap<String, Vec<(String, f64)>>,
}

impl TraceFactors {
    pub fn builtin() -> Self {
        let mut characterization = HashMap::new();
        for (category, rows) in [
            ("climate_change", CF_CLIMATE_CHANGE),
            ("water_depletion", CF_WATER_DEPLETION),
            ("terrestrial_acidification", CF_TERRESTRIAL_ACIDIFICATION),
            ("freshwater_eutrophication", CF_FRESHWATER_EUTROPHICATION),
            ("human_toxicity", CF_HUMAN_TOXICITY),
        ] {
            let factors = rows
                .iter()
                .map(|(emission, factor, unit)| CharacterizationFactor {
                    emission: emission.to_string(),
                    factor: *factor,
                    unit: unit.to_string(),
                })
                .collect();
            characterization.insert(category.to_string(), factors);
        }

        let activity_emissions = ACTIVITY_EMISSIONS
            .iter()
            .map(|(code, rows)| {
                (
                    code.to_string(),
                    rows.iter().map(|(e, v)| (e.to_string(), *v)).collect(),
                )
            })
            .collect();

        Self {
            characterization,
            aliases: CF_ALIASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            stage_activities: builtin_stage_activities(),
            activity_emissions,
        }
    }

    /// 类别特征化表
    ///
    /// 查找顺序: 专属表 → 同义表 → 气候变化表
    pub fn characterization_for(&self, category: &str) -> &[CharacterizationFactor] {
        self.characterization
            .get(category)
            .or_else(|| {
                self.aliases
                    .get(category)
                    .and_then(|alias| self.characterization.get(alias))
            })
            .or_else(|| self.characterization.get(FALLBACK_CF_CATEGORY))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 阶段的活动代码列表,未定义阶段为空
    pub fn stage_activities(&self, industry: Industry, stage: LifeCycleStage) -> &[String] {
        self.stage_activities
            .get(&(industry, stage))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 活动排放谱,未登记活动为空
    pub fn activity_emissions(&self, activity: &str) -> &[(String, f64)] {
        self.activity_emissions
            .get(activity)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for TraceFactors {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_stage_activities() -> HashMap<(Industry, LifeCycleStage), Vec<String>> {
    use LifeCycleStage::*;

    let rows: &[(Industry, LifeCycleStage, &[&str])] = &[
        (Industry::Textile, RawMaterials, &["fiber_production", "fiber_processing"]),
        (Industry::Textile, YarnProduction, &["spinning", "yarn_twisting", "yarn_winding"]),
        (Industry::Textile, FabricProduction, &["weaving", "knitting", "finishing_prep"]),
        (Industry::Textile, DyeingFinishing, &["dyeing", "printing", "finishing"]),
        (Industry::Textile, Manufacturing, &["cutting", "sewing", "assembly"]),
        (Industry::Textile, Transport, &["road_transport", "sea_transport", "air_transport"]),
        (Industry::Textile, UsePhase, &["washing", "drying", "ironing"]),
        (Industry::Textile, EndOfLife, &["recycling", "incineration", "landfill"]),
        (Industry::Footwear, RawMaterials, &["leather_production", "rubber_production", "textile_production"]),
        (Industry::Footwear, ComponentProduction, &["sole_manufacturing", "upper_production"]),
        (Industry::Footwear, Assembly, &["lasting", "cementing", "finishing"]),
        (Industry::Footwear, Transport, &["road_transport", "sea_transport"]),
        (Industry::Footwear, UsePhase, &["cleaning", "maintenance"]),
        (Industry::Footwear, EndOfLife, &["recycling", "incineration", "landfill"]),
        (Industry::Construction, RawMaterials, &["cement_production", "aggregate_extraction", "steel_production"]),
        (Industry::Construction, Processing, &["mixing", "forming", "curing"]),
        (Industry::Construction, Transport, &["road_transport", "rail_transport"]),
        (Industry::Construction, Installation, &["site_work", "installation", "finishing"]),
        (Industry::Construction, UsePhase, &["maintenance", "repair"]),
        (Industry::Construction, EndOfLife, &["demolition", "recycling", "landfill"]),
        (Industry::Battery, RawMaterials, &["lithium_extraction", "cobalt_mining", "nickel_production"]),
        (Industry::Battery, CellProduction, &["electrode_coating", "cell_assembly", "formation"]),
        (Industry::Battery, PackAssembly, &["module_assembly", "bms_integration", "pack_finishing"]),
        (Industry::Battery, Transport, &["road_transport", "sea_transport"]),
        (Industry::Battery, UsePhase, &["charging_losses", "thermal_management"]),
        (Industry::Battery, EndOfLife, &["disassembly", "recycling", "disposal"]),
    ];

    rows.iter()
        .map(|(industry, stage, activities)| {
            (
                (*industry, *stage),
                activities.iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect()
}
