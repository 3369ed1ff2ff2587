// ==========================================
// 生命周期评价引擎 - 影响评价方法目录
// ==========================================
// 职责: ReCiPe / EF3.1 两个方法族的影响类别定义
// ==========================================

use crate::domain::impact::ImpactCategoryDef;
use crate::domain::types::MethodFamily;
use std::collections::HashMap;

// 类别键 / 描述短语 / 缩写 / 单位
const RECIPE_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("climate_change", "climate change", "GWP100", "kg CO2 eq"),
    ("ozone_depletion", "ozone depletion", "ODP", "kg CFC-11 eq"),
    ("terrestrial_acidification", "terrestrial acidification", "TAP", "kg SO2 eq"),
    ("freshwater_eutrophication", "freshwater eutrophication", "FEP", "kg P eq"),
    ("marine_eutrophication", "marine eutrophication", "MEP", "kg N eq"),
    ("human_toxicity", "human toxicity", "HTPinf", "kg 1,4-DB eq"),
    ("photochemical_oxidant_formation", "photochemical oxidant formation", "POFP", "kg NMVOC"),
    ("particulate_matter_formation", "particulate matter formation", "PMFP", "kg PM10 eq"),
    ("terrestrial_ecotoxicity", "terrestrial ecotoxicity", "TETP", "kg 1,4-DB eq"),
    ("freshwater_ecotoxicity", "freshwater ecotoxicity", "FETP", "kg 1,4-DB eq"),
    ("marine_ecotoxicity", "marine ecotoxicity", "METP", "kg 1,4-DB eq"),
    ("ionising_radiation", "ionising radiation", "IRP_HE", "kg U235 eq"),
    ("agricultural_land_occupation", "agricultural land occupation", "ALOP", "m2a"),
    ("urban_land_occupation", "urban land occupation", "ULOP", "m2a"),
    ("natural_land_transformation", "natural land transformation", "NLTP", "m2"),
    ("water_depletion", "water depletion", "WDP", "m3"),
    ("metal_depletion", "metal depletion", "MDP", "kg Fe eq"),
    ("fossil_depletion", "fossil depletion", "FDP", "kg oil eq"),
];

const EF31_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("climate_change", "climate change", "GWP", "kg CO2 eq"),
    ("ozone_depletion", "ozone depletion", "ODP", "kg CFC-11 eq"),
    ("human_toxicity_cancer", "human toxicity: cancer", "HT-c", "CTUh"),
    ("human_toxicity_non_cancer", "human toxicity: non-cancer", "HT-nc", "CTUh"),
    ("particulate_matter", "particulate matter", "PM", "disease incidence"),
    ("ionising_radiation", "ionising radiation", "IR", "kBq U235 eq"),
    ("photochemical_ozone_formation", "photochemical ozone formation", "POF", "kg NMVOC eq"),
    ("acidification", "acidification", "AP", "mol H+ eq"),
    ("eutrophication_terrestrial", "eutrophication: terrestrial", "EP-t", "mol N eq"),
    ("eutrophication_freshwater", "eutrophication: freshwater", "EP-fw", "kg P eq"),
    ("eutrophication_marine", "eutrophication: marine", "EP-m", "kg N eq"),
    ("ecotoxicity_freshwater", "ecotoxicity: freshwater", "ET-fw", "CTUe"),
    ("land_use", "land use", "LU", "Pt"),
    ("water_use", "water use", "WU", "m3 world eq"),
    ("resource_use_minerals", "resource use: minerals and metals", "RU-mm", "kg Sb eq"),
    ("resource_use_fossils", "resource use: fossils", "RU-f", "MJ"),
];

// ==========================================
// ImpactMethodCatalog - 方法目录
// ==========================================
#[derive(Debug, Clone)]
pub struct ImpactMethodCatalog {
    families: HashMap<MethodFamily, Vec<ImpactCategoryDef>>,
}

impl ImpactMethodCatalog {
    pub fn builtin() -> Self {
        let mut families = HashMap::new();
        families.insert(MethodFamily::ReCiPe, build(MethodFamily::ReCiPe, RECIPE_CATEGORIES));
        families.insert(MethodFamily::Ef31, build(MethodFamily::Ef31, EF31_CATEGORIES));
        Self { families }
    }

    /// 方法族下全部类别 (定义顺序)
    pub fn categories(&self, method: MethodFamily) -> &[ImpactCategoryDef] {
        self.families
            .get(&method)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn find(&self, method: MethodFamily, key: &str) -> Option<&ImpactCategoryDef> {
        self.categories(method).iter().find(|c| c.key == key)
    }

    /// 类别单位,未定义时为 "unit"
    pub fn unit_for(&self, method: MethodFamily, key: &str) -> &str {
        self.find(method, key).map(|c| c.unit.as_str()).unwrap_or("unit")
    }

    pub fn category_keys(&self, method: MethodFamily) -> Vec<&str> {
        self.categories(method).iter().map(|c| c.key.as_str()).collect()
    }
}

impl Default for ImpactMethodCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn build(method: MethodFamily, rows: &[(&str, &str, &str, &str)]) -> Vec<ImpactCategoryDef> {
    rows.iter()
        .map(|(key, name, abbreviation, unit)| ImpactCategoryDef {
            method,
            key: key.to_string(),
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            unit: unit.to_string(),
        })
        .collect()
}
