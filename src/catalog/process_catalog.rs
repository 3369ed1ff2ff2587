// ==========================================
// 生命周期评价引擎 - 过程目录
// ==========================================
// 职责: 可读名称 → 规范化过程代码 / 过程名称 / 单位
// 红线: 纺织过程经策展目录解析;鞋类/建材/电池按用户字段即时规范化
// ==========================================

use crate::domain::exchange::{ActivityKey, Exchange, ProcessEntry};
use std::collections::HashMap;

/// 规范化过程标签
///
/// # 规则
/// 1. 转小写
/// 2. 删除 `,` `(` `)`
/// 3. `" - "` → `_`,空格与短横线 → `_`
/// 4. 合并连续下划线,去除首尾下划线
///
/// # 性质
/// - 全函数: 空串返回空串
/// - 幂等: normalize(normalize(x)) == normalize(x)
pub fn normalize(label: &str) -> String {
    if label.is_empty() {
        return String::new();
    }

    let mut code = label.to_lowercase();
    code.retain(|c| !matches!(c, ',' | '(' | ')'));
    let code = code.replace(" - ", "_").replace(' ', "_").replace('-', "_");

    let mut collapsed = String::with_capacity(code.len());
    let mut prev_underscore = false;
    for c in code.chars() {
        if c == '_' {
            if !prev_underscore {
                collapsed.push(c);
            }
            prev_underscore = true;
        } else {
            collapsed.push(c);
            prev_underscore = false;
        }
    }

    collapsed.trim_matches('_').to_string()
}

// 标签 / 过程名称 / 单位
const CURATED_PROCESSES: &[(&str, &str, &str)] = &[
    // ===== 纤维 =====
    ("Cotton fiber (Global)", "cotton fiber production", "kg"),
    ("Cotton, organic (Global)", "cotton fiber production, organic", "kg"),
    ("Polyester fiber (Global)", "polyester fiber production", "kg"),
    ("Polyester, recycled (Global)", "polyester fiber production, recycled", "kg"),
    ("Wool fiber (Global)", "wool production", "kg"),
    ("Viscose fiber (Global)", "viscose fiber production", "kg"),
    ("Lyocell fiber (Global)", "lyocell fiber production", "kg"),
    ("Modal fiber (Global)", "modal fiber production", "kg"),
    ("Elastane fiber (Global)", "elastane fiber production", "kg"),
    ("Nylon fiber (Global)", "nylon fiber production", "kg"),
    ("Acrylic fiber (Global)", "acrylic fiber production", "kg"),
    ("Linen fiber (Global)", "flax fiber production", "kg"),
    ("Hemp fiber (Global)", "hemp fiber production", "kg"),
    ("Silk fiber (Global)", "silk production", "kg"),
    // ===== 纺纱 =====
    ("Ring spinning", "yarn spinning, ring", "kg"),
    ("Ring spinning for weaving, carded yarn", "yarn spinning, ring, weaving, carded", "kg"),
    ("Ring spinning for weaving, combed yarn", "yarn spinning, ring, weaving, combed", "kg"),
    ("Ring spinning for knitting, carded yarn", "yarn spinning, ring, knitting, carded", "kg"),
    ("Ring spinning for knitting, combed yarn", "yarn spinning, ring, knitting, combed", "kg"),
    ("Open end spinning", "yarn spinning, open-end", "kg"),
    ("Open end spinning for weaving, carded yarn", "yarn spinning, open-end, weaving, carded", "kg"),
    ("Open end spinning for knitting, carded yarn", "yarn spinning, open-end, knitting, carded", "kg"),
    ("Air-jet spinning", "yarn spinning, air-jet", "kg"),
    ("Air-jet spinning for knitting, carded yarn", "yarn spinning, air-jet, knitting, carded", "kg"),
    ("Air-jet spinning for weaving, combed yarn", "yarn spinning, air-jet, weaving, combed", "kg"),
    ("Vortex spinning", "yarn spinning, vortex", "kg"),
    ("Vortex spinning for knitting, carded yarn", "yarn spinning, vortex, knitting, carded", "kg"),
    ("Vortex spinning for weaving, combed yarn", "yarn spinning, vortex, weaving, combed", "kg"),
    ("Multifilament spinning of synthetic yarns", "yarn spinning, multifilament, synthetic", "kg"),
    // ===== 织造 =====
    ("Weaving", "weaving", "kg"),
    ("Weaving - Air jet", "weaving, air-jet", "kg"),
    ("Weaving - Water jet", "weaving, water-jet", "kg"),
    ("Weaving - Rapier", "weaving, rapier", "kg"),
    ("Weaving - Projectile", "weaving, projectile", "kg"),
    ("Knitting - Circular", "knitting, circular", "kg"),
    ("Knitting - Flatbed", "knitting, flat", "kg"),
    ("Knitting - Warp", "knitting, warp", "kg"),
    ("Non-woven", "nonwoven production", "kg"),
    ("Non-woven, needle punch", "nonwoven production, needle punch", "kg"),
    ("Non-woven, spunbond", "nonwoven production, spunbond", "kg"),
    // ===== 染整 =====
    ("Dyeing - Jet", "textile dyeing, jet", "kg"),
    ("Jet dyeing - natural fibers / fiber blends", "textile dyeing, jet, natural fibers", "kg"),
    ("Jet dyeing - synthetic fibers", "textile dyeing, jet, synthetic", "kg"),
    ("Jigger dyeing", "textile dyeing, jigger", "kg"),
    ("Pad batch dyeing", "textile dyeing, pad-batch", "kg"),
    ("Pad-steam dyeing", "textile dyeing, pad-steam", "kg"),
    ("Air-jet dyeing - natural fibers / fiber blends", "textile dyeing, air-jet, natural", "kg"),
    ("No dyeing/printing", "no process", "kg"),
    ("Spun-dyed (dope dyed)", "spun dyeing", "kg"),
    ("Screen printing", "textile printing, screen", "kg"),
    ("Digital printing", "textile printing, digital", "kg"),
    ("Transfer printing", "textile printing, transfer", "kg"),
    ("Finishing - Chemical", "textile finishing", "kg"),
    ("Continuous - natural fibers / fiber blends", "textile finishing, continuous, natural", "kg"),
    ("Continuous - synthetic fibers", "textile finishing, continuous, synthetic", "kg"),
    ("Semi-continuous - natural fibers / fiber blends", "textile finishing, semi-continuous, natural", "kg"),
    ("Semi-continuous - synthetic fibers", "textile finishing, semi-continuous, synthetic", "kg"),
    ("Batch - natural fibers", "textile finishing, batch, natural", "kg"),
    ("Batch - synthetic fibers", "textile finishing, batch, synthetic", "kg"),
    // ===== 运输 =====
    ("Truck", "transport, freight, lorry", "tkm"),
    ("Container ship", "transport, freight, sea, container ship", "tkm"),
    ("Aircraft", "transport, freight, aircraft", "tkm"),
    ("Train", "transport, freight, train", "tkm"),
    // ===== 废弃处理 =====
    ("Incineration", "waste textile incineration", "kg"),
    ("Landfill", "waste textile landfill", "kg"),
    ("Recycling", "textile recycling", "kg"),
    // ===== 能源 =====
    ("Electricity", "electricity production", "kWh"),
    ("Natural gas", "natural gas, burned", "MJ"),
    ("Steam", "steam production", "MJ"),
    // ===== 水与化学品 =====
    ("Water", "tap water production", "kg"),
    ("Wastewater treatment", "wastewater treatment", "m3"),
    // ===== 鞋类 =====
    ("Leather", "leather production", "kg"),
    ("Synthetic leather", "synthetic leather production", "kg"),
    ("Textile - woven", "textile woven production", "kg"),
    ("Textile - knit", "textile knit production", "kg"),
    ("Mesh", "mesh fabric production", "kg"),
    ("Rubber", "rubber production", "kg"),
    ("TPU", "TPU production", "kg"),
    ("Recycled polyester", "recycled polyester production", "kg"),
    ("Organic cotton", "organic cotton production", "kg"),
    ("Rubber - natural", "natural rubber production", "kg"),
    ("Rubber - synthetic", "synthetic rubber production", "kg"),
    ("EVA", "EVA foam production", "kg"),
    ("PU foam", "PU foam production", "kg"),
    ("Cork", "cork production", "kg"),
    ("Recycled rubber", "recycled rubber production", "kg"),
    // ===== 建材 =====
    ("Portland cement", "portland cement production", "kg"),
    ("Recycled aggregate", "recycled aggregate production", "kg"),
    ("Virgin aggregate", "virgin aggregate production", "kg"),
    ("Steel", "steel production", "kg"),
    ("Glass wool", "glass wool insulation production", "kg"),
    ("Stone wool", "stone wool insulation production", "kg"),
    ("EPS", "expanded polystyrene production", "kg"),
    ("XPS", "extruded polystyrene production", "kg"),
    ("PIR", "PIR insulation production", "kg"),
    ("Wood fiber", "wood fiber insulation production", "kg"),
    ("Timber - softwood", "softwood timber production", "kg"),
    ("Timber - hardwood", "hardwood timber production", "kg"),
    ("Clay brick", "clay brick production", "kg"),
    ("Concrete block", "concrete block production", "kg"),
    ("Concrete", "concrete production", "kg"),
    ("Aluminum", "aluminum production", "kg"),
    ("Glass", "flat glass production", "kg"),
    ("Plasticizer", "plasticizer production", "kg"),
    ("Accelerator", "concrete accelerator production", "kg"),
    ("Retarder", "concrete retarder production", "kg"),
    ("Air entrainer", "air entraining agent production", "kg"),
    ("Water reducer", "water reducing agent production", "kg"),
    ("Pigment", "pigment production", "kg"),
    ("Fiber reinforcement", "fiber reinforcement production", "kg"),
    // ===== 电池 =====
    ("NMC (Nickel Manganese Cobalt)", "NMC cathode production", "kg"),
    ("LFP (Lithium Iron Phosphate)", "LFP cathode production", "kg"),
    ("NCA (Nickel Cobalt Aluminum)", "NCA cathode production", "kg"),
    ("LMO (Lithium Manganese Oxide)", "LMO cathode production", "kg"),
    ("nmc", "NMC cathode production", "kg"),
    ("lfp", "LFP cathode production", "kg"),
    ("nca", "NCA cathode production", "kg"),
    ("lmo", "LMO cathode production", "kg"),
    ("Graphite - natural", "natural graphite anode production", "kg"),
    ("Graphite - synthetic", "synthetic graphite anode production", "kg"),
    ("Silicon-graphite composite", "silicon-graphite anode production", "kg"),
    ("Lithium metal", "lithium metal anode production", "kg"),
    ("Lithium titanate", "lithium titanate anode production", "kg"),
    ("graphite", "graphite anode production", "kg"),
    ("Liquid - LiPF6", "liquid electrolyte production", "kg"),
    ("Solid - polymer", "solid polymer electrolyte production", "kg"),
    ("Solid - ceramic", "solid ceramic electrolyte production", "kg"),
    ("Gel", "gel electrolyte production", "kg"),
    ("electrolyte", "electrolyte production", "kg"),
    ("Polyethylene", "PE separator production", "kg"),
    ("Polypropylene", "PP separator production", "kg"),
    ("Ceramic coated", "ceramic coated separator production", "kg"),
    ("Composite", "composite separator production", "kg"),
    ("Cylindrical", "cylindrical cell housing production", "kg"),
    ("Prismatic", "prismatic cell housing production", "kg"),
    ("Pouch", "pouch cell housing production", "kg"),
];

// ==========================================
// ProcessCatalog - 过程目录 (只读,启动时构建一次)
// ==========================================
#[derive(Debug, Clone)]
pub struct ProcessCatalog {
    entries: Vec<(String, ProcessEntry)>,
    by_label: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
}

impl ProcessCatalog {
    /// 内置策展目录
    pub fn builtin() -> Self {
        let mut entries = Vec::with_capacity(CURATED_PROCESSES.len());
        let mut by_label = HashMap::new();
        let mut by_code = HashMap::new();

        for (idx, (label, name, unit)) in CURATED_PROCESSES.iter().enumerate() {
            let code = normalize(label);
            by_label.insert(label.to_string(), idx);
            // 同码以先登记者为准
            by_code.entry(code.clone()).or_insert(idx);
            entries.push((
                label.to_string(),
                ProcessEntry {
                    code,
                    name: name.to_string(),
                    unit: unit.to_string(),
                },
            ));
        }

        Self {
            entries,
            by_label,
            by_code,
        }
    }

    /// 按可读标签查找
    pub fn lookup(&self, label: &str) -> Option<&ProcessEntry> {
        self.by_label.get(label).map(|&idx| &self.entries[idx].1)
    }

    /// 按规范化代码查找
    pub fn by_code(&self, code: &str) -> Option<&ProcessEntry> {
        self.by_code.get(code).map(|&idx| &self.entries[idx].1)
    }

    /// 解析标签对应代码
    ///
    /// 目录命中时取条目代码,否则按同一规则即时规范化
    pub fn resolve_code(&self, label: &str) -> String {
        match self.lookup(label) {
            Some(entry) => entry.code.clone(),
            None => normalize(label),
        }
    }

    /// 代码对应单位,未登记时为 kg
    pub fn unit_for_code(&self, code: &str) -> &str {
        self.by_code(code).map(|e| e.unit.as_str()).unwrap_or("kg")
    }

    /// 条目的合成 production 自交换
    pub fn production_exchange(&self, database: &str, label: &str) -> Option<Exchange> {
        self.lookup(label).map(|entry| {
            Exchange::production(ActivityKey::new(database, entry.code.clone()), &entry.unit)
        })
    }

    /// 全部 (标签, 条目)
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ProcessEntry)> {
        self.entries.iter().map(|(label, entry)| (label.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProcessCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ExchangeKind;

    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("Weaving - Air jet"), "weaving_air_jet");
        assert_eq!(normalize("Cotton fiber (Global)"), "cotton_fiber_global");
        assert_eq!(normalize("Cotton, organic (Global)"), "cotton_organic_global");
        assert_eq!(normalize("No dyeing/printing"), "no_dyeing/printing");
        assert_eq!(normalize("  Truck  "), "truck");
        assert_eq!(normalize("---"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for label in [
            "Jet dyeing - natural fibers / fiber blends",
            "Semi-continuous - synthetic fibers",
            "NMC (Nickel Manganese Cobalt)",
            "a -- b",
        ] {
            let once = normalize(label);
            assert_eq!(normalize(&once), once, "label={}", label);
        }
    }

    #[test]
    fn test_catalog_codes_are_fixed_points() {
        let catalog = ProcessCatalog::builtin();
        assert!(!catalog.is_empty());
        for (label, entry) in catalog.entries() {
            assert_eq!(normalize(label), entry.code);
            assert_eq!(normalize(&entry.code), entry.code);
        }
    }

    #[test]
    fn test_lookup_and_units() {
        let catalog = ProcessCatalog::builtin();
        let truck = catalog.lookup("Truck").unwrap();
        assert_eq!(truck.code, "truck");
        assert_eq!(truck.unit, "tkm");
        assert_eq!(catalog.unit_for_code("electricity"), "kWh");
        assert_eq!(catalog.unit_for_code("unknown_material"), "kg");
        assert!(catalog.lookup("Unobtainium").is_none());
        assert_eq!(catalog.resolve_code("Unobtainium Alloy"), "unobtainium_alloy");
    }

    #[test]
    fn test_production_self_exchange() {
        let catalog = ProcessCatalog::builtin();
        let exchange = catalog.production_exchange("USLCI", "Ring spinning").unwrap();
        assert_eq!(exchange.kind, ExchangeKind::Production);
        assert_eq!(exchange.amount, 1.0);
        assert_eq!(exchange.input, ActivityKey::new("USLCI", "ring_spinning"));
    }
}
