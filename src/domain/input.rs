// ==========================================
// 生命周期评价引擎 - 输入文档
// ==========================================
// 职责: 按行业定义产品结构 (纤维→纱线→面料 / 正极-负极-电解液 等)
// 约定: 百分比字段缺失/为 null/为数字字符串时宽松解析,缺失按 0 处理
// 约定: 列表为 null/非数组时按空列表处理,非对象元素跳过
// 约定: 不做归一化,同级百分比之和不要求为 100
// ==========================================

use crate::domain::types::Industry;
use serde::{Deserialize, Serialize};

// ==========================================
// 宽松数值解析
// ==========================================
pub(crate) mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value_to_f64(value: Option<Value>) -> Option<f64> {
        match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(Value::Bool(b)) => Some(if b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// 数值字段: 无法解析时按 0 处理
    pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value_to_f64(value).filter(|v| v.is_finite()).unwrap_or(0.0))
    }

    /// 可选数值字段: 无法解析时为 None
    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value_to_f64(value).filter(|v| v.is_finite()))
    }

    /// 布尔字段: 支持 true/false/"true"/1
    pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
            Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
            _ => false,
        })
    }

    /// 文本字段: null / 非字符串 → None
    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// 列表字段: null / 非数组 → 空列表,无法解析的元素跳过
    pub fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<T>(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    /// 嵌套块: 非对象 → None
    pub fn opt_struct<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(item @ Value::Object(_)) => serde_json::from_value::<T>(item).ok(),
            _ => None,
        })
    }
}

// ==========================================
// 纺织 (Textile)
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiberInput {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub material: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub percentage: f64,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub production_location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YarnInput {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub count_nm: Option<f64>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub percentage: f64,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub spinning_method: Option<String>,
    #[serde(deserialize_with = "lenient::vec_or_empty")]
    pub fibers: Vec<FiberInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FabricInput {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub construction_method: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub percentage: f64,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub finishing_method: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub coloring_method: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub color_depth: Option<String>,
    /// 面料引用的纱线 (仅保存,不参与计算)
    #[serde(deserialize_with = "lenient::vec_or_empty")]
    pub yarns: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManufacturingInput {
    #[serde(deserialize_with = "lenient::vec_or_empty")]
    pub finish_treatments: Vec<serde_json::Value>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub cutting_waste_percentage: f64,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub waste_recycled_percentage: f64,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub waste_incinerated_percentage: f64,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub waste_landfilled_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportLeg {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub mode: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub distance_km: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportInput {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub final_destination: Option<String>,
    #[serde(deserialize_with = "lenient::vec_or_empty")]
    pub legs: Vec<TransportLeg>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsePhaseInput {
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub include: bool,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub washing_temperature: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub drying_method: Option<String>,
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub ironing: bool,
    /// 缺失时: 交换合成按 0 处理,估算器按默认洗涤次数处理
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub lifetime_washing_cycles: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub washing_transport_distance_km: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndOfLifeInput {
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub include: bool,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub recycled_percentage: f64,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub incinerated_percentage: f64,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub landfill_percentage: f64,
}

/// 纺织产品输入
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextileInput {
    #[serde(deserialize_with = "lenient::vec_or_empty")]
    pub yarns: Vec<YarnInput>,
    #[serde(deserialize_with = "lenient::vec_or_empty")]
    pub fabrics: Vec<FabricInput>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub manufacturing: Option<ManufacturingInput>,
    pub production_locations: Option<serde_json::Value>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub transport: Option<TransportInput>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub use_phase: Option<UsePhaseInput>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub end_of_life: Option<EndOfLifeInput>,
}

// ==========================================
// 非纺织行业通用块
// ==========================================

/// 物料占比 (鞋面/鞋底材料、建材添加剂)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialShare {
    #[serde(rename = "type", deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub percentage: f64,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub origin: Option<String>,
}

/// 单段运输 (鞋类字段名为 primary_mode)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleTransport {
    #[serde(alias = "primary_mode", deserialize_with = "lenient::opt_string")]
    pub mode: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub distance: f64,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeFlag {
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub include: bool,
}

// ==========================================
// 鞋类 (Footwear)
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootwearEndOfLife {
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub include: bool,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub recycled: f64,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub incinerated: f64,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub landfill: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootwearInput {
    #[serde(deserialize_with = "lenient::vec_or_empty")]
    pub upper_materials: Vec<MaterialShare>,
    #[serde(deserialize_with = "lenient::vec_or_empty")]
    pub sole_materials: Vec<MaterialShare>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub transport: Option<SimpleTransport>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub use_phase: Option<IncludeFlag>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub end_of_life: Option<FootwearEndOfLife>,
}

// ==========================================
// 建材 (Construction)
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainMaterial {
    #[serde(rename = "type", deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub recycled_content: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionEndOfLife {
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub include: bool,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub recyclable: f64,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub downcyclable: f64,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub landfill: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionInput {
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub main_material: Option<MainMaterial>,
    #[serde(deserialize_with = "lenient::vec_or_empty")]
    pub additives: Vec<MaterialShare>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub transport: Option<SimpleTransport>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub use_phase: Option<IncludeFlag>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub end_of_life: Option<ConstructionEndOfLife>,
}

// ==========================================
// 电池 (Battery)
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CathodeInput {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub chemistry: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub percentage: f64,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub recycled_content: f64,
}

/// 负极 / 隔膜 (material + percentage)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentShare {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub material: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectrolyteInput {
    #[serde(rename = "type", deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingInput {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub cell_format: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub housing_material: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub housing_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryEndOfLife {
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub include: bool,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub recycling_rate: f64,
    #[serde(deserialize_with = "lenient::bool_or_false")]
    pub second_life: bool,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub material_recovery: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryInput {
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub cathode: Option<CathodeInput>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub anode: Option<ComponentShare>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub electrolyte: Option<ElectrolyteInput>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub separator: Option<ComponentShare>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub housing: Option<HousingInput>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub transport: Option<SimpleTransport>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub use_phase: Option<IncludeFlag>,
    #[serde(deserialize_with = "lenient::opt_struct")]
    pub end_of_life: Option<BatteryEndOfLife>,
}

// ==========================================
// InputDocument - 按行业标记的输入文档
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "industry", rename_all = "lowercase")]
pub enum InputDocument {
    Textile(TextileInput),
    Footwear(FootwearInput),
    Construction(ConstructionInput),
    Battery(BatteryInput),
}

impl InputDocument {
    /// 按行业解析 JSON 输入
    ///
    /// # 说明
    /// - 字段级缺失/类型偏差宽松处理,列表与嵌套块类型不符时视为缺失
    /// - 顶层不是对象 (如字符串或数组) 返回错误,由调用方在保存输入时拒绝
    pub fn from_value(industry: Industry, value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::empty(industry));
        }
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "{} 输入必须是 JSON 对象",
                industry
            )));
        }

        let doc = match industry {
            Industry::Textile => InputDocument::Textile(TextileInput::deserialize(value)?),
            Industry::Footwear => InputDocument::Footwear(FootwearInput::deserialize(value)?),
            Industry::Construction => {
                InputDocument::Construction(ConstructionInput::deserialize(value)?)
            }
            Industry::Battery => InputDocument::Battery(BatteryInput::deserialize(value)?),
        };
        Ok(doc)
    }

    /// 空文档
    pub fn empty(industry: Industry) -> Self {
        match industry {
            Industry::Textile => InputDocument::Textile(TextileInput::default()),
            Industry::Footwear => InputDocument::Footwear(FootwearInput::default()),
            Industry::Construction => InputDocument::Construction(ConstructionInput::default()),
            Industry::Battery => InputDocument::Battery(BatteryInput::default()),
        }
    }

    pub fn industry(&self) -> Industry {
        match self {
            InputDocument::Textile(_) => Industry::Textile,
            InputDocument::Footwear(_) => Industry::Footwear,
            InputDocument::Construction(_) => Industry::Construction,
            InputDocument::Battery(_) => Industry::Battery,
        }
    }

    /// 是否声明纳入使用阶段
    pub fn use_phase_included(&self) -> bool {
        match self {
            InputDocument::Textile(t) => t.use_phase.as_ref().map_or(false, |u| u.include),
            InputDocument::Footwear(f) => f.use_phase.as_ref().map_or(false, |u| u.include),
            InputDocument::Construction(c) => c.use_phase.as_ref().map_or(false, |u| u.include),
            InputDocument::Battery(b) => b.use_phase.as_ref().map_or(false, |u| u.include),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_textile_lenient_numbers() {
        let doc = InputDocument::from_value(
            Industry::Textile,
            &json!({
                "yarns": [{
                    "name": "Y1",
                    "percentage": "60",
                    "fibers": [{"material": "Cotton fiber (Global)", "percentage": null}]
                }],
                "use_phase": {"include": "true"}
            }),
        )
        .unwrap();

        let InputDocument::Textile(textile) = doc else {
            panic!("应解析为纺织文档");
        };
        assert_eq!(textile.yarns[0].percentage, 60.0);
        assert_eq!(textile.yarns[0].fibers[0].percentage, 0.0);
        assert!(textile.yarns[0].spinning_method.is_none());
        assert!(textile.use_phase.unwrap().include);
    }

    #[test]
    fn test_footwear_primary_mode_alias() {
        let doc = InputDocument::from_value(
            Industry::Footwear,
            &json!({"transport": {"primary_mode": "Container ship", "distance": 9000}}),
        )
        .unwrap();

        let InputDocument::Footwear(footwear) = doc else {
            panic!("应解析为鞋类文档");
        };
        let transport = footwear.transport.unwrap();
        assert_eq!(transport.mode.as_deref(), Some("Container ship"));
        assert_eq!(transport.distance, 9000.0);
    }

    #[test]
    fn test_null_document_is_empty() {
        let doc = InputDocument::from_value(Industry::Battery, &serde_json::Value::Null).unwrap();
        assert_eq!(doc, InputDocument::empty(Industry::Battery));
        assert!(!doc.use_phase_included());
    }

    #[test]
    fn test_top_level_shape_error() {
        assert!(InputDocument::from_value(Industry::Textile, &json!("cotton")).is_err());
        assert!(InputDocument::from_value(Industry::Battery, &json!([1, 2])).is_err());
    }

    #[test]
    fn test_null_or_mistyped_lists_are_empty() {
        let doc = InputDocument::from_value(
            Industry::Textile,
            &json!({
                "yarns": [{"percentage": 100, "fibers": null}, 7, "loose"],
                "fabrics": [{"yarns": [1], "percentage": 100}],
                "manufacturing": {"finish_treatments": "softener"},
                "transport": {"legs": null}
            }),
        )
        .unwrap();

        let InputDocument::Textile(textile) = doc else {
            panic!("应解析为纺织文档");
        };
        assert_eq!(textile.yarns.len(), 1);
        assert!(textile.yarns[0].fibers.is_empty());
        assert_eq!(textile.fabrics[0].yarns, vec![json!(1)]);
        assert!(textile.manufacturing.unwrap().finish_treatments.is_empty());
        assert!(textile.transport.unwrap().legs.is_empty());

        let InputDocument::Textile(textile) =
            InputDocument::from_value(Industry::Textile, &json!({"yarns": "cotton"})).unwrap()
        else {
            panic!("应解析为纺织文档");
        };
        assert!(textile.yarns.is_empty());
    }

    #[test]
    fn test_mistyped_blocks_are_missing() {
        let doc = InputDocument::from_value(
            Industry::Footwear,
            &json!({"upper_materials": null, "sole_materials": {"type": "EVA"}, "transport": "ship"}),
        )
        .unwrap();
        assert_eq!(doc, InputDocument::empty(Industry::Footwear));

        let doc = InputDocument::from_value(
            Industry::Battery,
            &json!({"cathode": "x", "anode": {"material": "Graphite", "percentage": "15"}}),
        )
        .unwrap();
        let InputDocument::Battery(battery) = doc else {
            panic!("应解析为电池文档");
        };
        assert!(battery.cathode.is_none());
        assert_eq!(battery.anode.unwrap().percentage, 15.0);
    }
}
