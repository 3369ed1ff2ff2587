// ==========================================
// 生命周期评价引擎 - 领域类型定义
// ==========================================
// 职责: 行业 / 评价范围 / 方法族 / 项目状态 / 生命周期阶段
// 红线: 行业必须是封闭枚举,未知行业在进入引擎前即被拒绝
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 领域枚举解析失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无效的{kind}取值: {value}")]
pub struct DomainParseError {
    pub kind: &'static str,
    pub value: String,
}

impl DomainParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ==========================================
// 行业 (Industry)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Textile,      // 纺织
    Footwear,     // 鞋类
    Construction, // 建材
    Battery,      // 电池
}

impl Industry {
    pub const ALL: [Industry; 4] = [
        Industry::Textile,
        Industry::Footwear,
        Industry::Construction,
        Industry::Battery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Textile => "textile",
            Industry::Footwear => "footwear",
            Industry::Construction => "construction",
            Industry::Battery => "battery",
        }
    }

    /// 展示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Industry::Textile => "Textile",
            Industry::Footwear => "Footwear",
            Industry::Construction => "Construction",
            Industry::Battery => "Battery",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Industry::Textile => "Apparel and textile products",
            Industry::Footwear => "Shoes and footwear products",
            Industry::Construction => "Construction materials",
            Industry::Battery => "Battery systems and cells",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Industry {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "textile" => Ok(Industry::Textile),
            "footwear" => Ok(Industry::Footwear),
            "construction" => Ok(Industry::Construction),
            "battery" => Ok(Industry::Battery),
            _ => Err(DomainParseError::new("行业", s)),
        }
    }
}

// ==========================================
// 评价范围 (Scope)
// ==========================================
// cradle-to-grave 与 both 均包含使用阶段与废弃阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "cradle-to-gate")]
    CradleToGate,
    #[serde(rename = "cradle-to-grave")]
    CradleToGrave,
    #[serde(rename = "both")]
    Both,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::CradleToGate => "cradle-to-gate",
            Scope::CradleToGrave => "cradle-to-grave",
            Scope::Both => "both",
        }
    }

    /// 是否覆盖使用阶段与废弃阶段
    pub fn includes_grave(&self) -> bool {
        matches!(self, Scope::CradleToGrave | Scope::Both)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Scope {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cradle-to-gate" => Ok(Scope::CradleToGate),
            "cradle-to-grave" => Ok(Scope::CradleToGrave),
            "both" => Ok(Scope::Both),
            _ => Err(DomainParseError::new("评价范围", s)),
        }
    }
}

// ==========================================
// 影响评价方法族 (Method Family)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodFamily {
    #[serde(rename = "ReCiPe")]
    ReCiPe,
    #[serde(rename = "EF3.1")]
    Ef31,
}

impl MethodFamily {
    pub const ALL: [MethodFamily; 2] = [MethodFamily::ReCiPe, MethodFamily::Ef31];

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodFamily::ReCiPe => "ReCiPe",
            MethodFamily::Ef31 => "EF3.1",
        }
    }

    /// 求解器方法目录中使用的方法族标签 (用于子串匹配)
    pub fn solver_label(&self) -> &'static str {
        match self {
            MethodFamily::ReCiPe => "ReCiPe Midpoint (H)",
            MethodFamily::Ef31 => "EF 3.1",
        }
    }

    /// 方法全称
    pub fn full_name(&self) -> &'static str {
        match self {
            MethodFamily::ReCiPe => "ReCiPe 2016 Midpoint (H)",
            MethodFamily::Ef31 => "Environmental Footprint 3.1",
        }
    }
}

impl fmt::Display for MethodFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MethodFamily {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ReCiPe" | "recipe" | "RECIPE" => Ok(MethodFamily::ReCiPe),
            "EF3.1" | "ef3.1" | "EF 3.1" => Ok(MethodFamily::Ef31),
            _ => Err(DomainParseError::new("评价方法", s)),
        }
    }
}

// ==========================================
// 项目状态 (Project Status)
// ==========================================
// 状态流转: draft → calculating → completed | error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Calculating,
    Completed,
    Error,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Calculating => "calculating",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Error => "error",
        }
    }

    /// 从数据库字符串解析,未知值按 draft 处理
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "calculating" => ProjectStatus::Calculating,
            "completed" => ProjectStatus::Completed,
            "error" => ProjectStatus::Error,
            _ => ProjectStatus::Draft,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 交换类型 (Exchange Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Technosphere, // 消耗的技术圈过程
    Production,   // 活动自身产出
}

// ==========================================
// 影响值来源 (Impact Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactSource {
    Solver,    // 外部清单求解器
    Estimated, // 确定性估算
}

// ==========================================
// 生命周期阶段 (Life-Cycle Stage)
// ==========================================
// 顺序即报告顺序: 原料 → 生产 → 运输 → 使用 → 废弃
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeCycleStage {
    RawMaterials,
    YarnProduction,
    FabricProduction,
    DyeingFinishing,
    ComponentProduction,
    CellProduction,
    Processing,
    Manufacturing,
    Assembly,
    PackAssembly,
    Transport,
    Installation,
    UsePhase,
    EndOfLife,
}

impl LifeCycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifeCycleStage::RawMaterials => "raw_materials",
            LifeCycleStage::YarnProduction => "yarn_production",
            LifeCycleStage::FabricProduction => "fabric_production",
            LifeCycleStage::DyeingFinishing => "dyeing_finishing",
            LifeCycleStage::ComponentProduction => "component_production",
            LifeCycleStage::CellProduction => "cell_production",
            LifeCycleStage::Processing => "processing",
            LifeCycleStage::Manufacturing => "manufacturing",
            LifeCycleStage::Assembly => "assembly",
            LifeCycleStage::PackAssembly => "pack_assembly",
            LifeCycleStage::Transport => "transport",
            LifeCycleStage::Installation => "installation",
            LifeCycleStage::UsePhase => "use_phase",
            LifeCycleStage::EndOfLife => "end_of_life",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LifeCycleStage::RawMaterials => "Raw Materials",
            LifeCycleStage::YarnProduction => "Yarn Production",
            LifeCycleStage::FabricProduction => "Fabric Production",
            LifeCycleStage::DyeingFinishing => "Dyeing & Finishing",
            LifeCycleStage::ComponentProduction => "Component Production",
            LifeCycleStage::CellProduction => "Cell Production",
            LifeCycleStage::Processing => "Processing",
            LifeCycleStage::Manufacturing => "Manufacturing",
            LifeCycleStage::Assembly => "Assembly",
            LifeCycleStage::PackAssembly => "Pack Assembly",
            LifeCycleStage::Transport => "Transport",
            LifeCycleStage::Installation => "Installation",
            LifeCycleStage::UsePhase => "Use Phase",
            LifeCycleStage::EndOfLife => "End of Life",
        }
    }

    /// 行业阶段词表
    ///
    /// # 说明
    /// - 摇篮到坟墓 (含 both) 追加 use_phase / end_of_life
    pub fn vocabulary(industry: Industry, scope: Scope) -> Vec<LifeCycleStage> {
        use LifeCycleStage::*;

        let mut stages = match industry {
            Industry::Textile => vec![
                RawMaterials,
                YarnProduction,
                FabricProduction,
                DyeingFinishing,
                Manufacturing,
                Transport,
            ],
            Industry::Footwear => vec![RawMaterials, ComponentProduction, Assembly, Transport],
            Industry::Construction => vec![RawMaterials, Processing, Transport, Installation],
            Industry::Battery => vec![RawMaterials, CellProduction, PackAssembly, Transport],
        };

        if scope.includes_grave() {
            stages.push(UsePhase);
            stages.push(EndOfLife);
        }
        stages
    }
}

impl fmt::Display for LifeCycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LifeCycleStage {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use LifeCycleStage::*;

        let stage = match s.trim() {
            "raw_materials" => RawMaterials,
            "yarn_production" => YarnProduction,
            "fabric_production" => FabricProduction,
            "dyeing_finishing" => DyeingFinishing,
            "component_production" => ComponentProduction,
            "cell_production" => CellProduction,
            "processing" => Processing,
            "manufacturing" => Manufacturing,
            "assembly" => Assembly,
            "pack_assembly" => PackAssembly,
            "transport" => Transport,
            "installation" => Installation,
            "use_phase" => UsePhase,
            "end_of_life" => EndOfLife,
            _ => return Err(DomainParseError::new("生命周期阶段", s)),
        };
        Ok(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_parse_rejects_unknown() {
        assert_eq!("Textile".parse::<Industry>().unwrap(), Industry::Textile);
        assert!("furniture".parse::<Industry>().is_err());
    }

    #[test]
    fn test_scope_grave_flags() {
        assert!(!Scope::CradleToGate.includes_grave());
        assert!(Scope::CradleToGrave.includes_grave());
        assert!(Scope::Both.includes_grave());
    }

    #[test]
    fn test_stage_vocabulary_grave_suffix() {
        let gate = LifeCycleStage::vocabulary(Industry::Textile, Scope::CradleToGate);
        let grave = LifeCycleStage::vocabulary(Industry::Textile, Scope::Both);
        assert_eq!(gate.len(), 6);
        assert_eq!(grave.len(), 8);
        assert_eq!(grave.last(), Some(&LifeCycleStage::EndOfLife));
    }

    #[test]
    fn test_stage_serde_matches_as_str() {
        for stage in LifeCycleStage::vocabulary(Industry::Battery, Scope::Both) {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.as_str()));
            assert_eq!(stage.as_str().parse::<LifeCycleStage>().unwrap(), stage);
        }
    }
}
