// ==========================================
// 生命周期评价引擎 - 过程与交换
// ==========================================
// 职责: 过程条目 / 活动键 / 交换 / 产品系统
// 红线: 活动键按值比较 (database, code),不依赖对象身份
// ==========================================

use crate::domain::types::{ExchangeKind, LifeCycleStage};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ActivityKey - 活动复合键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityKey {
    pub database: String,
    pub code: String,
}

impl ActivityKey {
    pub fn new(database: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.database, self.code)
    }
}

// ==========================================
// ProcessEntry - 过程目录条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessEntry {
    /// 规范化代码
    pub code: String,
    /// 规范过程名称
    pub name: String,
    /// 计量单位 (kg / tkm / kWh / MJ / m3 / unit)
    pub unit: String,
}

// ==========================================
// Exchange - 交换
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub input: ActivityKey,
    /// 非负数量,单位同过程条目
    pub amount: f64,
    pub unit: String,
    #[serde(rename = "type")]
    pub kind: ExchangeKind,
}

impl Exchange {
    pub fn technosphere(input: ActivityKey, amount: f64, unit: &str) -> Self {
        Self {
            input,
            amount,
            unit: unit.to_string(),
            kind: ExchangeKind::Technosphere,
        }
    }

    /// 活动自身产出 (数量恒为 1)
    pub fn production(input: ActivityKey, unit: &str) -> Self {
        Self {
            input,
            amount: 1.0,
            unit: unit.to_string(),
            kind: ExchangeKind::Production,
        }
    }
}

/// 带阶段标签的交换 (合成器与阶段分类器共用的结构遍历产物)
#[derive(Debug, Clone, PartialEq)]
pub struct StagedExchange {
    pub stage: LifeCycleStage,
    pub exchange: Exchange,
}

// ==========================================
// ProductSystem - 产品系统
// ==========================================
// 产品自身的合成活动: 一条 production 自交换 + 全部技术圈交换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSystem {
    pub activity: ActivityKey,
    pub name: String,
    pub exchanges: Vec<Exchange>,
}

impl ProductSystem {
    pub const MAIN_PRODUCT_CODE: &'static str = "main_product";

    pub fn new(project_id: &str, name: &str, technosphere: Vec<Exchange>) -> Self {
        let activity = ActivityKey::new(format!("product_{}", project_id), Self::MAIN_PRODUCT_CODE);
        let mut exchanges = Vec::with_capacity(technosphere.len() + 1);
        exchanges.push(Exchange::production(activity.clone(), "unit"));
        exchanges.extend(technosphere);

        Self {
            activity,
            name: name.to_string(),
            exchanges,
        }
    }

    /// 技术圈交换 (不含自产出)
    pub fn technosphere(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges
            .iter()
            .filter(|e| e.kind == ExchangeKind::Technosphere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_activity_key_structural_equality() {
        let mut index = HashMap::new();
        index.insert(ActivityKey::new("USLCI", "truck"), 3usize);

        let lookup = ActivityKey::new(String::from("USLCI"), String::from("truck"));
        assert_eq!(index.get(&lookup), Some(&3));
    }

    #[test]
    fn test_product_system_prepends_production() {
        let system = ProductSystem::new(
            "p1",
            "Tee",
            vec![Exchange::technosphere(ActivityKey::new("USLCI", "weaving"), 0.2, "kg")],
        );

        assert_eq!(system.activity, ActivityKey::new("product_p1", "main_product"));
        assert_eq!(system.exchanges.len(), 2);
        assert_eq!(system.exchanges[0].kind, ExchangeKind::Production);
        assert_eq!(system.technosphere().count(), 1);
    }
}
