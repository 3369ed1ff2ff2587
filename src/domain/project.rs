// ==========================================
// 生命周期评价引擎 - 项目实体
// ==========================================
// 职责: 项目元数据 (行业/范围/数据库/方法/产品重量/情景)
// 红线: 计算请求后仅允许状态流转,其余字段只读
// ==========================================

use crate::domain::types::{Industry, MethodFamily, ProjectStatus, Scope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// LCA 项目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub industry: Industry,
    pub scope: Scope,
    /// 背景清单数据库名称 (如 USLCI)
    pub database: String,
    pub method: MethodFamily,
    pub product_weight_grams: f64,
    pub product_scenario: String,
    /// 原始输入文档 (按行业 schema 的 JSON)
    pub input_data: Option<serde_json::Value>,
    pub status: ProjectStatus,
    /// 计算序号 (每次触发计算 +1)
    pub calc_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// 创建草稿项目
    pub fn new_draft(draft: ProjectDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            description: draft.description.unwrap_or_default(),
            industry: draft.industry,
            scope: draft.scope,
            database: draft.database,
            method: draft.method,
            product_weight_grams: draft.product_weight_grams,
            product_scenario: draft.product_scenario,
            input_data: None,
            status: ProjectStatus::Draft,
            calc_version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// 产品重量 (kg)
    pub fn weight_kg(&self) -> f64 {
        self.product_weight_grams / 1000.0
    }
}

/// 新建项目请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub industry: Industry,
    pub scope: Scope,
    pub database: String,
    pub method: MethodFamily,
    pub product_weight_grams: f64,
    pub product_scenario: String,
}
