// ==========================================
// 生命周期评价引擎 - 项目管理 API
// ==========================================
// 职责: 项目创建 / 查询 / 输入文档更新 / 删除,参考目录查询
// 红线: 未知行业 / 范围 / 方法在进入引擎前即被拒绝
// ==========================================

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::catalog::reference::{
    find_database, stage_catalog, InventoryDatabase, MethodSummary, StageInfo, DEFAULT_DATABASE,
    INVENTORY_DATABASES,
};
use crate::domain::impact::ImpactCategoryDef;
use crate::domain::input::InputDocument;
use crate::domain::project::{Project, ProjectDraft};
use crate::domain::types::{Industry, MethodFamily, Scope};
use crate::engine::EngineContext;
use crate::repository::ProjectRepository;

/// 新建项目请求 (字符串字段,由 API 层解析校验)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub industry: String,
    pub scope: String,
    /// 缺省为 USLCI
    #[serde(default)]
    pub database: Option<String>,
    pub method: String,
    pub product_weight_grams: f64,
    #[serde(default)]
    pub product_scenario: String,
}

// ==========================================
// ProjectApi - 项目管理 API
// ==========================================

/// 项目管理API
///
/// 职责：
/// 1. 项目 CRUD
/// 2. 输入文档校验与保存
/// 3. 数据库 / 方法 / 类别 / 阶段参考目录
pub struct ProjectApi {
    project_repo: Arc<ProjectRepository>,
    ctx: Arc<EngineContext>,
}

impl ProjectApi {
    pub fn new(project_repo: Arc<ProjectRepository>, ctx: Arc<EngineContext>) -> Self {
        Self { project_repo, ctx }
    }

    /// 创建项目
    ///
    /// # 校验
    /// - 名称非空
    /// - 行业 / 范围 / 方法 必须为已知取值
    /// - 数据库必须为已登记的清单数据库
    /// - 产品重量为正的有限数
    pub fn create_project(&self, request: CreateProjectRequest) -> ApiResult<Project> {
        if request.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("项目名称不能为空".to_string()));
        }
        if !request.product_weight_grams.is_finite() || request.product_weight_grams <= 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "产品重量必须为正数: {}",
                request.product_weight_grams
            )));
        }

        let industry = parse_field::<Industry>(&request.industry)?;
        let scope = parse_field::<Scope>(&request.scope)?;
        let method = parse_field::<MethodFamily>(&request.method)?;

        let database = request
            .database
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        if find_database(&database).is_none() {
            return Err(ApiError::InvalidInput(format!("未知的清单数据库: {}", database)));
        }

        let project = Project::new_draft(ProjectDraft {
            name: request.name.trim().to_string(),
            description: request.description,
            industry,
            scope,
            database,
            method,
            product_weight_grams: request.product_weight_grams,
            product_scenario: request.product_scenario,
        });
        self.project_repo.insert(&project)?;

        info!(
            project_id = %project.id,
            industry = %project.industry,
            scope = %project.scope,
            method = %project.method,
            "项目已创建"
        );
        Ok(project)
    }

    /// 查询项目
    pub fn get_project(&self, project_id: &str) -> ApiResult<Project> {
        if project_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("项目ID不能为空".to_string()));
        }

        self.project_repo
            .find_by_id(project_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Project(id={})不存在", project_id)))
    }

    pub fn list_projects(&self) -> ApiResult<Vec<Project>> {
        Ok(self.project_repo.list_all()?)
    }

    /// 保存输入文档
    ///
    /// # 校验
    /// - 按项目行业解析;顶层不是 JSON 对象时拒绝保存
    /// - 字段级缺失不拒绝,计算时按默认值处理
    pub fn update_input_data(&self, project_id: &str, input_data: serde_json::Value) -> ApiResult<Project> {
        let project = self.get_project(project_id)?;

        InputDocument::from_value(project.industry, &input_data).map_err(|e| {
            ApiError::InvalidInput(format!("{}输入文档结构错误: {}", project.industry, e))
        })?;

        self.project_repo.update_input_data(project_id, &input_data)?;
        info!(project_id, "输入文档已保存");

        self.get_project(project_id)
    }

    /// 删除项目 (含全部计算结果)
    pub fn delete_project(&self, project_id: &str) -> ApiResult<()> {
        let rows = self.project_repo.delete(project_id)?;
        if rows == 0 {
            return Err(ApiError::NotFound(format!("Project(id={})不存在", project_id)));
        }

        info!(project_id, "项目已删除");
        Ok(())
    }

    // ==========================================
    // 参考目录
    // ==========================================

    pub fn list_databases(&self) -> Vec<InventoryDatabase> {
        INVENTORY_DATABASES.to_vec()
    }

    pub fn list_methods(&self) -> Vec<MethodSummary> {
        MethodFamily::ALL
            .iter()
            .map(|method| MethodSummary {
                id: *method,
                name: method.full_name(),
                categories: self
                    .ctx
                    .methods
                    .category_keys(*method)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }

    /// 方法族下全部影响类别
    pub fn list_categories(&self, method: &str) -> ApiResult<Vec<ImpactCategoryDef>> {
        let method = parse_field::<MethodFamily>(method)?;
        Ok(self.ctx.methods.categories(method).to_vec())
    }

    /// 行业阶段说明
    pub fn list_stages(&self, industry: &str) -> ApiResult<Vec<StageInfo>> {
        let industry = parse_field::<Industry>(industry)?;
        Ok(stage_catalog(industry))
    }
}

fn parse_field<T>(raw: &str) -> ApiResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ApiError::InvalidInput(e.to_string()))
}
