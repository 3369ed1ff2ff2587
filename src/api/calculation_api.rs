// ==========================================
// 生命周期评价引擎 - 计算 API
// ==========================================
// 职责: 触发计算 (后台任务) / 同步计算 / 最新结果查询 / 影响溯源
// 状态流转: draft → calculating → completed | error
// 并发: 每次触发递增 calc_version;旧计算结束时不覆盖新计算的状态,
//       读取按 calc_version 倒序,最新者为准
// ==========================================

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::EngineConfigReader;
use crate::domain::impact::ImpactResult;
use crate::domain::input::InputDocument;
use crate::domain::project::Project;
use crate::domain::trace::TraceResult;
use crate::domain::types::{LifeCycleStage, ProjectStatus};
use crate::engine::{EngineContext, ImpactCalculator, ImpactOriginTracer, InventorySolver};
use crate::repository::{ImpactResultRepository, ProjectRepository, RepositoryError};

/// 已受理的计算
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationTicket {
    pub project_id: String,
    pub calc_version: i64,
    pub status: ProjectStatus,
}

/// 后台计算句柄
pub struct CalculationHandle {
    pub ticket: CalculationTicket,
    handle: JoinHandle<ApiResult<ImpactResult>>,
}

impl CalculationHandle {
    /// 等待后台计算结束
    pub async fn wait(self) -> ApiResult<ImpactResult> {
        self.handle
            .await
            .map_err(|e| ApiError::InternalError(format!("计算任务执行失败: {}", e)))?
    }
}

// ==========================================
// CalculationApi - 计算 API
// ==========================================
pub struct CalculationApi<C>
where
    C: EngineConfigReader,
{
    config: Arc<C>,
    solver: Arc<dyn InventorySolver>,
    project_repo: Arc<ProjectRepository>,
    result_repo: Arc<ImpactResultRepository>,
}

impl<C> CalculationApi<C>
where
    C: EngineConfigReader + 'static,
{
    /// 创建计算 API
    ///
    /// # 参数
    /// - config: 引擎参数读取器
    /// - solver: 外部清单求解器 (离线时为 OfflineSolver)
    pub fn new(
        config: Arc<C>,
        solver: Arc<dyn InventorySolver>,
        project_repo: Arc<ProjectRepository>,
        result_repo: Arc<ImpactResultRepository>,
    ) -> Self {
        Self {
            config,
            solver,
            project_repo,
            result_repo,
        }
    }

    /// 触发计算 (后台任务)
    ///
    /// # 返回
    /// - 受理凭据 (状态已为 calculating) 与可等待的任务句柄
    ///
    /// # 错误
    /// - 项目不存在 / 尚未保存输入文档 / 输入文档结构错误
    #[instrument(skip(self))]
    pub fn trigger_calculation(self: &Arc<Self>, project_id: &str) -> ApiResult<CalculationHandle> {
        let (project, doc) = self.load_project_input(project_id)?;
        let calc_version = self.project_repo.begin_calculation(project_id)?;

        info!(project_id, calc_version, "计算已受理");

        let api = Arc::clone(self);
        let handle = tokio::spawn(async move { api.execute(project, doc, calc_version).await });

        Ok(CalculationHandle {
            ticket: CalculationTicket {
                project_id: project_id.to_string(),
                calc_version,
                status: ProjectStatus::Calculating,
            },
            handle,
        })
    }

    /// 同步计算 (等待结果)
    #[instrument(skip(self))]
    pub async fn run_calculation(&self, project_id: &str) -> ApiResult<ImpactResult> {
        let (project, doc) = self.load_project_input(project_id)?;
        let calc_version = self.project_repo.begin_calculation(project_id)?;
        self.execute(project, doc, calc_version).await
    }

    /// 项目最新结果
    ///
    /// # 返回
    /// - Ok(None): 尚未计算
    pub fn get_latest_result(&self, project_id: &str) -> ApiResult<Option<ImpactResult>> {
        self.require_project(project_id)?;
        Ok(self.result_repo.find_latest_by_project(project_id)?)
    }

    /// 影响溯源
    ///
    /// # 参数
    /// - category: 类别键 (须属于项目方法族)
    /// - stage: 阶段名 (如 "fabric_production")
    ///
    /// # 说明
    /// - 不依赖已有计算结果;未保存输入文档时按空文档处理
    #[instrument(skip(self))]
    pub async fn trace_impact(
        &self,
        project_id: &str,
        category: &str,
        stage: &str,
    ) -> ApiResult<TraceResult> {
        let stage = stage
            .parse::<LifeCycleStage>()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

        let project = self.require_project(project_id)?;
        let doc = match &project.input_data {
            Some(value) => parse_document(&project, value)?,
            None => InputDocument::empty(project.industry),
        };

        let engine_config = self.config.get_engine_config().await?;
        let tracer = ImpactOriginTracer::new(EngineContext::shared(engine_config));
        Ok(tracer.trace(&project, &doc, category, stage)?)
    }

    // ==========================================
    // 内部流程
    // ==========================================

    fn require_project(&self, project_id: &str) -> ApiResult<Project> {
        if project_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("项目ID不能为空".to_string()));
        }

        self.project_repo
            .find_by_id(project_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Project(id={})不存在", project_id)))
    }

    fn load_project_input(&self, project_id: &str) -> ApiResult<(Project, InputDocument)> {
        let project = self.require_project(project_id)?;
        let Some(value) = project.input_data.as_ref() else {
            return Err(ApiError::InvalidInput(format!(
                "项目{}尚未保存输入文档",
                project_id
            )));
        };

        let doc = parse_document(&project, value)?;
        Ok((project, doc))
    }

    /// 执行计算并写回结果与状态
    ///
    /// 任何整体失败都会把状态置为 error (仅当本次仍是最新计算)
    async fn execute(
        &self,
        project: Project,
        doc: InputDocument,
        calc_version: i64,
    ) -> ApiResult<ImpactResult> {
        let project_id = project.id.clone();

        match self.compute_and_store(project, doc, calc_version).await {
            Ok(result) => {
                self.finish(&project_id, calc_version, ProjectStatus::Completed)?;
                info!(
                    project_id = %project_id,
                    calc_version,
                    total_impact = result.total_impact,
                    "计算完成"
                );
                Ok(result)
            }
            Err(e) => {
                error!(project_id = %project_id, calc_version, error = %e, "计算失败");
                self.finish(&project_id, calc_version, ProjectStatus::Error)?;
                Err(e)
            }
        }
    }

    async fn compute_and_store(
        &self,
        project: Project,
        doc: InputDocument,
        calc_version: i64,
    ) -> ApiResult<ImpactResult> {
        let engine_config = self.config.get_engine_config().await?;
        let calculator = ImpactCalculator::new(EngineContext::shared(engine_config), self.solver.clone());

        let project_id = project.id.clone();
        let calculation = tokio::task::spawn_blocking(move || calculator.calculate(&project, &doc))
            .await
            .map_err(|e| ApiError::InternalError(format!("计算任务执行失败: {}", e)))?;

        let result = ImpactResult::from_calculation(&project_id, calc_version, calculation);
        self.result_repo.insert(&result)?;
        Ok(result)
    }

    /// 写回终态;已有更新的计算开始时只记录,不覆盖
    fn finish(&self, project_id: &str, calc_version: i64, status: ProjectStatus) -> ApiResult<()> {
        match self
            .project_repo
            .finish_calculation(project_id, calc_version, status)
        {
            Ok(()) => Ok(()),
            Err(RepositoryError::OptimisticLockFailure { actual, .. }) => {
                warn!(
                    project_id,
                    calc_version,
                    current_version = actual,
                    status = %status,
                    "已有更新的计算,跳过状态写回"
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_document(project: &Project, value: &serde_json::Value) -> ApiResult<InputDocument> {
    InputDocument::from_value(project.industry, value).map_err(|e| {
        ApiError::InvalidInput(format!("{}输入文档结构错误: {}", project.industry, e))
    })
}
