// ==========================================
// 生命周期评价引擎 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{CalculationApi, ConfigApi, ProjectApi};
use crate::config::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::{EngineContext, InventorySolver};
use crate::repository::{ImpactResultRepository, ProjectRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 项目管理API
    pub project_api: Arc<ProjectApi>,

    /// 计算 / 溯源API
    pub calculation_api: Arc<CalculationApi<ConfigManager>>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - solver: 清单求解器
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并建表
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: String, solver: Arc<dyn InventorySolver>) -> anyhow::Result<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)?;
        ensure_schema(&conn)?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let project_repo = Arc::new(ProjectRepository::from_connection(conn.clone()));
        let result_repo = Arc::new(ImpactResultRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn)?);

        // ==========================================
        // 创建API实例
        // ==========================================
        let project_api = Arc::new(ProjectApi::new(
            project_repo.clone(),
            Arc::new(EngineContext::builtin()),
        ));
        let calculation_api = Arc::new(CalculationApi::new(
            config_manager.clone(),
            solver,
            project_repo,
            result_repo,
        ));
        let config_api = Arc::new(ConfigApi::new(config_manager));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            project_api,
            calculation_api,
            config_api,
        })
    }
}

/// 获取默认数据库路径
///
/// # 优先级
/// 1. 环境变量 LCA_ENGINE_DB_PATH
/// 2. 用户数据目录下的 lca-impact-engine/lca_engine.db
/// 3. 当前目录 ./lca_engine.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("LCA_ENGINE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./lca_engine.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("lca-impact-engine");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("lca_engine.db");
        }
    }

    path.to_string_lossy().to_string()
}
