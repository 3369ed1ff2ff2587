// ==========================================
// 生命周期评价引擎 - 配置管理 API
// ==========================================
// 职责: 引擎参数查询、覆写、快照
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, EngineConfig, EngineConfigReader};

/// 配置管理API
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 当前生效的引擎参数 (默认值 + global 覆写)
    pub async fn get_engine_config(&self) -> ApiResult<EngineConfig> {
        Ok(self.config_manager.get_engine_config().await?)
    }

    /// 覆写单个配置
    ///
    /// # 参数
    /// - key: 配置键 (见 config_keys)
    /// - value: 字符串形式的取值
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<()> {
        if key.trim().is_empty() {
            return Err(ApiError::InvalidInput("配置键不能为空".to_string()));
        }

        self.config_manager.set_value(key.trim(), value)?;
        info!(config_key = key, value, "配置覆写已保存");
        Ok(())
    }

    /// 全部 global 覆写 (JSON)
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        Ok(self.config_manager.get_config_snapshot()?)
    }
}
