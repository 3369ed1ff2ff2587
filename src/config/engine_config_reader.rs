// ==========================================
// 生命周期评价引擎 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义计算服务所需的配置读取接口(不包含实现)
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::config::error::ConfigError;
use async_trait::async_trait;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager(从 config_kv 表读取)
#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    /// 获取引擎参数
    ///
    /// # 返回
    /// - 默认值叠加 global 作用域覆写
    async fn get_engine_config(&self) -> Result<EngineConfig, ConfigError>;

    /// 获取缺省清单数据库
    ///
    /// # 默认值
    /// - USLCI
    async fn get_default_database(&self) -> Result<String, ConfigError>;
}
