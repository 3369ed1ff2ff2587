// ==========================================
// 生命周期评价引擎 - 配置层
// ==========================================
// 职责: 引擎参数默认值 + global 作用域覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config;
pub mod engine_config_reader;
pub mod error;

pub use config_manager::{config_keys, ConfigManager};
pub use engine_config::EngineConfig;
pub use engine_config_reader::EngineConfigReader;
pub use error::{ConfigError, ConfigResult};
