// ==========================================
// 生命周期评价引擎 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置存储访问失败: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("配置锁获取失败: {0}")]
    LockError(String),

    #[error("配置序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("配置值非法 (key={key}): {value}")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
