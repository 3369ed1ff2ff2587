// ==========================================
// 生命周期评价引擎 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,把仓储 / 配置 / 溯源错误转换为用户可读的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::engine::TraceError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // 并发控制错误
    // ==========================================
    #[error("计算已被更新的请求取代: {0}")]
    OptimisticLockFailure(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // 并发控制错误
            RepositoryError::OptimisticLockFailure {
                project_id,
                expected,
                actual,
            } => ApiError::OptimisticLockFailure(format!(
                "项目{}已开始新的计算(本次序号={},当前序号={})",
                project_id, expected, actual
            )),

            // 数据库错误
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }

            // 业务规则错误
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }

            // 存储格式错误
            RepositoryError::Serialization(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue { key, value } => {
                ApiError::InvalidInput(format!("配置{}取值无效: {}", key, value))
            }
            other => ApiError::ConfigError(other.to_string()),
        }
    }
}

impl From<TraceError> for ApiError {
    fn from(err: TraceError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        // NotFound错误转换
        let repo_err = RepositoryError::NotFound {
            entity: "Project".to_string(),
            id: "P001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Project"));
                assert!(msg.contains("P001"));
            }
            _ => panic!("Expected NotFound"),
        }

        // OptimisticLockFailure转换
        let repo_err = RepositoryError::OptimisticLockFailure {
            project_id: "P001".to_string(),
            expected: 1,
            actual: 2,
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::OptimisticLockFailure(msg) => {
                assert!(msg.contains("P001"));
                assert!(msg.contains("当前序号=2"));
            }
            _ => panic!("Expected OptimisticLockFailure"),
        }
    }

    #[test]
    fn test_config_and_trace_conversion() {
        let api_err: ApiError = ConfigError::InvalidValue {
            key: "process_overhead".to_string(),
            value: "abc".to_string(),
        }
        .into();
        assert!(matches!(api_err, ApiError::InvalidInput(_)));

        let api_err: ApiError = TraceError::UnknownCategory {
            method: "ReCiPe".to_string(),
            category: "noise".to_string(),
        }
        .into();
        assert!(matches!(api_err, ApiError::InvalidInput(msg) if msg.contains("noise")));
    }
}
