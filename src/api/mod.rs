// ==========================================
// 生命周期评价引擎 - API 层
// ==========================================
// 职责: 提供业务 API 接口 (项目 / 计算 / 溯源 / 配置)
// ==========================================

pub mod calculation_api;
pub mod config_api;
pub mod error;
pub mod project_api;

// 重导出核心类型
pub use calculation_api::{CalculationApi, CalculationHandle, CalculationTicket};
pub use config_api::ConfigApi;
pub use error::{ApiError, ApiResult};
pub use project_api::{CreateProjectRequest, ProjectApi};
