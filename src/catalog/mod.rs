// ==========================================
// 生命周期评价引擎 - 静态目录层
// ==========================================
// 职责: 过程目录 / 影响方法 / 因子表 / 参考目录
// 红线: 只读,启动时构建一次后注入引擎上下文
// ==========================================

pub mod factor_tables;
pub mod impact_methods;
pub mod process_catalog;
pub mod reference;

pub use factor_tables::{CharacterizationFactor, EstimationFactors, TraceFactors};
pub use impact_methods::ImpactMethodCatalog;
pub use process_catalog::{normalize, ProcessCatalog};
pub use reference::{InventoryDatabase, MethodSummary, StageInfo, DEFAULT_DATABASE};
