// ==========================================
// 生命周期评价引擎 - 引擎层
// ==========================================
// 职责: 交换合成 / 阶段分类 / 影响计算 / 确定性估算 / 影响溯源
// 红线: 引擎不拼 SQL,不读写持久化状态;同一输入得到同一输出
// ==========================================
// 数据流 (单向):
//   InputDocument → ExchangeSynthesizer → {ImpactCalculator, StageClassifier} → ImpactCalculation
//   ImpactOriginTracer 独立运行,只读输入文档与静态因子表
// ==========================================

pub mod calculator;
pub mod composition;
pub mod context;
pub mod estimator;
pub mod product_model;
pub mod solver;
pub mod stage_classifier;
pub mod synthesizer;
pub mod tracer;

// 重导出核心引擎
pub use calculator::ImpactCalculator;
pub use composition::SharePolicy;
pub use context::EngineContext;
pub use estimator::DeterministicEstimator;
pub use solver::{InventorySolver, MethodId, OfflineSolver, SolverError, SolverOutcome};
pub use stage_classifier::{StageActivityShares, StageClassifier};
pub use synthesizer::ExchangeSynthesizer;
pub use tracer::{ImpactOriginTracer, TraceError};
