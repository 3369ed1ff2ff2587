// ==========================================
// 生命周期评价引擎 - 领域模型层
// ==========================================
// 职责: 定义项目、输入文档、交换、影响结果、溯源结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod exchange;
pub mod impact;
pub mod input;
pub mod project;
pub mod trace;
pub mod types;

// 重导出核心类型
pub use exchange::{ActivityKey, Exchange, ProcessEntry, ProductSystem, StagedExchange};
pub use impact::{
    CategoryImpact, ImpactCalculation, ImpactCategoryDef, ImpactResult, StageContributions,
    TotalImpacts,
};
pub use input::{
    BatteryInput, ConstructionInput, FootwearInput, InputDocument, TextileInput,
};
pub use project::{Project, ProjectDraft};
pub use trace::{ActivityTrace, TraceExchange, TraceResult, TraceSummary};
pub use types::{
    DomainParseError, ExchangeKind, ImpactSource, Industry, LifeCycleStage, MethodFamily,
    ProjectStatus, Scope,
};
