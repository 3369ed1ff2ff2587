// ==========================================
// 生命周期评价引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 产品生命周期影响建模与归因
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 静态目录层 - 过程目录 / 影响方法 / 因子表
pub mod catalog;

// 引擎层 - 合成 / 计算 / 估算 / 溯源
pub mod engine;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 引擎参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Industry, LifeCycleStage, MethodFamily, ProjectStatus, Scope};

// 领域实体
pub use domain::{
    ActivityKey, Exchange, ImpactCalculation, ImpactResult, InputDocument, Project, ProjectDraft,
    TraceResult,
};

// 引擎
pub use engine::{
    DeterministicEstimator, EngineContext, ExchangeSynthesizer, ImpactCalculator,
    ImpactOriginTracer, InventorySolver, OfflineSolver, StageClassifier,
};

// API
pub use api::{CalculationApi, ConfigApi, ProjectApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "LCA 影响建模与归因引擎";
