// ==========================================
// 生命周期评价引擎 - 引擎上下文
// ==========================================
// 职责: 汇集只读目录、因子表与引擎参数
// 红线: 启动时构建一次,以 Arc 共享;计算期间不可变
// ==========================================

use crate::catalog::{EstimationFactors, ImpactMethodCatalog, ProcessCatalog, TraceFactors};
use crate::config::EngineConfig;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct EngineContext {
    pub processes: ProcessCatalog,
    pub methods: ImpactMethodCatalog,
    pub estimation: EstimationFactors,
    pub trace: TraceFactors,
    pub config: EngineConfig,
}

impl EngineContext {
    /// 内置目录 + 指定参数
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            processes: ProcessCatalog::builtin(),
            methods: ImpactMethodCatalog::builtin(),
            estimation: EstimationFactors::builtin(),
            trace: TraceFactors::builtin(),
            config,
        }
    }

    /// 内置目录 + 默认参数
    pub fn builtin() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn shared(config: EngineConfig) -> Arc<Self> {
        Arc::new(Self::with_config(config))
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::builtin()
    }
}
