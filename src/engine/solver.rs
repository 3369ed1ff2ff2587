// ==========================================
// 生命周期评价引擎 - 清单求解器接口
// ==========================================
// 职责: 定义外部清单矩阵求解器的调用边界
// 说明: 求解器自身 (矩阵求逆 / 特征化) 不在本 crate 内实现
// ==========================================

use crate::domain::exchange::{ActivityKey, ProductSystem};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

// ==========================================
// MethodId - 求解器方法标识
// ==========================================
// 形如 ("ReCiPe Midpoint (H)", "climate change", "GWP100")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodId(pub Vec<String>);

impl MethodId {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// 小写拼接全名,用于子串匹配
    pub fn joined_lowercase(&self) -> String {
        self.0.join(" ").to_lowercase()
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// 求解结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverOutcome {
    /// 总分,不可用时为 None
    pub score: Option<f64>,
    /// 各活动特征化值,按 activity_index 下标
    pub characterized_inventory: Vec<f64>,
    /// 活动键 → 下标
    pub activity_index: HashMap<ActivityKey, usize>,
}

impl SolverOutcome {
    /// 活动特征化值,不在索引中视为 0
    pub fn characterized(&self, key: &ActivityKey) -> f64 {
        self.activity_index
            .get(key)
            .and_then(|&idx| self.characterized_inventory.get(idx))
            .copied()
            .unwrap_or(0.0)
    }
}

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("求解器不可用: {0}")]
    Unavailable(String),

    #[error("求解超时: method={0}")]
    Timeout(String),

    #[error("求解失败 (method={method}): {message}")]
    Computation { method: String, message: String },
}

// ==========================================
// InventorySolver Trait
// ==========================================
// 实现者: 外部清单求解器适配层;测试中为桩实现
pub trait InventorySolver: Send + Sync {
    /// 求解器已登记的评价方法 (顺序由求解器决定)
    fn registered_methods(&self) -> Vec<MethodId>;

    /// 解析方法标识
    ///
    /// # 规则
    /// - 方法族标签与类别短语均为方法全名的子串 (不区分大小写)
    /// - 取首个命中
    fn resolve_method(&self, family_label: &str, category_phrase: &str) -> Option<MethodId> {
        let family = family_label.to_lowercase();
        let phrase = category_phrase.to_lowercase();
        self.registered_methods().into_iter().find(|method| {
            let name = method.joined_lowercase();
            name.contains(&family) && name.contains(&phrase)
        })
    }

    /// 针对产品活动求解
    fn compute(&self, system: &ProductSystem, method: &MethodId) -> Result<SolverOutcome, SolverError>;
}

// ==========================================
// OfflineSolver - 离线求解器
// ==========================================
// 不登记任何方法,全部类别走确定性估算
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSolver;

impl InventorySolver for OfflineSolver {
    fn registered_methods(&self) -> Vec<MethodId> {
        Vec::new()
    }

    fn compute(&self, _system: &ProductSystem, method: &MethodId) -> Result<SolverOutcome, SolverError> {
        Err(SolverError::Unavailable(format!("离线模式无法求解 {}", method)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Catalogued(Vec<MethodId>);

    impl InventorySolver for Catalogued {
        fn registered_methods(&self) -> Vec<MethodId> {
            self.0.clone()
        }

        fn compute(&self, _system: &ProductSystem, _method: &MethodId) -> Result<SolverOutcome, SolverError> {
            Ok(SolverOutcome::default())
        }
    }

    #[test]
    fn test_resolve_case_insensitive_first_match() {
        let solver = Catalogued(vec![
            MethodId::new(["ReCiPe Midpoint (E)", "climate change", "GWP500"]),
            MethodId::new(["ReCiPe Midpoint (H) V1.13", "climate change", "GWP100"]),
            MethodId::new(["ReCiPe Midpoint (H) V1.11", "climate change", "GWP100"]),
        ]);

        let found = solver
            .resolve_method("recipe midpoint (h)", "Climate Change")
            .unwrap();
        assert_eq!(found.0[0], "ReCiPe Midpoint (H) V1.13");
        assert!(solver.resolve_method("EF 3.1", "climate change").is_none());
    }

    #[test]
    fn test_offline_never_resolves() {
        assert!(OfflineSolver.resolve_method("EF 3.1", "water use").is_none());
    }

    #[test]
    fn test_characterized_missing_is_zero() {
        let mut outcome = SolverOutcome::default();
        outcome.characterized_inventory = vec![1.5];
        outcome
            .activity_index
            .insert(ActivityKey::new("USLCI", "weaving"), 0);

        assert_eq!(outcome.characterized(&ActivityKey::new("USLCI", "weaving")), 1.5);
        assert_eq!(outcome.characterized(&ActivityKey::new("USLCI", "dyeing_jet")), 0.0);
    }
}
