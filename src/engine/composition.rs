// ==========================================
// 生命周期评价引擎 - 组分占比策略
// ==========================================
// 职责: 百分比 → 质量分数的唯一换算入口
// 红线: 合成器与估算器必须经由本模块换算,禁止各自解析百分比
// ==========================================

/// 组分占比策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePolicy {
    /// 按原值换算,不归一化,缺失即 0
    AsProvided,
    /// 同级仅一项且占比 <= 0 时视为 100%
    SingletonDefault,
}

impl SharePolicy {
    /// 计算质量分数
    ///
    /// # 参数
    /// - percentage: 输入百分比 (缺失已按 0 解析)
    /// - siblings: 同级组分数量
    pub fn fraction(self, percentage: f64, siblings: usize) -> f64 {
        match self {
            SharePolicy::AsProvided => percentage / 100.0,
            SharePolicy::SingletonDefault => {
                if percentage <= 0.0 && siblings == 1 {
                    1.0
                } else {
                    percentage / 100.0
                }
            }
        }
    }
}

/// 按百分比取整体的一部分 (不做单项补全)
pub fn portion(total: f64, percentage: f64) -> f64 {
    total * SharePolicy::AsProvided.fraction(percentage, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_provided_keeps_zero() {
        assert_eq!(SharePolicy::AsProvided.fraction(0.0, 1), 0.0);
        assert_eq!(SharePolicy::AsProvided.fraction(60.0, 2), 0.6);
    }

    #[test]
    fn test_singleton_default() {
        assert_eq!(SharePolicy::SingletonDefault.fraction(0.0, 1), 1.0);
        // 多项时不补全
        assert_eq!(SharePolicy::SingletonDefault.fraction(0.0, 2), 0.0);
        assert_eq!(SharePolicy::SingletonDefault.fraction(40.0, 1), 0.4);
    }

    #[test]
    fn test_portion() {
        assert!((portion(0.2, 10.0) - 0.02).abs() < 1e-12);
    }
}
