// ==========================================
// 生命周期评价引擎 - 阶段分类器
// ==========================================
// 职责: 将合成器的同一结构遍历划分到生命周期阶段
// 红线: 每条交换恰好归属一个阶段;无活动阶段不出现在结果中
// ==========================================
// 共享活动: 同一活动键出现在多个阶段时 (如损耗回收与废弃回收),
// 其特征化值按各阶段交换量占比分摊,保证各阶段之和等于总分
// ==========================================

use crate::domain::exchange::{ActivityKey, Exchange};
use crate::domain::input::InputDocument;
use crate::domain::project::Project;
use crate::domain::types::LifeCycleStage;
use crate::engine::synthesizer::ExchangeSynthesizer;
use std::collections::{BTreeMap, HashMap};

/// 阶段 → [(活动键, 分摊比例)]
pub type StageActivityShares = BTreeMap<LifeCycleStage, Vec<(ActivityKey, f64)>>;

// ==========================================
// StageClassifier - 阶段分类器
// ==========================================
pub struct StageClassifier<'a> {
    synthesizer: &'a ExchangeSynthesizer,
}

impl<'a> StageClassifier<'a> {
    pub fn new(synthesizer: &'a ExchangeSynthesizer) -> Self {
        Self { synthesizer }
    }

    /// 阶段 → 交换 (遍历顺序)
    pub fn classify(&self, project: &Project, doc: &InputDocument) -> BTreeMap<LifeCycleStage, Vec<Exchange>> {
        let mut stages: BTreeMap<LifeCycleStage, Vec<Exchange>> = BTreeMap::new();
        for staged in self.synthesizer.walk(project, doc) {
            stages.entry(staged.stage).or_default().push(staged.exchange);
        }
        stages
    }

    /// 阶段 → 去重后的活动键 (首次出现顺序)
    pub fn stage_activities(&self, project: &Project, doc: &InputDocument) -> BTreeMap<LifeCycleStage, Vec<ActivityKey>> {
        self.classify(project, doc)
            .into_iter()
            .map(|(stage, exchanges)| {
                let mut keys: Vec<ActivityKey> = Vec::new();
                for exchange in exchanges {
                    if !keys.contains(&exchange.input) {
                        keys.push(exchange.input);
                    }
                }
                (stage, keys)
            })
            .collect()
    }

    /// 阶段 → 活动分摊比例
    ///
    /// # 规则
    /// - 比例 = 该阶段此活动交换量 / 全部阶段此活动交换量
    /// - 全部交换量为 0 时按出现次数分摊
    /// - 同一活动在所有阶段的比例之和为 1
    pub fn activity_shares(&self, project: &Project, doc: &InputDocument) -> StageActivityShares {
        let stages = self.classify(project, doc);

        // 活动键 → (总量, 出现次数)
        let mut totals: HashMap<&ActivityKey, (f64, usize)> = HashMap::new();
        for exchanges in stages.values() {
            for exchange in exchanges {
                let entry = totals.entry(&exchange.input).or_insert((0.0, 0));
                entry.0 += exchange.amount;
                entry.1 += 1;
            }
        }

        let mut shares = StageActivityShares::new();
        for (stage, exchanges) in &stages {
            let mut per_key: Vec<(ActivityKey, f64)> = Vec::new();
            for exchange in exchanges {
                let (total_amount, total_count) = totals[&exchange.input];
                let share = if total_amount > 0.0 {
                    exchange.amount / total_amount
                } else {
                    1.0 / total_count as f64
                };

                match per_key.iter_mut().find(|(key, _)| *key == exchange.input) {
                    Some((_, acc)) => *acc += share,
                    None => per_key.push((exchange.input.clone(), share)),
                }
            }
            shares.insert(*stage, per_key);
        }
        shares
    }
}
