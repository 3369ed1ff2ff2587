// ==========================================
// 生命周期评价引擎 - 产品结构遍历
// ==========================================
// 职责: 按行业遍历输入文档,产出带阶段标签的交换
// 红线: 合成器与阶段分类器共用此遍历,二者不得各自实现条件分支
// ==========================================

mod battery;
mod construction;
mod footwear;
mod textile;

use crate::catalog::{normalize, ProcessCatalog};
use crate::config::EngineConfig;
use crate::domain::exchange::{ActivityKey, Exchange, StagedExchange};
use crate::domain::input::{
    BatteryInput, ConstructionInput, FootwearInput, InputDocument, SimpleTransport, TextileInput,
};
use crate::domain::types::{LifeCycleStage, Scope};
use crate::engine::composition::portion;

/// 固定废弃处理代码
pub const RECYCLING_CODE: &str = "recycling";
pub const INCINERATION_CODE: &str = "incineration";
pub const LANDFILL_CODE: &str = "landfill";

/// 默认运输方式代码
pub const DEFAULT_TRANSPORT_CODE: &str = "truck";

// ==========================================
// ProductModel - 按行业标记的产品模型
// ==========================================
#[derive(Debug, Clone, Copy)]
pub enum ProductModel<'a> {
    Textile(&'a TextileInput),
    Footwear(&'a FootwearInput),
    Construction(&'a ConstructionInput),
    Battery(&'a BatteryInput),
}

impl<'a> ProductModel<'a> {
    pub fn from_document(doc: &'a InputDocument) -> Self {
        match doc {
            InputDocument::Textile(t) => ProductModel::Textile(t),
            InputDocument::Footwear(f) => ProductModel::Footwear(f),
            InputDocument::Construction(c) => ProductModel::Construction(c),
            InputDocument::Battery(b) => ProductModel::Battery(b),
        }
    }

    /// 遍历产品结构
    ///
    /// # 返回
    /// - 按遍历顺序排列的带阶段交换
    pub fn walk(&self, walker: StageWalker<'_>) -> Vec<StagedExchange> {
        let mut walker = walker;
        match self {
            ProductModel::Textile(input) => textile::walk(input, &mut walker),
            ProductModel::Footwear(input) => footwear::walk(input, &mut walker),
            ProductModel::Construction(input) => construction::walk(input, &mut walker),
            ProductModel::Battery(input) => battery::walk(input, &mut walker),
        }
        walker.finish()
    }
}

// ==========================================
// StageWalker - 遍历收集器
// ==========================================
pub struct StageWalker<'a> {
    database: &'a str,
    weight_kg: f64,
    scope: Scope,
    catalog: &'a ProcessCatalog,
    config: &'a EngineConfig,
    staged: Vec<StagedExchange>,
}

impl<'a> StageWalker<'a> {
    pub fn new(
        database: &'a str,
        weight_kg: f64,
        scope: Scope,
        catalog: &'a ProcessCatalog,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            database,
            weight_kg,
            scope,
            catalog,
            config,
            staged: Vec::new(),
        }
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn includes_grave(&self) -> bool {
        self.scope.includes_grave()
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    /// 经策展目录解析代码 (纺织),空结果取默认值
    pub fn curated_code(&self, label: Option<&str>, default_label: &str, default_code: &str) -> String {
        let code = self.catalog.resolve_code(label.unwrap_or(default_label));
        if code.is_empty() {
            default_code.to_string()
        } else {
            code
        }
    }

    /// 即时规范化代码 (非纺织行业),空结果取默认值
    pub fn adhoc_code(&self, label: Option<&str>, default_code: &str) -> String {
        let code = label.map(normalize).unwrap_or_default();
        if code.is_empty() {
            default_code.to_string()
        } else {
            code
        }
    }

    /// 追加技术圈交换 (零量照常追加)
    pub fn push(&mut self, stage: LifeCycleStage, code: String, amount: f64, unit: &str) {
        let input = ActivityKey::new(self.database, code);
        self.staged.push(StagedExchange {
            stage,
            exchange: Exchange::technosphere(input, amount, unit),
        });
    }

    /// 追加技术圈交换,数量 <= 0 时跳过
    pub fn push_nonzero(&mut self, stage: LifeCycleStage, code: &str, amount: f64, unit: &str) {
        if amount > 0.0 {
            self.push(stage, code.to_string(), amount, unit);
        }
    }

    /// 回收 / 焚烧 / 填埋三分 (零量跳过)
    pub fn push_disposal_split(
        &mut self,
        stage: LifeCycleStage,
        mass_kg: f64,
        recycled_pct: f64,
        incinerated_pct: f64,
        landfilled_pct: f64,
    ) {
        self.push_nonzero(stage, RECYCLING_CODE, portion(mass_kg, recycled_pct), "kg");
        self.push_nonzero(stage, INCINERATION_CODE, portion(mass_kg, incinerated_pct), "kg");
        self.push_nonzero(stage, LANDFILL_CODE, portion(mass_kg, landfilled_pct), "kg");
    }

    /// 单段运输 (鞋类 / 建材 / 电池),距离为 0 时跳过
    pub fn push_simple_transport(&mut self, transport: Option<&SimpleTransport>) {
        let Some(transport) = transport else {
            return;
        };
        let code = self.adhoc_code(transport.mode.as_deref(), DEFAULT_TRANSPORT_CODE);
        let tkm = self.weight_kg * transport.distance / 1000.0;
        self.push_nonzero(LifeCycleStage::Transport, &code, tkm, "tkm");
    }

    fn finish(self) -> Vec<StagedExchange> {
        self.staged
    }
}
