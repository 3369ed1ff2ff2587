// ==========================================
// 生命周期评价引擎 - 引擎参数
// ==========================================
// 职责: 合成器 / 估算器 / 溯源器共用的数值参数
// 约定: 计算期间只读;覆写值来自 config_kv (global)
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 每次洗涤用水 (升)
    pub water_litres_per_wash: f64,
    /// 每次洗涤耗电 (kWh)
    pub kwh_per_wash: f64,
    /// 加工放大系数
    pub process_overhead: f64,
    /// 运输放大系数
    pub transport_overhead: f64,
    /// 纱线无纤维 / 无有效组分时的棉当量排放因子 (kg CO2e/kg)
    pub cotton_fallback_ef: f64,
    /// 未登记材料的排放因子
    pub unknown_material_ef: f64,
    /// 使用阶段缺省洗涤次数 (仅估算器)
    pub default_wash_cycles: f64,
    /// 估算器每次洗涤的排放当量 (kg CO2e)
    pub co2_per_wash: f64,
    /// 电网排放因子 (kg CO2/kWh)
    pub grid_co2_per_kwh: f64,
    /// 结果保留小数位
    pub rounding_decimals: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            water_litres_per_wash: 50.0,
            kwh_per_wash: 0.5,
            process_overhead: 1.5,
            transport_overhead: 1.1,
            cotton_fallback_ef: 5.9,
            unknown_material_ef: 5.0,
            default_wash_cycles: 50.0,
            co2_per_wash: 0.5,
            grid_co2_per_kwh: 0.5,
            rounding_decimals: 6,
        }
    }
}

impl EngineConfig {
    /// 按配置小数位四舍五入
    pub fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.rounding_decimals as i32);
        (value * scale).round() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_six_decimals() {
        let config = EngineConfig::default();
        assert_eq!(config.round(2.433750000001), 2.43375);
        assert_eq!(config.round(0.0), 0.0);
        assert_eq!(config.round(-0.1234567), -0.123457);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"kwh_per_wash": 0.8}"#).unwrap();
        assert_eq!(config.kwh_per_wash, 0.8);
        assert_eq!(config.water_litres_per_wash, 50.0);
    }
}
