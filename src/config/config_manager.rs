// ==========================================
// 生命周期评价引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::catalog::reference::{find_database, DEFAULT_DATABASE};
use crate::config::engine_config::EngineConfig;
use crate::config::engine_config_reader::EngineConfigReader;
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 对传入连接再次应用统一 PRAGMA(幂等)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值(scope_id='global')
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 读取 global scope 的配置值(公开方法,供其他模块复用)
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 读取数值配置,缺失或格式错误时回退默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> ConfigResult<f64> {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => {
                tracing::warn!(config_key = key, raw_value = %raw, "数值配置格式错误,使用默认值");
                Ok(default)
            }
        }
    }

    /// 写入 global 配置 (UPSERT)
    ///
    /// # 校验
    /// - 引擎数值键必须为有限数,否则返回 InvalidValue
    /// - default_database 必须为已登记的清单数据库
    pub fn set_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        validate_value(key, value)?;

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照(JSON 格式)
    ///
    /// # 用途
    /// - 计算日志中记录当次生效的覆写
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 引擎参数 = 默认值 + global 覆写
    pub fn load_engine_config(&self) -> ConfigResult<EngineConfig> {
        let d = EngineConfig::default();

        let decimals = self.get_f64_or_default(
            config_keys::ROUNDING_DECIMALS,
            d.rounding_decimals as f64,
        )?;

        Ok(EngineConfig {
            water_litres_per_wash: self
                .get_f64_or_default(config_keys::WATER_LITRES_PER_WASH, d.water_litres_per_wash)?,
            kwh_per_wash: self.get_f64_or_default(config_keys::KWH_PER_WASH, d.kwh_per_wash)?,
            process_overhead: self
                .get_f64_or_default(config_keys::PROCESS_OVERHEAD, d.process_overhead)?,
            transport_overhead: self
                .get_f64_or_default(config_keys::TRANSPORT_OVERHEAD, d.transport_overhead)?,
            cotton_fallback_ef: self
                .get_f64_or_default(config_keys::COTTON_FALLBACK_EF, d.cotton_fallback_ef)?,
            unknown_material_ef: self
                .get_f64_or_default(config_keys::UNKNOWN_MATERIAL_EF, d.unknown_material_ef)?,
            default_wash_cycles: self
                .get_f64_or_default(config_keys::DEFAULT_WASH_CYCLES, d.default_wash_cycles)?,
            co2_per_wash: self.get_f64_or_default(config_keys::CO2_PER_WASH, d.co2_per_wash)?,
            grid_co2_per_kwh: self
                .get_f64_or_default(config_keys::GRID_CO2_PER_KWH, d.grid_co2_per_kwh)?,
            rounding_decimals: decimals.clamp(0.0, 12.0) as u32,
        })
    }
}

fn validate_value(key: &str, value: &str) -> ConfigResult<()> {
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };

    if config_keys::NUMERIC_KEYS.contains(&key) {
        let parsed = value.trim().parse::<f64>().map_err(|_| invalid())?;
        if !parsed.is_finite() || parsed < 0.0 {
            return Err(invalid());
        }
    } else if key == config_keys::DEFAULT_DATABASE && find_database(value.trim()).is_none() {
        return Err(invalid());
    }
    Ok(())
}

// ==========================================
// EngineConfigReader Trait 实现
// ==========================================
#[async_trait]
impl EngineConfigReader for ConfigManager {
    async fn get_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        self.load_engine_config()
    }

    async fn get_default_database(&self) -> Result<String, ConfigError> {
        Ok(self
            .get_config_value(config_keys::DEFAULT_DATABASE)?
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string()))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 使用阶段
    pub const WATER_LITRES_PER_WASH: &str = "water_litres_per_wash";
    pub const KWH_PER_WASH: &str = "kwh_per_wash";
    pub const DEFAULT_WASH_CYCLES: &str = "default_wash_cycles";
    pub const CO2_PER_WASH: &str = "co2_per_wash";

    // 估算放大系数
    pub const PROCESS_OVERHEAD: &str = "process_overhead";
    pub const TRANSPORT_OVERHEAD: &str = "transport_overhead";

    // 排放因子
    pub const COTTON_FALLBACK_EF: &str = "cotton_fallback_ef";
    pub const UNKNOWN_MATERIAL_EF: &str = "unknown_material_ef";
    pub const GRID_CO2_PER_KWH: &str = "grid_co2_per_kwh";

    pub const ROUNDING_DECIMALS: &str = "rounding_decimals";

    pub const DEFAULT_DATABASE: &str = "default_database";

    pub const NUMERIC_KEYS: [&str; 10] = [
        WATER_LITRES_PER_WASH,
        KWH_PER_WASH,
        DEFAULT_WASH_CYCLES,
        CO2_PER_WASH,
        PROCESS_OVERHEAD,
        TRANSPORT_OVERHEAD,
        COTTON_FALLBACK_EF,
        UNKNOWN_MATERIAL_EF,
        GRID_CO2_PER_KWH,
        ROUNDING_DECIMALS,
    ];
}
