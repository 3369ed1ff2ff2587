// ==========================================
// 生命周期评价引擎 - 计算结果仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储: 整个 ImpactResult 以 JSON 存入 result_json,
//       method_name / total_impact / calc_version 另列便于查询
// 读取: 最新结果 = calc_version 最大者,同序号按计算时间倒序
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::impact::ImpactResult;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct ImpactResultRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ImpactResultRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入计算结果
    pub fn insert(&self, result: &ImpactResult) -> RepositoryResult<()> {
        let result_json = serde_json::to_string(result)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO lca_result (
                result_id, project_id, method_name, total_impact, unit,
                result_json, calc_version, calculated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                result.id,
                result.project_id,
                result.method_name.as_str(),
                result.total_impact,
                result.unit,
                result_json,
                result.calc_version,
                result.calculated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 项目最新结果
    ///
    /// # 返回
    /// - Ok(None): 项目尚无计算结果
    pub fn find_latest_by_project(&self, project_id: &str) -> RepositoryResult<Option<ImpactResult>> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn
            .query_row(
                r#"SELECT result_json FROM lca_result
                   WHERE project_id = ?1
                   ORDER BY calc_version DESC, calculated_at DESC
                   LIMIT 1"#,
                params![project_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(raw.map(|s| serde_json::from_str(&s)).transpose()?)
    }

    /// 项目全部结果 (新 → 旧)
    pub fn list_by_project(&self, project_id: &str) -> RepositoryResult<Vec<ImpactResult>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT result_json FROM lca_result
               WHERE project_id = ?1
               ORDER BY calc_version DESC, calculated_at DESC"#,
        )?;

        let rows = stmt
            .query_map(params![project_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(rows.len());
        for raw in rows {
            results.push(serde_json::from_str(&raw)?);
        }
        Ok(results)
    }

    /// 删除项目全部结果
    pub fn delete_by_project(&self, project_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM lca_result WHERE project_id = ?1",
            params![project_id],
        )?;
        Ok(rows)
    }
}
