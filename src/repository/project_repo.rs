// ==========================================
// 生命周期评价引擎 - 项目数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 并发: calc_version 计算序号,旧计算无法覆盖新计算的状态
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::project::Project;
use crate::domain::types::ProjectStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

const PROJECT_COLUMNS: &str = r#"
    project_id, name, description, industry, scope, database_name, method,
    product_weight_grams, product_scenario, input_data, status, calc_version,
    created_at, updated_at
"#;

// ==========================================
// ProjectRepository - 项目仓储
// ==========================================
/// 项目仓储
/// 职责: 管理 lca_project 表的 CRUD 与状态流转
pub struct ProjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProjectRepository {
    /// 创建新的 ProjectRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新建项目
    pub fn insert(&self, project: &Project) -> RepositoryResult<()> {
        let input_json = project
            .input_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO lca_project (
                project_id, name, description, industry, scope, database_name, method,
                product_weight_grams, product_scenario, input_data, status, calc_version,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                project.id,
                project.name,
                project.description,
                project.industry.as_str(),
                project.scope.as_str(),
                project.database,
                project.method.as_str(),
                project.product_weight_grams,
                project.product_scenario,
                input_json,
                project.status.as_str(),
                project.calc_version,
                project.created_at.to_rfc3339(),
                project.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(Project)): 找到项目
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, project_id: &str) -> RepositoryResult<Option<Project>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM lca_project WHERE project_id = ?1", PROJECT_COLUMNS);

        let project = conn
            .query_row(&sql, params![project_id], map_row)
            .optional()?;
        Ok(project)
    }

    /// 全部项目 (创建时间倒序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Project>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM lca_project ORDER BY created_at DESC, project_id",
            PROJECT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let projects = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    /// 更新输入文档
    ///
    /// # 错误
    /// - `RepositoryError::InvalidStateTransition`: 项目正在计算
    /// - `RepositoryError::NotFound`: project_id 不存在
    pub fn update_input_data(
        &self,
        project_id: &str,
        input_data: &serde_json::Value,
    ) -> RepositoryResult<()> {
        let input_json = serde_json::to_string(input_data)?;

        let conn = self.get_conn()?;
        let rows_affected = conn.execute(
            r#"UPDATE lca_project
               SET input_data = ?1, updated_at = ?2
               WHERE project_id = ?3 AND status != 'calculating'"#,
            params![input_json, Utc::now().to_rfc3339(), project_id],
        )?;

        if rows_affected == 0 {
            let status = current_status(&conn, project_id)?;
            return Err(RepositoryError::InvalidStateTransition {
                from: status.as_str().to_string(),
                to: "input_updated".to_string(),
            });
        }
        Ok(())
    }

    /// 删除项目 (结果级联删除)
    ///
    /// # 返回
    /// - 删除的行数 (0 或 1)
    pub fn delete(&self, project_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM lca_project WHERE project_id = ?1",
            params![project_id],
        )?;
        Ok(rows)
    }

    /// 开始计算: status → calculating, calc_version + 1
    ///
    /// # 返回
    /// - 本次计算的序号
    pub fn begin_calculation(&self, project_id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let version = conn
            .query_row(
                r#"UPDATE lca_project
                   SET status = 'calculating', calc_version = calc_version + 1, updated_at = ?1
                   WHERE project_id = ?2
                   RETURNING calc_version"#,
                params![Utc::now().to_rfc3339(), project_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        version.ok_or_else(|| RepositoryError::NotFound {
            entity: "Project".to_string(),
            id: project_id.to_string(),
        })
    }

    /// 结束计算: status → completed | error (带计算序号检查)
    ///
    /// # 错误
    /// - `RepositoryError::InvalidStateTransition`: 目标状态不是 completed / error
    /// - `RepositoryError::OptimisticLockFailure`: 已有更新的计算开始
    /// - `RepositoryError::NotFound`: project_id 不存在
    pub fn finish_calculation(
        &self,
        project_id: &str,
        calc_version: i64,
        status: ProjectStatus,
    ) -> RepositoryResult<()> {
        if !matches!(status, ProjectStatus::Completed | ProjectStatus::Error) {
            return Err(RepositoryError::InvalidStateTransition {
                from: ProjectStatus::Calculating.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }

        let conn = self.get_conn()?;
        let rows_affected = conn.execute(
            r#"UPDATE lca_project
               SET status = ?1, updated_at = ?2
               WHERE project_id = ?3 AND calc_version = ?4"#,
            params![status.as_str(), Utc::now().to_rfc3339(), project_id, calc_version],
        )?;

        if rows_affected == 0 {
            let actual: Option<i64> = conn
                .query_row(
                    "SELECT calc_version FROM lca_project WHERE project_id = ?1",
                    params![project_id],
                    |row| row.get(0),
                )
                .optional()?;

            return Err(match actual {
                Some(actual) => RepositoryError::OptimisticLockFailure {
                    project_id: project_id.to_string(),
                    expected: calc_version,
                    actual,
                },
                None => RepositoryError::NotFound {
                    entity: "Project".to_string(),
                    id: project_id.to_string(),
                },
            });
        }
        Ok(())
    }
}

fn current_status(conn: &Connection, project_id: &str) -> RepositoryResult<ProjectStatus> {
    let status: Option<String> = conn
        .query_row(
            "SELECT status FROM lca_project WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )
        .optional()?;

    status
        .map(|s| ProjectStatus::from_db_str(&s))
        .ok_or_else(|| RepositoryError::NotFound {
            entity: "Project".to_string(),
            id: project_id.to_string(),
        })
}

fn parse_column<T>(idx: usize, raw: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_row(row: &Row) -> rusqlite::Result<Project> {
    let industry: String = row.get(3)?;
    let scope: String = row.get(4)?;
    let method: String = row.get(6)?;
    let input_str: Option<String> = row.get(9)?;
    let status: String = row.get(10)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;

    let input_data = input_str
        .map(|s| serde_json::from_str::<serde_json::Value>(&s))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;

    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        industry: parse_column(3, &industry)?,
        scope: parse_column(4, &scope)?,
        database: row.get(5)?,
        method: parse_column(6, &method)?,
        product_weight_grams: row.get(7)?,
        product_scenario: row.get(8)?,
        input_data,
        status: ProjectStatus::from_db_str(&status),
        calc_version: row.get(11)?,
        created_at: parse_timestamp(12, &created_at)?,
        updated_at: parse_timestamp(13, &updated_at)?,
    })
}
