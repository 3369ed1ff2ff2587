// ==========================================
// 生命周期评价引擎 - 命令行入口
// ==========================================
// 用法:
//   lca-impact-engine [db_path] [project_id]
//
// - 指定 project_id: 以离线求解器计算该项目,输出结果 JSON
// - 未指定 project_id: 输出项目列表 JSON
// - 未指定 db_path: 使用 LCA_ENGINE_DB_PATH 或用户数据目录
// ==========================================

use anyhow::Context;
use lca_impact_engine::app::{get_default_db_path, AppState};
use lca_impact_engine::{logging, OfflineSolver, APP_NAME, VERSION};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);
    let project_id = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    tracing::info!(version = VERSION, db_path = %db_path, "{}", APP_NAME);

    let state = AppState::new(db_path, Arc::new(OfflineSolver))
        .context("无法初始化应用状态")?;

    let output = match project_id {
        Some(project_id) => {
            let result = state
                .calculation_api
                .run_calculation(&project_id)
                .await
                .with_context(|| format!("项目 {} 计算失败", project_id))?;
            serde_json::to_string_pretty(&result)?
        }
        None => serde_json::to_string_pretty(&state.project_api.list_projects()?)?,
    };

    println!("{}", output);
    Ok(())
}
