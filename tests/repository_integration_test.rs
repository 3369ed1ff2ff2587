// ==========================================
// Repository 集成测试
// ==========================================
// 测试范围:
// 1. ProjectRepository: CRUD / 输入锁定 / 计算序号
// 2. ImpactResultRepository: 最新结果 / 级联删除
// 3. 同一数据库文件上的多个仓储实例
// ==========================================


use std::sync::Arc;

use lca_impact_engine::domain::ImpactResult;
use lca_impact_engine::engine::{EngineContext, ImpactCalculator, OfflineSolver};
use lca_impact_engine::repository::{ImpactResultRepository, ProjectRepository, RepositoryError};
use lca_impact_engine::{Industry, MethodFamily, ProjectStatus, Scope};
use test_helpers::*;

fn stored_result(project_id: &str, calc_version: i64) -> ImpactResult {
    let project = project(Industry::Textile, Scope::CradleToGrave, MethodFamily::ReCiPe, 200.0);
    let calc = ImpactCalculator::new(Arc::new(EngineContext::builtin()), Arc::new(OfflineSolver))
        .calculate(&project, &textile_e2e_document());
    ImpactResult::from_calculation(project_id, calc_version, calc)
}

#[test]
fn test_project_roundtrip_on_file_db() {
    let (_temp_file, db_path) = create_test_db().expect("无法创建测试数据库");
    let repo = ProjectRepository::new(&db_path).expect("无法创建仓储");

    let mut project = project(Industry::Footwear, Scope::Both, MethodFamily::Ef31, 850.0);
    project.input_data = Some(serde_json::json!({"sole_materials": [{"type": "EVA", "percentage": 40}]}));
    repo.insert(&project).expect("插入失败");

    let loaded = repo.find_by_id(&project.id).expect("查询失败").expect("应该找到项目");
    assert_eq!(loaded.industry, Industry::Footwear);
    assert_eq!(loaded.scope, Scope::Both);
    assert_eq!(loaded.method, MethodFamily::Ef31);
    assert_eq!(loaded.product_weight_grams, 850.0);
    assert_eq!(loaded.input_data, project.input_data);
    assert_eq!(loaded.status, ProjectStatus::Draft);

    // 第二个实例读取同一文件
    let other = ProjectRepository::new(&db_path).expect("无法创建仓储");
    assert_eq!(other.list_all().expect("查询失败").len(), 1);
}

#[test]
fn test_calc_version_sequence_and_stale_finish() {
    let (_temp_file, db_path) = create_test_db().expect("无法创建测试数据库");
    let repo = ProjectRepository::new(&db_path).expect("无法创建仓储");

    let project = project(Industry::Textile, Scope::CradleToGate, MethodFamily::ReCiPe, 200.0);
    repo.insert(&project).expect("插入失败");

    let first = repo.begin_calculation(&project.id).expect("开始计算失败");
    let second = repo.begin_calculation(&project.id).expect("开始计算失败");
    assert_eq!((first, second), (1, 2));

    // 旧计算结束: 不得覆盖新计算的状态
    let err = repo
        .finish_calculation(&project.id, first, ProjectStatus::Error)
        .unwrap_err();
    match err {
        RepositoryError::OptimisticLockFailure { expected, actual, .. } => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("期望乐观锁冲突,实际: {:?}", other),
    }
    let status = repo.find_by_id(&project.id).unwrap().unwrap().status;
    assert_eq!(status, ProjectStatus::Calculating);

    repo.finish_calculation(&project.id, second, ProjectStatus::Completed)
        .expect("结束计算失败");
    let loaded = repo.find_by_id(&project.id).unwrap().unwrap();
    assert_eq!(loaded.status, ProjectStatus::Completed);
    assert_eq!(loaded.calc_version, 2);
}

#[test]
fn test_input_locked_while_calculating() {
    let (_temp_file, db_path) = create_test_db().expect("无法创建测试数据库");
    let repo = ProjectRepository::new(&db_path).expect("无法创建仓储");

    let project = project(Industry::Textile, Scope::CradleToGate, MethodFamily::ReCiPe, 200.0);
    repo.insert(&project).expect("插入失败");
    let version = repo.begin_calculation(&project.id).unwrap();

    let err = repo
        .update_input_data(&project.id, &textile_e2e_input())
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidStateTransition { .. }));

    repo.finish_calculation(&project.id, version, ProjectStatus::Error).unwrap();
    repo.update_input_data(&project.id, &textile_e2e_input())
        .expect("计算结束后应允许更新输入");

    let missing = repo.update_input_data("missing", &textile_e2e_input()).unwrap_err();
    assert!(matches!(missing, RepositoryError::NotFound { .. }));
}

#[test]
fn test_latest_result_and_cascade() {
    let (_temp_file, db_path) = create_test_db().expect("无法创建测试数据库");
    let conn = shared_connection(&db_path).expect("无法打开连接");
    let project_repo = ProjectRepository::from_connection(conn.clone());
    let result_repo = ImpactResultRepository::from_connection(conn);

    let project = project(Industry::Textile, Scope::CradleToGrave, MethodFamily::ReCiPe, 200.0);
    project_repo.insert(&project).unwrap();

    // 新序号先写入,旧序号后写入
    result_repo.insert(&stored_result(&project.id, 2)).unwrap();
    result_repo.insert(&stored_result(&project.id, 1)).unwrap();

    let latest = result_repo
        .find_latest_by_project(&project.id)
        .unwrap()
        .expect("应该有结果");
    assert_eq!(latest.calc_version, 2);
    assert_eq!(latest.impact_categories.len(), 18);
    assert_eq!(latest.unit, "kg CO2 eq");
    assert!((latest.total_impact - latest.total_impacts.climate_change).abs() < 1e-9);

    let history = result_repo.list_by_project(&project.id).unwrap();
    assert_eq!(history.iter().map(|r| r.calc_version).collect::<Vec<_>>(), vec![2, 1]);

    assert_eq!(project_repo.delete(&project.id).unwrap(), 1);
    assert!(result_repo.find_latest_by_project(&project.id).unwrap().is_none());
}

#[test]
fn test_result_roundtrip_preserves_contributions() {
    let (_temp_file, db_path) = create_test_db().expect("无法创建测试数据库");
    let conn = shared_connection(&db_path).expect("无法打开连接");
    let project_repo = ProjectRepository::from_connection(conn.clone());
    let result_repo = ImpactResultRepository::from_connection(conn);

    let project = project(Industry::Textile, Scope::CradleToGrave, MethodFamily::ReCiPe, 200.0);
    project_repo.insert(&project).unwrap();

    let result = stored_result(&project.id, 1);
    result_repo.insert(&result).unwrap();

    let loaded = result_repo.find_latest_by_project(&project.id).unwrap().unwrap();
    assert_eq!(loaded.id, result.id);
    assert_eq!(loaded.category_sources, result.category_sources);

    for (category, split) in &result.contribution_by_stage {
        let stored = &loaded.contribution_by_stage[category];
        assert_eq!(stored.keys().collect::<Vec<_>>(), split.keys().collect::<Vec<_>>());
        for (stage, value) in split {
            assert!((stored[stage] - value).abs() < 1e-9, "{} {}", category, stage);
        }
    }
}
