//! Trajectory store and batch persistence tests.

use saas_growth_core::{
    batch::{plan_runs, run_batch},
    config::BatchConfig,
    store::{TrajectoryStore, MANIFEST_FILE},
    GrowthModel,
};
use std::{fs, path::PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("saas-growth-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn batch(dir: &PathBuf, models: Vec<GrowthModel>, replicates: usize) -> BatchConfig {
    BatchConfig {
        models,
        replicates,
        quarters: 12,
        seed: 11,
        output_dir: dir.clone(),
        ..BatchConfig::default()
    }
}

#[test]
fn batch_writes_one_file_per_replicate() {
    let dir = scratch_dir("batch");
    let config = batch(&dir, vec![GrowthModel::StagnationGrowth, GrowthModel::Failure], 3);
    let store = TrajectoryStore::open(&dir).unwrap();

    let report = run_batch(&config, &store).unwrap();
    assert!(report.failed.is_empty());
    assert_eq!(report.written.len(), 6);
    assert!(dir.join("saas_growth_stagnation-growth_1.json").exists());
    assert!(dir.join("saas_growth_failure_3.json").exists());

    let loaded = TrajectoryStore::load(&dir.join("saas_growth_failure_2.json")).unwrap();
    assert_eq!(loaded.len(), 12);
    assert_eq!(loaded[0].quarter, "Q1-2022");
    assert_eq!(loaded[11].quarter, "Q4-2024");
    assert!(loaded.iter().all(|s| s.headcount() == loaded[0].headcount()), "failure stays flat");

    let raw = fs::read_to_string(dir.join("saas_growth_failure_1.json")).unwrap();
    assert!(raw.contains("\n    {\n        \"Quarter\""), "expected four-space indentation");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_plan_is_model_major_and_one_based() {
    let config = batch(&PathBuf::from("."), vec![GrowthModel::Linear, GrowthModel::Cyclic], 2);
    let plan: Vec<(GrowthModel, usize)> =
        plan_runs(&config).into_iter().map(|r| (r.model, r.replicate)).collect();
    assert_eq!(
        plan,
        vec![
            (GrowthModel::Linear, 1),
            (GrowthModel::Linear, 2),
            (GrowthModel::Cyclic, 1),
            (GrowthModel::Cyclic, 2),
        ]
    );
}

#[test]
fn invalid_config_produces_no_files() {
    let dir = scratch_dir("invalid");
    let store = TrajectoryStore::open(&dir).unwrap();
    let config = BatchConfig { quarters: 0, ..batch(&dir, vec![GrowthModel::Linear], 2) };
    assert!(run_batch(&config, &store).is_err());
    assert!(store.list_json_files().unwrap().is_empty());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn revenue_pass_skips_bad_files_and_updates_the_rest() {
    let dir = scratch_dir("revenue");
    let store = TrajectoryStore::open(&dir).unwrap();
    run_batch(&batch(&dir, vec![GrowthModel::Quadratic], 2), &store).unwrap();
    fs::write(dir.join("broken.json"), "{ not a trajectory").unwrap();
    store.save_manifest(&serde_json::json!({ "note": "not a trajectory" })).unwrap();

    let report = store.annotate_revenue().unwrap();
    assert_eq!(report.updated.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("broken.json"));
    assert!(dir.join(MANIFEST_FILE).exists());

    let annotated = TrajectoryStore::load(&dir.join("saas_growth_quadratic_1.json")).unwrap();
    assert!(annotated.iter().all(|s| s.revenue.is_some()));
    assert!(annotated.iter().all(|s| s.revenue.unwrap().revenue > 0));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_directory_is_reported() {
    let dir = scratch_dir("missing");
    assert!(TrajectoryStore::existing(&dir).is_err());
}

#[test]
fn revenue_pass_keeps_keys_outside_the_schema() {
    let dir = scratch_dir("extra-keys");
    let store = TrajectoryStore::open(&dir).unwrap();
    let path = dir.join("saas_growth_piecewise_funding_1.json");
    let raw = r#"[
        {
            "Quarter": "Q1-2022",
            "Countries": {"USA": 4},
            "Occupations": {"Sales": 4},
            "Capital": 1.5,
            "JustFunded": true,
            "PostFunding": 3
        }
    ]"#;
    fs::write(&path, raw).unwrap();

    let report = store.annotate_revenue().unwrap();
    assert_eq!(report.updated.len(), 1);

    let rewritten: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let quarter = rewritten[0].as_object().unwrap();
    assert_eq!(quarter["JustFunded"], true);
    assert_eq!(quarter["PostFunding"], 3);
    assert_eq!(quarter["Quarter"], "Q1-2022");
    assert!(quarter["Revenue"].as_i64().unwrap() > 0);
    assert!(quarter.contains_key("CapitalToRevenueRatio"));

    // A second pass only refreshes the derived fields.
    store.annotate_revenue().unwrap();
    let again: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(again, rewritten);

    let _ = fs::remove_dir_all(&dir);
}
