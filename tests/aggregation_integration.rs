//! End-to-end aggregation tests
//!
//! Drives the full pipeline the same way the CLI does: YAML configuration
//! and JSON record export on disk, one aggregation pass, serialized output
//! files. Covers:
//! - Leaderboard ordering across all four score columns
//! - Baseline normalization of force-field errors
//! - Category gating via the per-model show flags
//! - The as-of record window
//! - Output file round-trips preserving column names and null scores

use chrono::{TimeZone, Utc};
use evaluar::config::BenchmarkConfig;
use evaluar::records::JsonRecordSource;
use std::fs;

const CONFIG_YAML: &str = r#"
force_field_tasks:
  ani1x:
    domain: molecules
    energy_weight: 1.0
    force_weight: 1.0
  mptrj:
    domain: inorganic_materials
    energy_weight: 1.0
property_tasks:
  elastic:
    domain: inorganic_materials
    subtasks: [elastic_fold0, elastic_fold1]
    metrics:
      mae:
        weight: 1.0
        std: 0.1
md_structures: [si_216, water_64]
efficiency_reference: 100.0
instability_tolerance: 0.0005
baseline_model: Dummy
"#;

/// Record export with three models:
/// - alpha: strong everywhere; ln-space task scores -3 (ani1x) and -1
///   (mptrj), one crashed MD structure, 50 µs/atom inference
/// - beta: weaker errors but perfectly stable and slower
/// - Dummy: the baseline, unit errors on every task
const RECORDS_JSON: &str = r#"
{
  "models": [
    {
      "model_name": "alpha",
      "model_family": "MACE",
      "show_direct_task": true,
      "show_finetune_task": true,
      "show_calculator_task": true
    },
    {
      "model_name": "beta",
      "model_family": "ORB",
      "show_direct_task": true,
      "show_finetune_task": false,
      "show_calculator_task": true
    },
    {
      "model_name": "Dummy",
      "model_family": "Dummy",
      "show_direct_task": true,
      "show_finetune_task": false,
      "show_calculator_task": false
    }
  ],
  "force_field": [
    {
      "model_name": "alpha",
      "task_name": "ani1x",
      "energy_rmse": 0.1353352832366127,
      "force_rmse": 0.36787944117144233
    },
    {
      "model_name": "alpha",
      "task_name": "mptrj",
      "energy_rmse": 0.36787944117144233,
      "force_rmse": 0.9
    },
    {
      "model_name": "beta",
      "task_name": "ani1x",
      "energy_rmse": 0.36787944117144233,
      "force_rmse": 0.36787944117144233
    },
    {
      "model_name": "beta",
      "task_name": "mptrj",
      "energy_rmse": 0.6065306597126334
    },
    {
      "model_name": "Dummy",
      "task_name": "ani1x",
      "energy_rmse": 1.0,
      "force_rmse": 1.0
    },
    {
      "model_name": "Dummy",
      "task_name": "mptrj",
      "energy_rmse": 1.0
    }
  ],
  "property": [
    {
      "model_name": "alpha",
      "task_name": "elastic_fold0",
      "metrics": { "mae": 0.02 }
    },
    {
      "model_name": "alpha",
      "task_name": "elastic_fold1",
      "metrics": { "mae": 0.04 }
    }
  ],
  "calculator": [
    {
      "model_name": "alpha",
      "task_name": "nve_md",
      "structures": {
        "water_64": { "drift": 0.005 },
        "si_216": { "failed": true }
      }
    },
    {
      "model_name": "alpha",
      "task_name": "inference_efficiency",
      "systems": {
        "water_64": { "average_time": 50.0, "std_time": 2.0, "success_rate": 100.0 }
      }
    },
    {
      "model_name": "beta",
      "task_name": "nve_md",
      "structures": {
        "water_64": { "drift": 0.0005 },
        "si_216": { "drift": 0.00005 }
      }
    },
    {
      "model_name": "beta",
      "task_name": "inference_efficiency",
      "systems": {
        "water_64": { "average_time": 200.0, "std_time": 10.0, "success_rate": 100.0 }
      }
    }
  ]
}
"#;

fn load_fixture() -> (BenchmarkConfig, JsonRecordSource) {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("benchmark.yml");
    let records_path = dir.path().join("records.json");
    fs::write(&config_path, CONFIG_YAML).unwrap();
    fs::write(&records_path, RECORDS_JSON).unwrap();

    let config = BenchmarkConfig::from_yaml_file(&config_path).unwrap();
    let source = JsonRecordSource::from_json_file(&records_path).unwrap();
    (config, source)
}

#[test]
fn test_full_pipeline_ranking_order() {
    let (config, source) = load_fixture();
    let output = evaluar::run_aggregation(&config, &source, None).unwrap();

    let models: Vec<&str> = output
        .final_rankings
        .iter()
        .map(|r| r.row.model.as_str())
        .collect();
    assert_eq!(models, ["alpha", "beta", "Dummy"]);
    assert_eq!(
        output
            .final_rankings
            .iter()
            .map(|r| r.rank)
            .collect::<Vec<_>>(),
        [1, 2, 3]
    );
}

#[test]
fn test_full_pipeline_score_values() {
    let (config, source) = load_fixture();
    let output = evaluar::run_aggregation(&config, &source, None).unwrap();

    let alpha = &output.final_rankings[0].row;
    // Baseline scores are 1.0 per domain, so FF-Error is the plain mean of
    // exp(-3) (molecules) and exp(-1) (inorganic materials).
    let expected_ff = ((-3.0f64).exp() + (-1.0f64).exp()) / 2.0;
    assert!((alpha.ff_error.unwrap() - expected_ff).abs() < 1e-12);
    // mae means 0.03 over the two folds, std 0.1.
    assert!((alpha.pc_error.unwrap() - 0.3).abs() < 1e-12);
    // water_64 drifts a decade past tolerance (1.0), si_216 crashed (5.0).
    assert!((alpha.instability.unwrap() - 3.0).abs() < 1e-12);
    // 100 µs/atom reference over a 50 µs/atom average.
    assert!((alpha.efficiency.unwrap() - 2.0).abs() < 1e-12);

    let beta = &output.final_rankings[1].row;
    assert!((beta.instability.unwrap() - 0.0).abs() < 1e-12);
    assert!((beta.efficiency.unwrap() - 0.5).abs() < 1e-12);

    // The baseline model caps at its own score ratio of exactly 1.0.
    let dummy = &output.final_rankings[2].row;
    assert!((dummy.ff_error.unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn test_category_gating_leaves_unshown_columns_empty() {
    let (config, source) = load_fixture();
    let output = evaluar::run_aggregation(&config, &source, None).unwrap();

    let beta = &output.final_rankings[1].row;
    assert!(beta.pc_error.is_none(), "finetune track is gated off");

    let dummy = &output.final_rankings[2].row;
    assert!(dummy.pc_error.is_none());
    assert!(dummy.instability.is_none());
    assert!(dummy.efficiency.is_none());
}

#[test]
fn test_barplot_groups_by_domain_name() {
    let (config, source) = load_fixture();
    let output = evaluar::run_aggregation(&config, &source, None).unwrap();

    let molecules = &output.barplot["Molecules"];
    assert_eq!(molecules.len(), 3);
    assert!((molecules["alpha"].unwrap() - (-3.0f64).exp()).abs() < 1e-12);
    assert!((molecules["Dummy"].unwrap() - 1.0).abs() < 1e-12);
    assert!(output.barplot.contains_key("Inorganic Materials"));
}

#[test]
fn test_as_of_window_excludes_later_records() {
    let (config, _) = load_fixture();

    let records = r#"
    {
      "models": [
        {
          "model_name": "alpha",
          "model_family": "MACE",
          "show_direct_task": true
        }
      ],
      "force_field": [
        {
          "model_name": "alpha",
          "task_name": "ani1x",
          "record_time": "2026-01-15T00:00:00Z",
          "energy_rmse": 0.5,
          "force_rmse": 0.5
        },
        {
          "model_name": "alpha",
          "task_name": "mptrj",
          "record_time": "2026-06-15T00:00:00Z",
          "energy_rmse": 0.5
        }
      ]
    }
    "#;
    let source = JsonRecordSource::new(serde_json::from_str(records).unwrap());

    let as_of = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let output = evaluar::run_aggregation(&config, &source, Some(as_of)).unwrap();

    let direct = output.results["alpha"].direct.as_ref().unwrap();
    assert_eq!(direct.per_task.len(), 1);
    assert!(direct.per_task.contains_key("ani1x"));
    // Partial task coverage keeps the overall weighted score empty.
    assert!(direct.weighted.is_none());

    // Without the window both records count.
    let full = evaluar::run_aggregation(&config, &source, None).unwrap();
    let direct = full.results["alpha"].direct.as_ref().unwrap();
    assert_eq!(direct.per_task.len(), 2);
    assert!(direct.weighted.is_some());
}

#[test]
fn test_unknown_task_name_is_fatal() {
    let (config, _) = load_fixture();

    let records = r#"
    {
      "models": [
        {
          "model_name": "alpha",
          "model_family": "MACE",
          "show_direct_task": true
        }
      ],
      "force_field": [
        {
          "model_name": "alpha",
          "task_name": "no_such_task",
          "energy_rmse": 0.5
        }
      ]
    }
    "#;
    let source = JsonRecordSource::new(serde_json::from_str(records).unwrap());

    let err = evaluar::run_aggregation(&config, &source, None).unwrap_err();
    assert!(matches!(err, evaluar::Error::UnknownTask { .. }));
}

#[test]
fn test_output_files_round_trip() {
    let (config, source) = load_fixture();
    let output = evaluar::run_aggregation(&config, &source, None).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("results");
    output.write_to_dir(&out_dir).unwrap();

    for file in ["final_rankings.json", "barplot.json", "results.json"] {
        assert!(out_dir.join(file).exists(), "{file} missing");
    }

    let rankings: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("final_rankings.json")).unwrap())
            .unwrap();
    let rows = rankings.as_array().unwrap();
    assert_eq!(rows.len(), 3);

    let first = rows[0].as_object().unwrap();
    for column in [
        "Rank",
        "Model",
        "Generalizability-FF-Error",
        "Generalizability-PC-Error",
        "Applicability-Instability",
        "Applicability-Efficiency",
    ] {
        assert!(first.contains_key(column), "{column} missing");
    }
    assert_eq!(first["Rank"], 1);
    assert_eq!(first["Model"], "alpha");

    // Unmeasured scores serialize as explicit nulls, not absent keys.
    let dummy = rows[2].as_object().unwrap();
    assert_eq!(dummy["Applicability-Instability"], serde_json::Value::Null);
}

#[test]
fn test_aggregation_is_deterministic() {
    let (config, source) = load_fixture();
    let a = evaluar::run_aggregation(&config, &source, None).unwrap();
    let b = evaluar::run_aggregation(&config, &source, None).unwrap();

    let a_json = serde_json::to_string(&a.final_rankings).unwrap();
    let b_json = serde_json::to_string(&b.final_rankings).unwrap();
    assert_eq!(a_json, b_json);

    let a_bar = serde_json::to_string(&a.barplot).unwrap();
    let b_bar = serde_json::to_string(&b.barplot).unwrap();
    assert_eq!(a_bar, b_bar);
}
