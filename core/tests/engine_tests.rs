// tests/engine_tests.rs
mod common;

use common::*;
use pcforge::build::compatibility::required_wattage;
use pcforge::{evaluate, BuildParts, Category, CompatibilityStatus, PerformanceScores};

fn am5_build() -> BuildParts {
  BuildParts {
    cpu: Some(cpu(1, "AM5", 8, 3.6, 105)),
    motherboard: Some(motherboard(2, "AM5")),
    psu: Some(psu(3, 650)),
    ..Default::default()
  }
}

#[test]
fn matching_sockets_with_enough_power_is_compatible() {
  setup_tracing();
  let summary = evaluate(&am5_build());

  assert_eq!(summary.compatibility.status, CompatibilityStatus::Compatible);
  assert!(summary.compatibility.compatible);
  assert!(summary.compatibility.issues.is_empty());
  // 8 cores * 3.6 GHz * 0.4 = 11.52
  assert_eq!(summary.scores.gaming, 12);
  // 28.8 * 0.6 = 17.28, 28.8 * 0.5 = 14.4
  assert_eq!(summary.scores.productivity, 17);
  assert_eq!(summary.scores.content, 14);
}

#[test]
fn socket_mismatch_reports_verbatim_issue() {
  let mut parts = am5_build();
  parts.motherboard = Some(motherboard(2, "LGA1700"));

  let summary = evaluate(&parts);

  assert_eq!(summary.compatibility.status, CompatibilityStatus::Incompatible);
  assert!(!summary.compatibility.compatible);
  assert_eq!(
    summary.compatibility.issues,
    vec!["CPU socket AM5 is not compatible with motherboard socket LGA1700".to_string()]
  );
}

#[test]
fn socket_rule_needs_both_parts() {
  let cpu_only = BuildParts {
    cpu: Some(cpu(1, "AM5", 8, 3.6, 105)),
    ..Default::default()
  };
  let board_only = BuildParts {
    motherboard: Some(motherboard(2, "LGA1700")),
    ..Default::default()
  };

  assert!(evaluate(&cpu_only).compatibility.issues.is_empty());
  assert!(evaluate(&board_only).compatibility.issues.is_empty());
  assert_eq!(evaluate(&board_only).compatibility.status, CompatibilityStatus::Compatible);
}

#[test]
fn underpowered_psu_names_both_wattages() {
  let parts = BuildParts {
    cpu: Some(cpu(1, "AM5", 8, 3.6, 125)),
    gpu: Some(gpu(2, 16, 320)),
    psu: Some(psu(3, 500)),
    ..Default::default()
  };

  let summary = evaluate(&parts);

  assert_eq!(summary.compatibility.status, CompatibilityStatus::Incompatible);
  assert_eq!(summary.compatibility.issues.len(), 1);
  let issue = &summary.compatibility.issues[0];
  assert!(issue.contains("500"), "issue was {issue}");
  assert!(issue.contains("595"), "issue was {issue}");
}

#[test]
fn wattage_threshold_is_inclusive() {
  let mut parts = BuildParts {
    cpu: Some(cpu(1, "AM5", 8, 3.6, 125)),
    gpu: Some(gpu(2, 16, 320)),
    psu: Some(psu(3, 595)),
    ..Default::default()
  };
  assert_eq!(required_wattage(&parts), 595);
  assert!(evaluate(&parts).compatibility.issues.is_empty());

  parts.psu = Some(psu(3, 594));
  assert_eq!(evaluate(&parts).compatibility.issues.len(), 1);
}

#[test]
fn psu_alone_is_not_checked_for_wattage() {
  let parts = BuildParts {
    psu: Some(psu(3, 100)),
    ram: Some(ram(4, 16, 3200)),
    ..Default::default()
  };
  let summary = evaluate(&parts);
  assert!(summary.compatibility.issues.is_empty());
  assert_eq!(summary.compatibility.status, CompatibilityStatus::Compatible);
}

#[test]
fn both_rules_fire_in_order() {
  let parts = BuildParts {
    cpu: Some(cpu(1, "AM5", 8, 3.6, 170)),
    motherboard: Some(motherboard(2, "AM4")),
    gpu: Some(gpu(3, 24, 450)),
    psu: Some(psu(4, 550)),
    ..Default::default()
  };
  let issues = evaluate(&parts).compatibility.issues;
  assert_eq!(issues.len(), 2);
  assert!(issues[0].starts_with("CPU socket AM5"));
  assert!(issues[1].starts_with("PSU wattage (550W)"));
  assert!(issues[1].contains("770W"));
}

#[test]
fn empty_build_is_pending_with_zero_summary() {
  let summary = evaluate(&BuildParts::new());

  assert_eq!(summary.total_price_cents, 0);
  assert_eq!(summary.scores, PerformanceScores::default());
  assert!(summary.compatibility.issues.is_empty());
  assert_eq!(summary.compatibility.status, CompatibilityStatus::Pending);
  assert!(!summary.compatibility.compatible);
}

#[test]
fn evaluation_is_idempotent() {
  let mut parts = am5_build();
  parts.gpu = Some(gpu(5, 12, 200));
  parts.ram = Some(ram(6, 32, 6000));

  let first = evaluate(&parts);
  let second = evaluate(&parts);
  assert_eq!(first, second);
}

#[test]
fn removing_a_scored_part_never_raises_a_score() {
  let full = BuildParts {
    cpu: Some(cpu(1, "AM5", 8, 3.6, 105)),
    gpu: Some(gpu(2, 8, 200)),
    ram: Some(ram(3, 16, 3200)),
    ..Default::default()
  };
  let before = evaluate(&full).scores;

  for category in [Category::Cpu, Category::Gpu, Category::Ram] {
    let mut reduced = full.clone();
    reduced.take(category);
    let after = evaluate(&reduced).scores;
    assert!(after.gaming <= before.gaming, "{category} raised gaming");
    assert!(after.productivity <= before.productivity, "{category} raised productivity");
    assert!(after.content <= before.content, "{category} raised content");
  }
}

#[test]
fn huge_raw_scores_cap_at_one_hundred() {
  let parts = BuildParts {
    cpu: Some(cpu(1, "AM5", 64, 5.0, 350)),
    gpu: Some(gpu(2, 48, 600)),
    ram: Some(ram(3, 256, 8000)),
    ..Default::default()
  };
  let scores = evaluate(&parts).scores;
  assert_eq!(scores.gaming, 100);
  assert_eq!(scores.productivity, 100);
  assert_eq!(scores.content, 100);
}

#[test]
fn unset_numbers_use_scoring_defaults() {
  // cores 4 * 2.5 GHz = 10; 4 GB * 150 W / 30 = 20; 8 GB * 3200 / 1000 = 25.6
  let parts = BuildParts {
    cpu: Some(cpu(1, "AM5", 0, 0.0, 0)),
    gpu: Some(gpu(2, 0, 0)),
    ram: Some(ram(3, 0, 0)),
    ..Default::default()
  };
  let scores = evaluate(&parts).scores;
  // 10*0.4 + 20*0.6 + 25.6*0.1 = 18.56
  assert_eq!(scores.gaming, 19);
  // 10*0.6 + 20*0.3 + 25.6*0.2 = 17.12
  assert_eq!(scores.productivity, 17);
  // 10*0.5 + 20*0.5 + 25.6*0.2 = 20.12
  assert_eq!(scores.content, 20);
}

#[test]
fn unset_tdp_counts_as_zero_for_wattage() {
  let parts = BuildParts {
    cpu: Some(cpu(1, "AM5", 8, 3.6, 0)),
    psu: Some(psu(3, 150)),
    ..Default::default()
  };
  assert_eq!(required_wattage(&parts), 150);
  assert!(evaluate(&parts).compatibility.issues.is_empty());
}

#[test]
fn peripherals_add_price_but_no_score() {
  let parts = BuildParts {
    case: Some(case(1)),
    keyboard: Some(keyboard(2)),
    ..Default::default()
  };
  let summary = evaluate(&parts);
  assert_eq!(summary.total_price_cents, 7_500 + 4_999);
  assert_eq!(summary.scores, PerformanceScores::default());
  assert_eq!(summary.compatibility.status, CompatibilityStatus::Compatible);
}

#[test]
fn summary_serializes_status_in_lowercase() {
  let json = serde_json::to_value(evaluate(&am5_build())).expect("summary serializes");
  assert_eq!(json["compatibility"]["status"], "compatible");
  assert_eq!(json["compatibility"]["compatible"], true);
  assert_eq!(json["scores"]["gaming"], 12);
}

#[test]
fn huge_prices_saturate_instead_of_overflowing() {
  let mut flagship = gpu(1, 24, 450);
  flagship.header.price_cents = i64::MAX - 10;
  let parts = BuildParts {
    gpu: Some(flagship),
    case: Some(case(2)),
    ..Default::default()
  };

  let summary = evaluate(&parts);
  assert_eq!(summary.total_price_cents, i64::MAX);
}
