use std::path::PathBuf;

use sm_batch::input::parse_batch;
use sm_batch::report::{BatchReport, render_text};
use sm_batch::{BatchConfig, BatchError, OutputFormat, run_batch, score_pairs};
use sm_common::ontology::{OntologyConfig, SE_ONTOLOGY_NAMESPACE};
use sm_common::{OntologyError, OntologyGateway, SkillId, SubClassPolicy};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn config(ontology: &str, policy: SubClassPolicy) -> BatchConfig {
    let mut ontology = OntologyConfig::new(fixture(ontology));
    if ontology.path.extension().is_some_and(|ext| ext == "nt") {
        ontology.namespace = Some(SE_ONTOLOGY_NAMESPACE.to_string());
    }

    BatchConfig {
        input: fixture("pairs.json"),
        ontology,
        policy,
        output: OutputFormat::Text,
        fail_fast: false,
    }
}

fn totals(report: &BatchReport) -> Vec<Option<f64>> {
    report.pairs.iter().map(|p| p.total).collect()
}

#[test]
fn ntriples_batch_scores_every_pair() {
    let report = run_batch(&config("se-ontology.nt", SubClassPolicy::Accumulate)).unwrap();

    assert_eq!(report.ontology.classes, 10);
    assert_eq!(report.pairs.len(), 6);
    assert_eq!(
        totals(&report),
        vec![Some(0.5), Some(1.0), Some(0.0), Some(0.5), None, None]
    );

    let super_class = &report.pairs[0];
    assert_eq!(super_class.id.as_deref(), Some("super-class"));
    assert_eq!(super_class.offer_skills, vec![SkillId::new("java")]);
    assert_eq!(super_class.scores, vec![0.5]);
    assert_eq!(
        super_class.per_skill[0].super_classes,
        vec![SkillId::new("programming-language")]
    );

    assert_eq!(report.pairs[1].scores, vec![1.0, 1.0]);
    assert_eq!(report.pairs[3].scores, vec![1.0, 0.0]);
    assert_eq!(report.failed_pairs(), 2);
    assert!(report.pairs[4].error.as_deref().unwrap().contains("empty"));
    assert!(report.pairs[5].error.as_deref().unwrap().contains("index 1"));
    assert_eq!(report.pairs[5].offer_skills, vec![SkillId::new("java")]);
}

#[test]
fn json_ontology_gives_same_scores() {
    let from_nt = run_batch(&config("se-ontology.nt", SubClassPolicy::Accumulate)).unwrap();
    let from_json = run_batch(&config("se-ontology.json", SubClassPolicy::Accumulate)).unwrap();

    assert_eq!(from_json.ontology.classes, 10);
    assert_eq!(totals(&from_nt), totals(&from_json));
}

#[test]
fn symmetric_policy_caps_sub_class_credit() {
    let report = run_batch(&config("se-ontology.nt", SubClassPolicy::Symmetric)).unwrap();

    assert_eq!(report.subclass_policy, SubClassPolicy::Symmetric);
    assert_eq!(report.pairs[3].scores, vec![0.5, 0.0]);
    assert_eq!(report.pairs[3].total, Some(0.25));
}

#[test]
fn fail_fast_stops_at_first_invalid_pair() {
    let mut config = config("se-ontology.nt", SubClassPolicy::Accumulate);
    config.fail_fast = true;

    match run_batch(&config) {
        Err(BatchError::Pair { index, source }) => {
            assert_eq!(index, 4);
            assert!(source.is_invalid_input());
        }
        other => panic!("expected pair failure, got {other:?}"),
    }
}

#[test]
fn missing_ontology_aborts_the_run() {
    let mut config = config("se-ontology.nt", SubClassPolicy::Accumulate);
    config.ontology.path = fixture("does-not-exist.nt");

    let err = run_batch(&config).unwrap_err();
    assert!(matches!(err, BatchError::Ontology(OntologyError::Io { .. })));
}

#[test]
fn unavailable_gateway_is_not_swallowed_per_pair() {
    struct Offline;
    impl OntologyGateway for Offline {
        fn super_classes_of(&self, _: &SkillId) -> Result<Vec<SkillId>, OntologyError> {
            Err(OntologyError::Unavailable("triple store offline".into()))
        }
        fn sub_classes_of(&self, _: &SkillId) -> Result<Vec<SkillId>, OntologyError> {
            Err(OntologyError::Unavailable("triple store offline".into()))
        }
    }

    let input = parse_batch(
        r#"{"offersAndResumes": [
            {"offerSkills": ["java"], "resumeSkills": ["java"]},
            {"offerSkills": ["java"], "resumeSkills": ["python"]}
        ]}"#,
    )
    .unwrap();

    let err = score_pairs(&input, &Offline, SubClassPolicy::Accumulate, false).unwrap_err();
    assert!(matches!(
        err,
        BatchError::Ontology(OntologyError::Unavailable(_))
    ));
}

#[test]
fn text_report_mirrors_pair_order() {
    let report = run_batch(&config("se-ontology.nt", SubClassPolicy::Accumulate)).unwrap();
    let mut out = Vec::new();
    render_text(&report, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let first = text.find("[pair 0 (super-class)]").unwrap();
    let last = text.find("[pair 5 (bad-token)]").unwrap();
    assert!(first < last);
    assert!(text.contains("python NOT Found in Resume"));
    assert!(
        text.contains("Offer Skills: [java]\nResume Skills: [java]\nError: skill token at index 1")
    );
    assert!(text.contains("Calculated Total Score: 0.5000"));
}
