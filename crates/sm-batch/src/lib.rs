pub mod error;
pub mod input;
pub mod report;

use std::io;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use serde_json::Value;
use sm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use sm_common::ontology::{OntologyConfig, OntologyFormat, load_ontology};
use sm_common::{
    MatchError, OntologyGateway, SkillId, SkillScoreResolver, SubClassPolicy, match_pair,
    normalize_json_skills, run_id,
};
use tracing::{info, info_span, warn};

pub use error::BatchError;
use input::{BatchInput, PairInput, read_batch};
use report::{BatchReport, OntologySummary, PairReport, render_json, render_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "sm-batch",
    about = "Score offer/resume skill pairs against a skill ontology"
)]
pub struct Cli {
    /// Batch input JSON ({"offersAndResumes": [...]})
    #[arg(long, env = "SM_INPUT")]
    pub input: PathBuf,

    /// Ontology file (.json or .nt)
    #[arg(long, env = "SM_ONTOLOGY_PATH")]
    pub ontology: PathBuf,

    /// Ontology format: json | ntriples (default: inferred from the extension)
    #[arg(long, env = "SM_ONTOLOGY_FORMAT")]
    pub ontology_format: Option<OntologyFormat>,

    /// Only index classes whose IRI starts with this namespace (n-triples only)
    #[arg(long, env = "SM_ONTOLOGY_NAMESPACE")]
    pub namespace: Option<String>,

    /// How matching sub-classes are credited: accumulate | symmetric
    #[arg(long, env = "SM_SUBCLASS_POLICY", default_value = "accumulate")]
    pub subclass_policy: SubClassPolicy,

    /// Report format written to stdout
    #[arg(long, env = "SM_OUTPUT_FORMAT", default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Abort on the first invalid pair instead of recording the error in the report
    #[arg(long, env = "SM_FAIL_FAST", default_value_t = false)]
    pub fail_fast: bool,
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input: PathBuf,
    pub ontology: OntologyConfig,
    pub policy: SubClassPolicy,
    pub output: OutputFormat,
    pub fail_fast: bool,
}

impl From<Cli> for BatchConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            ontology: OntologyConfig {
                path: cli.ontology,
                format: cli.ontology_format,
                namespace: cli.namespace,
            },
            policy: cli.subclass_policy,
            output: cli.format,
            fail_fast: cli.fail_fast,
        }
    }
}

/// 失敗した組の表示用。文字列の要素だけ正規化して残す
fn submitted_skills(value: &Value) -> Vec<SkillId> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(SkillId::new)
        .collect()
}

fn score_pair(
    pair: &PairInput,
    resolver: &SkillScoreResolver<'_>,
) -> Result<PairReport, MatchError> {
    let offer_skills = normalize_json_skills(&pair.offer_skills)?;
    let resume_skills = normalize_json_skills(&pair.resume_skills)?;
    let result = match_pair(&offer_skills, &resume_skills, resolver)?;

    Ok(PairReport {
        scores: result.scores(),
        total: Some(result.total),
        per_skill: result.per_skill,
        offer_skills,
        resume_skills,
        ..PairReport::default()
    })
}

/// 全ペアを採点する。
///
/// 入力不備のペアはエラーを記録して続行する（`fail_fast` 時は中断）。
/// オントロジー障害はペア単位で握りつぶさず、常にバッチ全体を中断する。
pub fn score_pairs(
    input: &BatchInput,
    gateway: &dyn OntologyGateway,
    policy: SubClassPolicy,
    fail_fast: bool,
) -> Result<Vec<PairReport>, BatchError> {
    let resolver = SkillScoreResolver::new(gateway).with_policy(policy);
    let mut reports = Vec::with_capacity(input.offers_and_resumes.len());

    for (index, pair) in input.offers_and_resumes.iter().enumerate() {
        let report = match score_pair(pair, &resolver) {
            Ok(report) => report,
            Err(MatchError::Ontology(err)) => return Err(err.into()),
            Err(source) if fail_fast => return Err(BatchError::Pair { index, source }),
            Err(err) => {
                warn!(index, id = pair.id.as_deref(), error = %err, "pair skipped");
                PairReport {
                    offer_skills: submitted_skills(&pair.offer_skills),
                    resume_skills: submitted_skills(&pair.resume_skills),
                    error: Some(err.to_string()),
                    ..PairReport::default()
                }
            }
        };

        reports.push(PairReport {
            index,
            id: pair.id.clone(),
            ..report
        });
    }

    Ok(reports)
}

/// オントロジーを一度だけ読み込み、入力ファイルの全ペアを採点する
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport, BatchError> {
    let span = info_span!(
        "batch",
        run_id = run_id::get(),
        started_at_ms = run_id::started_at_ms()
    );
    let _enter = span.enter();

    let ontology = load_ontology(&config.ontology)?;
    let input = read_batch(&config.input)?;
    let pairs = score_pairs(&input, &ontology, config.policy, config.fail_fast)?;

    let report = BatchReport {
        run_id: run_id::get().to_string(),
        generated_at: Utc::now(),
        ontology: OntologySummary {
            path: config.ontology.path.display().to_string(),
            classes: ontology.class_count(),
        },
        subclass_policy: config.policy,
        pairs,
    };

    info!(
        pairs = report.pairs.len(),
        failed = report.failed_pairs(),
        policy = config.policy.as_str(),
        "batch finished"
    );

    Ok(report)
}

pub fn run() -> Result<(), BatchError> {
    dotenv().ok();
    init_tracing_subscriber(env!("CARGO_PKG_NAME"));
    install_tracing_panic_hook(env!("CARGO_PKG_NAME"));

    let config = BatchConfig::from(Cli::parse());
    let report = run_batch(&config)?;

    let mut out = io::stdout().lock();
    match config.output {
        OutputFormat::Text => render_text(&report, &mut out)?,
        OutputFormat::Json => render_json(&report, &mut out)?,
    }

    Ok(())
}
