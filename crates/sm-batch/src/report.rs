use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sm_common::{MatchBasis, SkillId, SkillMatch, SubClassPolicy};

/// 1回のバッチ実行の結果
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub ontology: OntologySummary,
    pub subclass_policy: SubClassPolicy,
    pub pairs: Vec<PairReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OntologySummary {
    pub path: String,
    pub classes: usize,
}

/// 1組分の結果。失敗した組は `error` のみ埋まる
#[derive(Debug, Clone, Default, Serialize)]
pub struct PairReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub offer_skills: Vec<SkillId>,
    pub resume_skills: Vec<SkillId>,
    pub per_skill: Vec<SkillMatch>,
    pub scores: Vec<f64>,
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PairReport {
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("pair {} ({id})", self.index),
            None => format!("pair {}", self.index),
        }
    }
}

impl BatchReport {
    pub fn failed_pairs(&self) -> usize {
        self.pairs.iter().filter(|p| p.error.is_some()).count()
    }
}

fn join(skills: &[SkillId]) -> String {
    let names: Vec<_> = skills.iter().map(SkillId::as_str).collect();
    format!("[{}]", names.join(", "))
}

/// 人が読む形式で出力する（未一致スキルは上位/下位クラスも併記）
pub fn render_text<W: Write>(report: &BatchReport, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "run {} | ontology {} ({} classes) | sub-class policy {}",
        report.run_id,
        report.ontology.path,
        report.ontology.classes,
        report.subclass_policy.as_str()
    )?;

    for pair in &report.pairs {
        writeln!(out)?;
        writeln!(out, "[{}]", pair.label())?;
        writeln!(out, "Offer Skills: {}", join(&pair.offer_skills))?;
        writeln!(out, "Resume Skills: {}", join(&pair.resume_skills))?;

        if let Some(error) = &pair.error {
            writeln!(out, "Error: {error}")?;
            continue;
        }

        for skill in pair.per_skill.iter().filter(|m| m.basis != MatchBasis::Exact) {
            writeln!(out, "{} NOT Found in Resume", skill.skill)?;
            writeln!(out, "\tSuperClasses: {}", join(&skill.super_classes))?;
            writeln!(out, "\tSubClasses: {}", join(&skill.sub_classes))?;
        }

        let scores: Vec<_> = pair.scores.iter().map(|s| format!("{s:.1}")).collect();
        writeln!(out, "Matching per Skill: [{}]", scores.join(", "))?;
        if let Some(total) = pair.total {
            writeln!(out, "Calculated Total Score: {total:.4}")?;
        }
    }

    Ok(())
}

pub fn render_json<W: Write>(report: &BatchReport, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report).map_err(io::Error::from)?;
    writeln!(out)
}
