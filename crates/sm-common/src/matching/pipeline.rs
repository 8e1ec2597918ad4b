use serde::Serialize;
use tracing::info;

use super::{SkillScoreResolver, aggregate, resolver::SkillMatch};
use crate::error::MatchError;
use crate::skill_normalizer::SkillId;

/// オファーと候補者1組分の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairMatch {
    /// オファーの必須スキルと同じ順序・同じ件数
    pub per_skill: Vec<SkillMatch>,
    pub total: f64,
}

impl PairMatch {
    pub fn scores(&self) -> Vec<f64> {
        self.per_skill.iter().map(|m| m.score).collect()
    }
}

/// 必須スキルを1件ずつ判定し、総合スコアまで計算する。
///
/// 必須スキルが空の場合はオントロジーを参照する前にエラーを返す。
/// 重複した必須スキルもそれぞれ独立に採点する。
pub fn match_pair(
    offer_skills: &[SkillId],
    candidate_skills: &[SkillId],
    resolver: &SkillScoreResolver<'_>,
) -> Result<PairMatch, MatchError> {
    if offer_skills.is_empty() {
        return Err(MatchError::EmptyRequiredSkillSet);
    }

    let per_skill = offer_skills
        .iter()
        .map(|required| resolver.resolve(required, candidate_skills))
        .collect::<Result<Vec<_>, _>>()?;

    let scores: Vec<f64> = per_skill.iter().map(|m| m.score).collect();
    let total = aggregate(&scores)?;

    info!(
        required = offer_skills.len(),
        candidate = candidate_skills.len(),
        ?scores,
        total,
        "pair scored"
    );

    Ok(PairMatch { per_skill, total })
}
