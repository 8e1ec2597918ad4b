use crate::error::MatchError;

/// スキルごとのスコアを 0.0〜1.0 の総合スコアに集約する。
///
/// 各必須スキルの配点は 1/n。全件完全一致でちょうど 1.0 になる。
/// n = 0 は配点が定義できないため NaN を返さずエラーにする。
pub fn aggregate(per_skill_scores: &[f64]) -> Result<f64, MatchError> {
    if per_skill_scores.is_empty() {
        return Err(MatchError::EmptyRequiredSkillSet);
    }

    let max_per_skill = 1.0 / per_skill_scores.len() as f64;
    let total: f64 = per_skill_scores
        .iter()
        .map(|score| score * max_per_skill)
        .sum();

    // 1/n の丸め誤差で 1.0 をわずかに超える/下回るのを防ぐ
    Ok(total.clamp(0.0, 1.0))
}
