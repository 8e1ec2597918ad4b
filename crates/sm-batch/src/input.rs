use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::BatchError;

/// バッチ入力ファイル
///
/// ```json
/// { "offersAndResumes": [ { "offerSkills": ["Java"], "resumeSkills": ["SQL"] } ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInput {
    pub offers_and_resumes: Vec<PairInput>,
}

/// オファーと候補者1組
///
/// スキル一覧は正規化時に型検査するため、ここでは生の JSON のまま保持する。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInput {
    #[serde(default)]
    pub id: Option<String>,
    pub offer_skills: Value,
    pub resume_skills: Value,
}

pub fn parse_batch(content: &str) -> Result<BatchInput, BatchError> {
    Ok(serde_json::from_str(content)?)
}

pub fn read_batch(path: &Path) -> Result<BatchInput, BatchError> {
    let content = std::fs::read_to_string(path).map_err(|source| BatchError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    parse_batch(&content)
}
