use std::path::PathBuf;

use thiserror::Error;

/// オントロジーの読み込み・参照に関するエラー
///
/// 「スキルがオントロジーに存在しない」はエラーではなく空集合で表す。
/// ここに並ぶのはオントロジー自体が使えない状態のみ。
#[derive(Debug, Error)]
pub enum OntologyError {
    #[error("failed to read ontology file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid ontology json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed n-triples statement at line {line}: {content}")]
    Syntax { line: usize, content: String },
    #[error("unsupported ontology format: {0}")]
    UnsupportedFormat(String),
    #[error("ontology {0} contains no classes")]
    Empty(String),
    #[error("ontology backend unavailable: {0}")]
    Unavailable(String),
}

/// スコア計算・入力正規化のエラー
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("required skill set is empty; aggregate score is undefined")]
    EmptyRequiredSkillSet,
    #[error("skill token at index {index} is not a string (found {found})")]
    InvalidToken { index: usize, found: &'static str },
    #[error("skill list must be a JSON array (found {0})")]
    NotAnArray(&'static str),
    #[error(transparent)]
    Ontology(#[from] OntologyError),
}

impl MatchError {
    /// 呼び出し側の入力不備によるエラーか（オントロジー障害は含まない）
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyRequiredSkillSet | Self::InvalidToken { .. } | Self::NotAnArray(_)
        )
    }
}
