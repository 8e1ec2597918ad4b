use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::MatchError;

/// 正規化済みのスキル識別子
///
/// オファー側・候補者側・オントロジー側のすべてが [`normalize_skill`] を通すため、
/// 同じ概念なら文字列比較だけで一致判定できる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    pub fn new(raw: &str) -> Self {
        Self(normalize_skill(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for SkillId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// スキル文字列を正規形に変換（引用符除去 + 前後空白除去 + 小文字化）
pub fn normalize_skill(raw: &str) -> String {
    raw.replace('"', "").trim().to_lowercase()
}

/// スキル配列を正規化（順序維持・重複や空文字も落とさない）
pub fn normalize_skills<S: AsRef<str>>(raw: &[S]) -> Vec<SkillId> {
    raw.iter().map(|s| SkillId::new(s.as_ref())).collect()
}

/// JSON 配列のスキル一覧を正規化する。
///
/// 文字列以外の要素は黙ってスコア計算に流さず、位置と型を添えて拒否する。
pub fn normalize_json_skills(value: &Value) -> Result<Vec<SkillId>, MatchError> {
    let items = value
        .as_array()
        .ok_or_else(|| MatchError::NotAnArray(json_type_name(value)))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(s) => Ok(SkillId::new(s)),
            other => Err(MatchError::InvalidToken {
                index,
                found: json_type_name(other),
            }),
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
