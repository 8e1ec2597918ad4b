pub mod in_memory;
pub mod json_source;
pub mod ntriples;

use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use in_memory::{InMemoryOntology, InMemoryOntologyBuilder};

use crate::error::OntologyError;
use crate::skill_normalizer::SkillId;

/// ソフトウェア工学オントロジーの名前空間
pub const SE_ONTOLOGY_NAMESPACE: &str =
    "http://www.semanticweb.org/mcastro/ontologies/2018/5/software-engineering-ontology#";

/// オントロジー参照の抽象インターフェース
///
/// 実装例:
/// - InMemoryOntology: ファイルから一度だけ読み込んだ不変グラフ
/// - テスト用スタブ: 任意の関係を直接返す
///
/// 返すのは直接の上位/下位クラスのみ（推移閉包は取らない）。
/// 未知のスキルは `Ok(vec![])`、バックエンド自体が使えない場合のみ `Err`。
pub trait OntologyGateway: Send + Sync {
    /// 直接の上位クラス
    fn super_classes_of(&self, skill: &SkillId) -> Result<Vec<SkillId>, OntologyError>;

    /// 直接の下位クラス
    fn sub_classes_of(&self, skill: &SkillId) -> Result<Vec<SkillId>, OntologyError>;
}

impl<G: OntologyGateway + ?Sized> OntologyGateway for std::sync::Arc<G> {
    fn super_classes_of(&self, skill: &SkillId) -> Result<Vec<SkillId>, OntologyError> {
        (**self).super_classes_of(skill)
    }

    fn sub_classes_of(&self, skill: &SkillId) -> Result<Vec<SkillId>, OntologyError> {
        (**self).sub_classes_of(skill)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OntologyFormat {
    Json,
    NTriples,
}

impl OntologyFormat {
    /// 拡張子からフォーマットを推定する
    pub fn from_path(path: &Path) -> Result<Self, OntologyError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(Self::Json),
            "nt" => Ok(Self::NTriples),
            _ => Err(OntologyError::UnsupportedFormat(format!(
                "cannot infer format from {}",
                path.display()
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::NTriples => "ntriples",
        }
    }
}

impl FromStr for OntologyFormat {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "nt" | "ntriples" | "n-triples" => Ok(Self::NTriples),
            other => Err(OntologyError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OntologyConfig {
    pub path: PathBuf,
    /// None の場合は拡張子から推定
    pub format: Option<OntologyFormat>,
    /// 指定時はこの名前空間の IRI だけを参照可能なクラスとして索引する（N-Triples のみ）
    pub namespace: Option<String>,
}

impl OntologyConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            namespace: None,
        }
    }

    pub fn resolved_format(&self) -> Result<OntologyFormat, OntologyError> {
        match self.format {
            Some(format) => Ok(format),
            None => OntologyFormat::from_path(&self.path),
        }
    }
}

/// 設定に従ってオントロジーを読み込む（実行中に一度だけ呼ぶ想定）
pub fn load_ontology(config: &OntologyConfig) -> Result<InMemoryOntology, OntologyError> {
    let format = config.resolved_format()?;
    let content = std::fs::read_to_string(&config.path).map_err(|source| OntologyError::Io {
        path: config.path.clone(),
        source,
    })?;

    let ontology = match format {
        OntologyFormat::Json => json_source::parse(&content)?,
        OntologyFormat::NTriples => ntriples::parse(&content, config.namespace.as_deref())?,
    };

    if ontology.is_empty() {
        return Err(OntologyError::Empty(config.path.display().to_string()));
    }

    tracing::info!(
        path = %config.path.display(),
        format = format.as_str(),
        namespace = config.namespace.as_deref().unwrap_or("*"),
        classes = ontology.class_count(),
        "ontology loaded"
    );

    Ok(ontology)
}
