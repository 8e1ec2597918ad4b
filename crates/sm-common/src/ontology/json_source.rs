use serde::Deserialize;

use super::InMemoryOntology;
use crate::error::OntologyError;
use crate::skill_normalizer::SkillId;

#[derive(Debug, Deserialize)]
struct OntologyDocument {
    classes: Vec<ClassDocument>,
}

#[derive(Debug, Deserialize)]
struct ClassDocument {
    name: String,
    #[serde(default)]
    super_classes: Vec<String>,
}

/// JSON 形式のオントロジーを読み込む。
///
/// ```json
/// { "classes": [ { "name": "java", "super_classes": ["programming-language"] } ] }
/// ```
///
/// 下位クラスは上位クラスの辺を反転して導出する。
pub fn parse(content: &str) -> Result<InMemoryOntology, OntologyError> {
    let document: OntologyDocument = serde_json::from_str(content)?;

    let mut builder = InMemoryOntology::builder();
    for class in document.classes {
        let name = SkillId::new(&class.name);
        builder.declare(name.clone());
        for sup in &class.super_classes {
            let sup = SkillId::new(sup);
            builder.link_super(&name, sup.clone());
            builder.link_sub(&sup, name.clone());
        }
    }

    Ok(builder.build())
}
