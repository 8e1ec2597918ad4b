use std::sync::LazyLock;

use regex::Regex;

use super::InMemoryOntology;
use crate::error::OntologyError;
use crate::skill_normalizer::SkillId;

const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";

static STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(<[^>]*>|_:\S+)\s+(<[^>]*>)\s+(<[^>]*>|_:\S+|"(?:[^"\\]|\\.)*"(?:@[A-Za-z0-9-]+|\^\^<[^>]*>)?)\s*\.\s*(?:#.*)?$"#,
    )
    .expect("statement regex is valid")
});

#[derive(Debug, PartialEq)]
enum Term<'a> {
    Iri(&'a str),
    /// 空白ノード・リテラル（制約クラスなど名前のないものは関係に含めない）
    Other,
}

fn term(raw: &str) -> Term<'_> {
    raw.strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .map(Term::Iri)
        .unwrap_or(Term::Other)
}

/// `ns` の直後にローカル名が続く IRI だけを名前空間内とみなす。
///
/// `ns` が `#` / `/` で終わらない場合は区切り文字を1つ挟んだものだけを許す
/// （`http://x.org/onto` に `http://x.org/onto2#A` を含めない）。
fn in_namespace(iri: &str, ns: &str) -> bool {
    let Some(rest) = iri.strip_prefix(ns) else {
        return false;
    };
    let local = if ns.ends_with(['#', '/']) {
        rest
    } else {
        match rest.strip_prefix(['#', '/']) {
            Some(local) => local,
            None => return false,
        }
    };
    !local.is_empty() && !local.contains(['#', '/'])
}

/// IRI のローカル名（最後の `#` または `/` 以降）
fn local_name(iri: &str) -> &str {
    iri.rsplit_once('#')
        .or_else(|| iri.rsplit_once('/'))
        .map(|(_, local)| local)
        .unwrap_or(iri)
}

/// `rdfs:subClassOf` を中心に N-Triples を読み込む。
///
/// - 名前付き IRI 間の `rdfs:subClassOf` を直接の上位/下位関係とする
/// - `rdf:type owl:Class` / `rdfs:Class` はクラス宣言として扱う
/// - それ以外の述語、空白ノード、リテラルは無視する
///
/// `namespace` 指定時は、その名前空間の IRI だけを参照可能なクラスとして索引する。
/// 関係先は名前空間外でもローカル名で返す。
pub fn parse(content: &str, namespace: Option<&str>) -> Result<InMemoryOntology, OntologyError> {
    let in_scope = |iri: &str| namespace.is_none_or(|ns| in_namespace(iri, ns));
    let mut builder = InMemoryOntology::builder();

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let captures = STATEMENT.captures(line).ok_or_else(|| OntologyError::Syntax {
            line: idx + 1,
            content: line.to_string(),
        })?;

        match (term(&captures[1]), term(&captures[2]), term(&captures[3])) {
            (Term::Iri(sub), Term::Iri(RDFS_SUB_CLASS_OF), Term::Iri(sup)) => {
                let sub_id = SkillId::new(local_name(sub));
                let sup_id = SkillId::new(local_name(sup));
                if in_scope(sub) {
                    builder.link_super(&sub_id, sup_id.clone());
                }
                if in_scope(sup) {
                    builder.link_sub(&sup_id, sub_id);
                }
            }
            (Term::Iri(class), Term::Iri(RDF_TYPE), Term::Iri(OWL_CLASS | RDFS_CLASS)) => {
                if in_scope(class) {
                    builder.declare(SkillId::new(local_name(class)));
                }
            }
            _ => {}
        }
    }

    Ok(builder.build())
}
