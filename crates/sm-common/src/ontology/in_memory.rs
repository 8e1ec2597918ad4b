use std::collections::{BTreeSet, HashMap};

use super::OntologyGateway;
use crate::error::OntologyError;
use crate::skill_normalizer::SkillId;

#[derive(Debug, Clone, Default, PartialEq)]
struct ClassEntry {
    super_classes: BTreeSet<SkillId>,
    sub_classes: BTreeSet<SkillId>,
}

/// 正規化済みローカル名で索引した不変のクラス階層
///
/// 構築後は読み取り専用なので、`Arc` で包めばロックなしで複数ペアから共有できる。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryOntology {
    classes: HashMap<SkillId, ClassEntry>,
}

impl InMemoryOntology {
    pub fn builder() -> InMemoryOntologyBuilder {
        InMemoryOntologyBuilder::default()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, skill: &SkillId) -> bool {
        self.classes.contains_key(skill)
    }

    fn relations(
        &self,
        skill: &SkillId,
        pick: impl Fn(&ClassEntry) -> &BTreeSet<SkillId>,
    ) -> Vec<SkillId> {
        self.classes
            .get(skill)
            .map(|entry| pick(entry).iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl OntologyGateway for InMemoryOntology {
    fn super_classes_of(&self, skill: &SkillId) -> Result<Vec<SkillId>, OntologyError> {
        Ok(self.relations(skill, |entry| &entry.super_classes))
    }

    fn sub_classes_of(&self, skill: &SkillId) -> Result<Vec<SkillId>, OntologyError> {
        Ok(self.relations(skill, |entry| &entry.sub_classes))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOntologyBuilder {
    classes: HashMap<SkillId, ClassEntry>,
}

impl InMemoryOntologyBuilder {
    /// 関係を持たないクラスを宣言する
    pub fn class(mut self, name: &str) -> Self {
        self.declare(SkillId::new(name));
        self
    }

    /// `sub` を `sup` の直接の下位クラスとして登録する（逆向きの関係も同時に張る）
    pub fn sub_class_of(mut self, sub: &str, sup: &str) -> Self {
        let (sub, sup) = (SkillId::new(sub), SkillId::new(sup));
        self.link_super(&sub, sup.clone());
        self.link_sub(&sup, sub);
        self
    }

    pub(crate) fn declare(&mut self, class: SkillId) {
        self.classes.entry(class).or_default();
    }

    /// `sub` の上位クラスに `sup` を追加する（片方向のみ）
    pub(crate) fn link_super(&mut self, sub: &SkillId, sup: SkillId) {
        let entry = self.classes.entry(sub.clone()).or_default();
        // 自己参照 (A subClassOf A) は関係として扱わない
        if *sub != sup {
            entry.super_classes.insert(sup);
        }
    }

    /// `sup` の下位クラスに `sub` を追加する（片方向のみ）
    pub(crate) fn link_sub(&mut self, sup: &SkillId, sub: SkillId) {
        let entry = self.classes.entry(sup.clone()).or_default();
        if *sup != sub {
            entry.sub_classes.insert(sub);
        }
    }

    pub fn build(self) -> InMemoryOntology {
        InMemoryOntology {
            classes: self.classes,
        }
    }
}
