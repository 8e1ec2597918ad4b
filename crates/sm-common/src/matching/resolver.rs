use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use super::{EXACT_MATCH_SCORE, MAX_SKILL_SCORE, RELATED_MATCH_SCORE};
use crate::error::OntologyError;
use crate::ontology::OntologyGateway;
use crate::skill_normalizer::SkillId;

/// 下位クラス一致の扱い
///
/// - `Accumulate`: 一致した下位クラスごとに 0.5 を加算（上限 1.0）。上位クラス側は代入なので非対称
/// - `Symmetric`: 下位クラスも上位クラスと同じく 0.5 を代入（関連一致は最大 0.5）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubClassPolicy {
    #[default]
    Accumulate,
    Symmetric,
}

impl SubClassPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accumulate => "accumulate",
            Self::Symmetric => "symmetric",
        }
    }
}

impl FromStr for SubClassPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accumulate" => Ok(Self::Accumulate),
            "symmetric" => Ok(Self::Symmetric),
            other => Err(format!(
                "unknown sub-class policy '{other}' (expected accumulate | symmetric)"
            )),
        }
    }
}

/// スコアの根拠
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    Exact,
    SuperClass,
    SubClass,
    SuperAndSubClass,
    Unmatched,
}

/// 必須スキル1件分の判定結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillMatch {
    pub skill: SkillId,
    /// 0.0 / 0.5 / 1.0 のいずれか
    pub score: f64,
    pub basis: MatchBasis,
    /// オントロジーを参照した場合のみ埋まる
    pub super_classes: Vec<SkillId>,
    pub sub_classes: Vec<SkillId>,
    /// 候補者が持っていた関連クラス
    pub matched_related: Vec<SkillId>,
}

impl SkillMatch {
    fn exact(skill: &SkillId) -> Self {
        Self {
            skill: skill.clone(),
            score: EXACT_MATCH_SCORE,
            basis: MatchBasis::Exact,
            super_classes: vec![],
            sub_classes: vec![],
            matched_related: vec![],
        }
    }
}

/// 必須スキルを候補者スキルと照合し、部分点を付与する
///
/// オントロジーは不変ハンドルとして外から渡す（テストではスタブに差し替え可能）。
pub struct SkillScoreResolver<'g> {
    gateway: &'g dyn OntologyGateway,
    policy: SubClassPolicy,
}

impl<'g> SkillScoreResolver<'g> {
    pub fn new(gateway: &'g dyn OntologyGateway) -> Self {
        Self {
            gateway,
            policy: SubClassPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SubClassPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> SubClassPolicy {
        self.policy
    }

    /// 1件の必須スキルを判定する。
    ///
    /// 1. 候補者スキルに完全一致があれば 1.0（オントロジーは参照しない）
    /// 2. 上位クラスのいずれかを候補者が持っていれば 0.5（代入）
    /// 3. 下位クラスは方針に従って加算または代入
    /// 4. 1.0 で頭打ち
    pub fn resolve(
        &self,
        required: &SkillId,
        candidates: &[SkillId],
    ) -> Result<SkillMatch, OntologyError> {
        if candidates.contains(required) {
            return Ok(SkillMatch::exact(required));
        }

        let super_classes = self.gateway.super_classes_of(required)?;
        let sub_classes = self.gateway.sub_classes_of(required)?;

        let matched_supers: Vec<_> = super_classes
            .iter()
            .filter(|class| candidates.contains(class))
            .cloned()
            .collect();
        let matched_subs: Vec<_> = sub_classes
            .iter()
            .filter(|class| candidates.contains(class))
            .cloned()
            .collect();

        let mut secondary = 0.0;
        if !matched_supers.is_empty() {
            secondary = RELATED_MATCH_SCORE;
        }
        match self.policy {
            SubClassPolicy::Accumulate => {
                secondary += RELATED_MATCH_SCORE * matched_subs.len() as f64;
            }
            SubClassPolicy::Symmetric if !matched_subs.is_empty() => {
                secondary = RELATED_MATCH_SCORE;
            }
            SubClassPolicy::Symmetric => {}
        }
        let score = secondary.min(MAX_SKILL_SCORE);

        let basis = match (matched_supers.is_empty(), matched_subs.is_empty()) {
            (false, false) => MatchBasis::SuperAndSubClass,
            (false, true) => MatchBasis::SuperClass,
            (true, false) => MatchBasis::SubClass,
            (true, true) => MatchBasis::Unmatched,
        };

        debug!(
            skill = %required,
            ?super_classes,
            ?sub_classes,
            ?basis,
            score,
            "required skill not found in resume"
        );

        let mut matched_related = matched_supers;
        matched_related.extend(matched_subs);

        Ok(SkillMatch {
            skill: required.clone(),
            score,
            basis,
            super_classes,
            sub_classes,
            matched_related,
        })
    }

    pub fn score(&self, required: &SkillId, candidates: &[SkillId]) -> Result<f64, OntologyError> {
        self.resolve(required, candidates).map(|m| m.score)
    }
}

/// 既定方針（Accumulate）でのスコア計算
pub fn score(
    required: &SkillId,
    candidates: &[SkillId],
    gateway: &dyn OntologyGateway,
) -> Result<f64, OntologyError> {
    SkillScoreResolver::new(gateway).score(required, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::InMemoryOntology;
    use crate::skill_normalizer::normalize_skills;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 参照回数を数えるスタブ
    #[derive(Default)]
    struct CountingGateway {
        calls: AtomicUsize,
    }

    impl OntologyGateway for CountingGateway {
        fn super_classes_of(&self, _skill: &SkillId) -> Result<Vec<SkillId>, OntologyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![SkillId::new("anything")])
        }

        fn sub_classes_of(&self, _skill: &SkillId) -> Result<Vec<SkillId>, OntologyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    struct UnavailableGateway;

    impl OntologyGateway for UnavailableGateway {
        fn super_classes_of(&self, _skill: &SkillId) -> Result<Vec<SkillId>, OntologyError> {
            Err(OntologyError::Unavailable("store offline".into()))
        }

        fn sub_classes_of(&self, _skill: &SkillId) -> Result<Vec<SkillId>, OntologyError> {
            Err(OntologyError::Unavailable("store offline".into()))
        }
    }

    fn languages() -> InMemoryOntology {
        InMemoryOntology::builder()
            .sub_class_of("java", "programming-language")
            .sub_class_of("python", "programming-language")
            .sub_class_of("kotlin", "programming-language")
            .sub_class_of("programming-language", "skill")
            .sub_class_of("java", "jvm-language")
            .build()
    }

    fn skill(s: &str) -> SkillId {
        SkillId::new(s)
    }

    #[test]
    fn exact_match_short_circuits_ontology() {
        let gateway = CountingGateway::default();
        let candidates = normalize_skills(&["Rust", "Java"]);

        let result = SkillScoreResolver::new(&gateway)
            .resolve(&skill("java"), &candidates)
            .unwrap();

        assert_eq!(result.score, 1.0);
        assert_eq!(result.basis, MatchBasis::Exact);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_skill_scores_zero() {
        let ontology = languages();
        let candidates = normalize_skills(&["javascript"]);
        let result = SkillScoreResolver::new(&ontology)
            .resolve(&skill("python-unknown"), &candidates)
            .unwrap();

        assert_eq!(result.score, 0.0);
        assert_eq!(result.basis, MatchBasis::Unmatched);
        assert!(result.super_classes.is_empty());
        assert!(result.sub_classes.is_empty());
    }

    #[test]
    fn super_class_in_resume_gives_half_credit() {
        let ontology = languages();
        let candidates = normalize_skills(&["programming-language"]);
        let result = SkillScoreResolver::new(&ontology)
            .resolve(&skill("java"), &candidates)
            .unwrap();

        assert_eq!(result.score, 0.5);
        assert_eq!(result.basis, MatchBasis::SuperClass);
        assert_eq!(result.matched_related, vec![skill("programming-language")]);
        assert_eq!(
            result.super_classes,
            vec![skill("jvm-language"), skill("programming-language")]
        );
    }

    #[test]
    fn several_matching_super_classes_do_not_accumulate() {
        let ontology = languages();
        let candidates = normalize_skills(&["programming-language", "jvm-language"]);
        let value = score(&skill("java"), &candidates, &ontology).unwrap();
        assert_eq!(value, 0.5);
    }

    #[test]
    fn sub_classes_accumulate_and_clamp() {
        let ontology = languages();
        let resolver = SkillScoreResolver::new(&ontology);

        let one = normalize_skills(&["python"]);
        assert_eq!(resolver.score(&skill("programming-language"), &one).unwrap(), 0.5);

        let two = normalize_skills(&["python", "java"]);
        assert_eq!(resolver.score(&skill("programming-language"), &two).unwrap(), 1.0);

        let three = normalize_skills(&["python", "java", "kotlin"]);
        let result = resolver
            .resolve(&skill("programming-language"), &three)
            .unwrap();
        assert_eq!(result.score, 1.0);
        assert_eq!(result.basis, MatchBasis::SubClass);
        assert_eq!(result.matched_related.len(), 3);
    }

    #[test]
    fn super_and_sub_class_matches_combine() {
        let ontology = languages();
        let candidates = normalize_skills(&["skill", "java"]);
        let result = SkillScoreResolver::new(&ontology)
            .resolve(&skill("programming-language"), &candidates)
            .unwrap();

        assert_eq!(result.score, 1.0);
        assert_eq!(result.basis, MatchBasis::SuperAndSubClass);
    }

    #[test]
    fn duplicate_resume_entries_count_once() {
        let ontology = languages();
        let candidates = normalize_skills(&["java", "Java", "\"JAVA\""]);
        let value = score(&skill("programming-language"), &candidates, &ontology).unwrap();
        assert_eq!(value, 0.5);
    }

    #[test]
    fn symmetric_policy_caps_related_credit_at_half() {
        let ontology = languages();
        let resolver = SkillScoreResolver::new(&ontology).with_policy(SubClassPolicy::Symmetric);
        assert_eq!(resolver.policy(), SubClassPolicy::Symmetric);

        let candidates = normalize_skills(&["python", "java", "skill"]);
        let value = resolver
            .score(&skill("programming-language"), &candidates)
            .unwrap();
        assert_eq!(value, 0.5);
    }

    #[test]
    fn scores_stay_within_allowed_values() {
        let ontology = languages();
        let resumes = [
            vec![],
            vec!["skill"],
            vec!["java"],
            vec!["java", "python"],
            vec!["java", "python", "kotlin", "skill"],
            vec!["cobol"],
        ];
        let required = ["programming-language", "java", "skill", "cobol"];

        for policy in [SubClassPolicy::Accumulate, SubClassPolicy::Symmetric] {
            let resolver = SkillScoreResolver::new(&ontology).with_policy(policy);
            for resume in &resumes {
                let candidates = normalize_skills(resume);
                for req in required {
                    let value = resolver.score(&skill(req), &candidates).unwrap();
                    assert!(
                        [0.0, 0.5, 1.0].contains(&value),
                        "{req} vs {resume:?} under {policy:?} gave {value}"
                    );
                }
            }
        }
    }

    #[test]
    fn unavailable_ontology_is_propagated() {
        let candidates = normalize_skills(&["rust"]);
        let err = score(&skill("java"), &candidates, &UnavailableGateway).unwrap_err();
        assert!(matches!(err, OntologyError::Unavailable(_)));
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!(
            "Symmetric".parse::<SubClassPolicy>().unwrap(),
            SubClassPolicy::Symmetric
        );
        assert_eq!(
            " accumulate ".parse::<SubClassPolicy>().unwrap(),
            SubClassPolicy::Accumulate
        );
        assert!("assign".parse::<SubClassPolicy>().is_err());
    }
}
