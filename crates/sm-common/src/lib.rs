pub mod error;
pub mod logging;
pub mod matching;
pub mod ontology;
pub mod run_id;
pub mod skill_normalizer;

pub use error::{MatchError, OntologyError};
pub use matching::{
    MatchBasis, PairMatch, SkillMatch, SkillScoreResolver, SubClassPolicy, aggregate, match_pair,
    score,
};
pub use ontology::{InMemoryOntology, OntologyGateway};
pub use skill_normalizer::{SkillId, normalize_json_skills, normalize_skill, normalize_skills};
