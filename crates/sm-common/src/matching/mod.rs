pub mod aggregate;
pub mod pipeline;
pub mod resolver;

pub use aggregate::aggregate;
pub use pipeline::{PairMatch, match_pair};
pub use resolver::{MatchBasis, SkillMatch, SkillScoreResolver, SubClassPolicy, score};

/// 完全一致のスコア
pub const EXACT_MATCH_SCORE: f64 = 1.0;
/// 上位/下位クラス経由の部分一致スコア
pub const RELATED_MATCH_SCORE: f64 = 0.5;
/// 1スキルあたりの上限
pub const MAX_SKILL_SCORE: f64 = 1.0;
