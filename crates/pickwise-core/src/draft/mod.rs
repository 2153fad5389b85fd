// Draft analysis: pool colors, pick recommendations, pick grading, draft
// grades, pack signals and pool archetypes.

pub mod archetype;
pub mod grade;
pub mod pick_quality;
pub mod pool;
pub mod recommend;
pub mod signals;

pub use archetype::{
    classify_cards, classify_deck, classify_pool, detect_play_style, guild_name, Classification,
    ColorPair, Indicator, PlayStyle, PoolComposition,
};
pub use grade::{
    aggregate, estimate_sub_scores, letter_for_score, review_draft, DraftGrade, DraftReview,
    GradeLedger, GradeWeights, PickSummary, SubScores,
};
pub use pick_quality::{
    analyze_session, grade_for_ratio, grade_pick, Alternative, GradedPick, PickQuality, RecordedPick,
};
pub use pool::infer_pool_colors;
pub use recommend::{
    recommend, recommend_pack, score_card, CardScore, ColorFit, Pack, PackRecommendation, PickRecommendation,
    ScoringWeights,
};
pub use signals::{taken_cards, wheel_probability, PackSignals, TakenCard, DEFAULT_PACK_SIZE};
