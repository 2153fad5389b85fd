// Whole-draft grading.
//
// Four sub-scores, each on a 0-100 scale, are combined with configurable
// weights into an overall score and letter. The sub-scores can be supplied
// by the caller or estimated from a session's graded picks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::card::ArenaId;
use crate::draft::pick_quality::GradedPick;
use crate::letter::LetterGrade;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The four components of a draft grade, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub pick_quality: f64,
    pub color_discipline: f64,
    pub deck_composition: f64,
    pub strategic: f64,
}

/// Relative weight of each sub-score in the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeWeights {
    pub pick_quality_weight: f64,
    pub color_discipline_weight: f64,
    pub deck_composition_weight: f64,
    pub strategic_weight: f64,
}

impl Default for GradeWeights {
    fn default() -> Self {
        GradeWeights {
            pick_quality_weight: 0.40,
            color_discipline_weight: 0.20,
            deck_composition_weight: 0.25,
            strategic_weight: 0.15,
        }
    }
}

impl GradeWeights {
    pub fn total(&self) -> f64 {
        self.pick_quality_weight
            + self.color_discipline_weight
            + self.deck_composition_weight
            + self.strategic_weight
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Overall grade for one draft session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftGrade {
    pub overall_grade: LetterGrade,
    pub overall_score: u32,
    pub pick_quality_score: f64,
    pub color_discipline_score: f64,
    pub deck_composition_score: f64,
    pub strategic_score: f64,
}

/// Letter for an overall score.
pub fn letter_for_score(score: u32) -> LetterGrade {
    match score {
        97.. => LetterGrade::APlus,
        93..=96 => LetterGrade::A,
        90..=92 => LetterGrade::AMinus,
        87..=89 => LetterGrade::BPlus,
        83..=86 => LetterGrade::B,
        80..=82 => LetterGrade::BMinus,
        77..=79 => LetterGrade::CPlus,
        73..=76 => LetterGrade::C,
        70..=72 => LetterGrade::CMinus,
        60..=69 => LetterGrade::D,
        _ => LetterGrade::F,
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Combine sub-scores into a draft grade.
///
/// Inputs are clamped to [0, 100] first (NaN counts as 0). The overall score
/// is the weighted mean rounded to a whole number; with no usable weight it
/// is 0. Calling this again with new inputs produces a full replacement.
pub fn aggregate(scores: &SubScores, weights: &GradeWeights) -> DraftGrade {
    let pick_quality = clamp_score(scores.pick_quality);
    let color_discipline = clamp_score(scores.color_discipline);
    let deck_composition = clamp_score(scores.deck_composition);
    let strategic = clamp_score(scores.strategic);

    let total_weight = weights.total();
    let overall = if total_weight > 0.0 {
        (pick_quality * weights.pick_quality_weight
            + color_discipline * weights.color_discipline_weight
            + deck_composition * weights.deck_composition_weight
            + strategic * weights.strategic_weight)
            / total_weight
    } else {
        0.0
    };
    let overall_score = overall.round().clamp(0.0, 100.0) as u32;

    DraftGrade {
        overall_grade: letter_for_score(overall_score),
        overall_score,
        pick_quality_score: pick_quality,
        color_discipline_score: color_discipline,
        deck_composition_score: deck_composition,
        strategic_score: strategic,
    }
}

// ---------------------------------------------------------------------------
// Sub-score estimation from graded picks
// ---------------------------------------------------------------------------

/// Pick-quality points are scored out of 40 and then rescaled.
const PICK_QUALITY_POINTS: f64 = 40.0;
const DECK_COMPOSITION_POINTS: f64 = 25.0;
/// Color discipline until pool color analysis feeds into grading.
const DEFAULT_COLOR_DISCIPLINE: f64 = 75.0;
const DEFAULT_PICK_QUALITY: f64 = 50.0;
const DEFAULT_STRATEGIC: f64 = 100.0 * 10.0 / 15.0;

/// Points out of 40 for an average picked win rate given as a percentage.
fn pick_quality_points(avg_win_rate_percent: f64) -> f64 {
    let x = avg_win_rate_percent;
    let points = match x {
        _ if x >= 58.0 => 36.0 + (x - 58.0) * 2.0,
        _ if x >= 54.0 => 32.0 + (x - 54.0),
        _ if x >= 50.0 => 28.0 + (x - 50.0),
        _ if x >= 46.0 => 24.0 + (x - 46.0),
        _ => x / 2.0,
    };
    points.clamp(0.0, PICK_QUALITY_POINTS)
}

fn bomb_points(bombs: usize) -> f64 {
    match bombs {
        2..=4 => 10.0,
        1 | 5 => 7.0,
        _ => 4.0,
    }
}

/// Estimate the four sub-scores from a session's graded picks.
///
/// N/A picks are ignored. A+ and A picks count as bombs and as excellent
/// decisions. A session with no picks at all scores 0 on pick quality, deck
/// composition and strategy.
pub fn estimate_sub_scores(picks: &[GradedPick]) -> SubScores {
    if picks.is_empty() {
        return SubScores {
            pick_quality: 0.0,
            color_discipline: DEFAULT_COLOR_DISCIPLINE,
            deck_composition: 0.0,
            strategic: 0.0,
        };
    }

    let graded: Vec<&GradedPick> = picks.iter().filter(|p| p.quality.grade.is_some()).collect();
    let excellent = graded
        .iter()
        .filter(|p| p.quality.grade.is_some_and(|g| g.is_excellent()))
        .count();

    let pick_quality = if graded.is_empty() {
        DEFAULT_PICK_QUALITY
    } else {
        let avg = graded
            .iter()
            .map(|p| p.quality.picked_card_win_rate)
            .sum::<f64>()
            / graded.len() as f64;
        pick_quality_points(avg * 100.0) / PICK_QUALITY_POINTS * 100.0
    };

    // Curve and removal are not judged yet; they get a flat 10 of 15 points.
    let deck_composition = (bomb_points(excellent) + 10.0) / DECK_COMPOSITION_POINTS * 100.0;

    let strategic = if graded.is_empty() {
        DEFAULT_STRATEGIC
    } else {
        excellent as f64 / graded.len() as f64 * 100.0
    };

    SubScores {
        pick_quality,
        color_discipline: DEFAULT_COLOR_DISCIPLINE,
        deck_composition,
        strategic,
    }
}

// ---------------------------------------------------------------------------
// Review: grade, best/worst picks and suggestions
// ---------------------------------------------------------------------------

const REVIEW_PICKS: usize = 3;

/// Summary of one pick for the review lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickSummary {
    pub pack_number: u32,
    pub pick_number: u32,
    pub card_id: ArenaId,
    pub name: Option<String>,
    pub win_rate: f64,
    pub grade: LetterGrade,
}

/// A draft grade with the picks and advice behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftReview {
    pub grade: DraftGrade,
    pub best_picks: Vec<PickSummary>,
    pub worst_picks: Vec<PickSummary>,
    pub suggestions: Vec<String>,
}

fn suggestions_for(scores: &SubScores) -> Vec<String> {
    let mut out = Vec::new();
    if scores.pick_quality < 70.0 {
        out.push("Focus on selecting higher-quality cards based on GIHWR data");
    }
    if scores.pick_quality < 60.0 {
        out.push("Review 17Lands tier list before drafting to identify strong cards");
    }
    if scores.color_discipline < 70.0 {
        out.push("Stay in your colors earlier in the draft");
    }
    if scores.deck_composition < 72.0 {
        out.push("Prioritize building a proper mana curve (2-3-4-5 drops)");
        out.push("Include 3-5 removal spells in your deck");
    }
    if scores.strategic < DEFAULT_STRATEGIC - 1e-9 {
        out.push("Take bombs and removal higher priority");
        out.push("Read signals from pack 1 to identify open colors");
    }
    if out.is_empty() {
        out.push("Excellent draft! Keep up the strong decision-making");
    }
    out.into_iter().map(String::from).collect()
}

/// Grade a session from its graded picks and list its best and worst picks.
///
/// Best picks are the three highest picked win rates, worst picks the three
/// lowest (lowest first). Ties keep pick order.
pub fn review_draft(picks: &[GradedPick], weights: &GradeWeights) -> DraftReview {
    let scores = estimate_sub_scores(picks);
    let grade = aggregate(&scores, weights);

    let mut summaries: Vec<PickSummary> = picks
        .iter()
        .filter_map(|p| {
            p.quality.grade.map(|grade| PickSummary {
                pack_number: p.pack_number,
                pick_number: p.pick_number,
                card_id: p.card_id,
                name: p.name.clone(),
                win_rate: p.quality.picked_card_win_rate,
                grade,
            })
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let shown = summaries.len().min(REVIEW_PICKS);
    let best_picks = summaries[..shown].to_vec();
    let worst_picks = summaries.iter().rev().take(shown).cloned().collect();

    DraftReview {
        grade,
        best_picks,
        worst_picks,
        suggestions: suggestions_for(&scores),
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Latest grade per draft session. Recording replaces; there is no merge.
#[derive(Debug, Clone, Default)]
pub struct GradeLedger {
    grades: HashMap<String, DraftGrade>,
}

impl GradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the grade for a session, returning the grade it replaced.
    pub fn record(&mut self, session_id: impl Into<String>, grade: DraftGrade) -> Option<DraftGrade> {
        self.grades.insert(session_id.into(), grade)
    }

    /// `None` means the session has not been graded yet.
    pub fn get(&self, session_id: &str) -> Option<&DraftGrade> {
        self.grades.get(session_id)
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
