// Pool color inference.
//
// Early in a draft any color signal counts; once six or more cards are in
// the pool a color needs at least two cards behind it, so a single splash
// pick does not drag the pool identity around.

use tracing::debug;

use crate::card::{ArenaId, Color, ColorSet};
use crate::lookup::{RatingLookup, RatingScope};

/// Pool size at which a color needs two supporting cards.
const REINFORCED_POOL_SIZE: usize = 6;

/// Infer the pool's colors from the colors of the cards picked so far.
///
/// Cards without a rating are skipped silently. A multicolor card counts
/// once towards each of its colors.
pub fn infer_pool_colors<L: RatingLookup + ?Sized>(
    picks: &[ArenaId],
    scope: RatingScope<'_, L>,
) -> ColorSet {
    let mut counts = [0usize; 5];
    for &card_id in picks {
        let Some(rating) = scope.rating(card_id) else {
            debug!("pool colors: no rating for card {card_id}, skipping");
            continue;
        };
        for color in rating.colors.iter() {
            counts[color as usize] += 1;
        }
    }

    let threshold = if picks.len() < REINFORCED_POOL_SIZE { 1 } else { 2 };
    Color::ALL
        .into_iter()
        .filter(|c| counts[*c as usize] >= threshold)
        .collect()
}
