use super::{
    BONUS_BOUNDARY, BONUS_CONSECUTIVE, BONUS_FIRST_CHAR_MULTIPLIER, SCORE_GAP_EXTENSION,
    SCORE_GAP_START, SCORE_MATCH, fold_rune,
};
use crate::char_class::{CharClass, bonus_for, classify};
use crate::runes::Rune;

/// Scores the window `text[sidx..eidx]` against `pattern`.
///
/// Matched pattern characters earn [`SCORE_MATCH`] plus a bonus: the larger
/// of the position's own boundary bonus, the first bonus of the current
/// consecutive run and [`BONUS_CONSECUTIVE`] (runs only). The first matched
/// character's bonus is multiplied by [`BONUS_FIRST_CHAR_MULTIPLIER`]. Text
/// characters skipped inside the window cost a gap penalty.
pub(crate) fn calculate_score(
    case_sensitive: bool,
    normalize: bool,
    text: &[Rune],
    pattern: &[Rune],
    sidx: usize,
    eidx: usize,
    with_pos: bool,
) -> (i32, Option<Vec<usize>>) {
    let mut pidx = 0;
    let mut score: i32 = 0;
    let mut in_gap = false;
    let mut consecutive = 0;
    let mut first_bonus: i16 = 0;
    let mut pos = with_pos.then(|| Vec::with_capacity(pattern.len()));
    let mut prev_class = if sidx > 0 {
        classify(text[sidx - 1])
    } else {
        CharClass::NonWord
    };

    for (idx, &raw) in text.iter().enumerate().take(eidx).skip(sidx) {
        let class = classify(raw);
        let rune = fold_rune(raw, case_sensitive, normalize);

        if pattern.get(pidx) == Some(&rune) {
            if let Some(pos) = pos.as_mut() {
                pos.push(idx);
            }
            score += i32::from(SCORE_MATCH);
            let mut bonus = bonus_for(prev_class, class);
            if consecutive == 0 {
                first_bonus = bonus;
            } else {
                // a boundary inside a run starts a new chunk
                if bonus == BONUS_BOUNDARY {
                    first_bonus = bonus;
                }
                bonus = bonus.max(first_bonus).max(BONUS_CONSECUTIVE);
            }
            if pidx == 0 {
                score += i32::from(bonus * BONUS_FIRST_CHAR_MULTIPLIER);
            } else {
                score += i32::from(bonus);
            }
            in_gap = false;
            consecutive += 1;
            pidx += 1;
        } else {
            score += i32::from(if in_gap {
                SCORE_GAP_EXTENSION
            } else {
                SCORE_GAP_START
            });
            in_gap = true;
            consecutive = 0;
            first_bonus = 0;
        }
        prev_class = class;
    }

    (score, pos)
}
