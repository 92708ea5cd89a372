use tracing::trace;

use super::{
    BONUS_BOUNDARY, BONUS_CONSECUTIVE, BONUS_FIRST_CHAR_MULTIPLIER, MatchOptions, MatchOutput,
    MatchSpan, SCORE_GAP_EXTENSION, SCORE_GAP_START, SCORE_MATCH, ascii_fuzzy_index,
    calculate_score, fold_rune, index_at,
};
use crate::char_class::{
    CharClass, bonus_for, classify_ascii, classify_non_ascii, to_lower_non_ascii,
};
use crate::normalize::normalize_rune;
use crate::runes::{Rune, offset};
use crate::slab::{Slab, SlabArena};

/// Greedy matcher: takes the first occurrence of each pattern character,
/// then walks back from the last one to shrink the window, then scores it.
///
/// Linear time and no scratch memory. The slab argument is accepted for
/// signature parity with the other matchers and ignored.
pub fn fuzzy_match_v1(
    opts: MatchOptions,
    text: &[Rune],
    pattern: &[Rune],
    _slab: Option<&mut Slab>,
) -> MatchOutput {
    if pattern.is_empty() {
        return (MatchSpan::new(0, 0, 0), None);
    }
    if ascii_fuzzy_index(text, pattern, opts.case_sensitive).is_none() {
        return (MatchSpan::NONE, None);
    }

    let len_runes = text.len();
    let len_pattern = pattern.len();
    let fold = |idx: usize| {
        let rune = text[index_at(idx, len_runes, opts.forward)];
        fold_rune(rune, opts.case_sensitive, opts.normalize)
    };
    let pattern_at = |pidx: usize| pattern[index_at(pidx, len_pattern, opts.forward)];

    let mut pidx = 0;
    let mut sidx = None;
    let mut eidx = None;
    for index in 0..len_runes {
        if fold(index) == pattern_at(pidx) {
            if sidx.is_none() {
                sidx = Some(index);
            }
            pidx += 1;
            if pidx == len_pattern {
                eidx = Some(index + 1);
                break;
            }
        }
    }

    let (Some(mut sidx), Some(mut eidx)) = (sidx, eidx) else {
        return (MatchSpan::NONE, None);
    };

    // tighten: the last pattern char is fixed, find the latest start
    let mut pidx = len_pattern - 1;
    for index in (sidx..eidx).rev() {
        if fold(index) == pattern_at(pidx) {
            if pidx == 0 {
                sidx = index;
                break;
            }
            pidx -= 1;
        }
    }

    if !opts.forward {
        (sidx, eidx) = (len_runes - eidx, len_runes - sidx);
    }

    let (score, pos) = calculate_score(
        opts.case_sensitive,
        opts.normalize,
        text,
        pattern,
        sidx,
        eidx,
        opts.with_positions,
    );
    (MatchSpan::new(offset(sidx), offset(eidx), score), pos)
}

/// Optimal local alignment of `pattern` against `text`.
///
/// The score matrix only covers the columns between the first occurrence of
/// the first pattern character and the last occurrence of the last one.
/// When the slab cannot hold `text.len() * pattern.len()` cells the call is
/// delegated to [`fuzzy_match_v1`].
pub fn fuzzy_match_v2(
    opts: MatchOptions,
    text: &[Rune],
    pattern: &[Rune],
    slab: Option<&mut Slab>,
) -> MatchOutput {
    let m = pattern.len();
    if m == 0 {
        return (MatchSpan::new(0, 0, 0), opts.with_positions.then(Vec::new));
    }
    let n = text.len();

    let slab = match slab {
        Some(slab) if n.saturating_mul(m) > slab.i16_capacity() => {
            trace!(
                text_len = n,
                pattern_len = m,
                capacity = slab.i16_capacity(),
                "slab too small, using greedy matcher"
            );
            return fuzzy_match_v1(opts, text, pattern, Some(slab));
        }
        other => other,
    };

    // Phase 1: cheap rejection
    let Some(idx) = ascii_fuzzy_index(text, pattern, opts.case_sensitive) else {
        return (MatchSpan::NONE, None);
    };

    let mut arena = match slab {
        Some(slab) => slab.arena(),
        None => SlabArena::unbacked(),
    };
    let mut h0 = arena.alloc16(n);
    let mut c0 = arena.alloc16(n);
    let mut b = arena.alloc16(n);
    let mut f = arena.alloc32(m);
    let mut t: Vec<Rune> = Vec::with_capacity(n);
    t.extend_from_slice(&text[..idx]);

    // Phase 2: bonuses, first-row scores and first occurrences
    let mut max_score: i16 = 0;
    let mut max_score_pos = 0;
    // ties go to the later column when scanning backward
    let beats = |score: i16, best: i16| {
        if opts.forward {
            score > best
        } else {
            score >= best
        }
    };
    let mut pidx = 0;
    let mut last_idx = 0;
    let pchar0 = pattern[0];
    let mut pchar = pattern[0];
    let mut prev_h0: i16 = 0;
    let mut prev_class = CharClass::NonWord;
    let mut in_gap = false;

    for (i, &raw) in text.iter().enumerate().skip(idx) {
        let mut rune = raw;
        let class = if rune.is_ascii() {
            let class = classify_ascii(rune);
            if !opts.case_sensitive && class == CharClass::Upper {
                rune = rune.to_ascii_lowercase();
            }
            class
        } else {
            let class = classify_non_ascii(rune);
            if !opts.case_sensitive && class == CharClass::Upper {
                rune = to_lower_non_ascii(rune);
            }
            if opts.normalize {
                rune = normalize_rune(rune);
            }
            class
        };
        t.push(rune);

        let bonus = bonus_for(prev_class, class);
        b[i] = bonus;
        prev_class = class;

        if rune == pchar {
            if pidx < m {
                f[pidx] = offset(i);
                pidx += 1;
                pchar = pattern[pidx.min(m - 1)];
            }
            last_idx = i;
        }

        if rune == pchar0 {
            let score = SCORE_MATCH + bonus * BONUS_FIRST_CHAR_MULTIPLIER;
            h0[i] = score;
            c0[i] = 1;
            if m == 1 && beats(score, max_score) {
                max_score = score;
                max_score_pos = i;
                if opts.forward && bonus == BONUS_BOUNDARY {
                    break;
                }
            }
            in_gap = false;
        } else {
            let penalty = if in_gap {
                SCORE_GAP_EXTENSION
            } else {
                SCORE_GAP_START
            };
            h0[i] = prev_h0.saturating_add(penalty).max(0);
            c0[i] = 0;
            in_gap = true;
        }
        prev_h0 = h0[i];
    }

    if pidx != m {
        return (MatchSpan::NONE, None);
    }
    if m == 1 {
        let span = MatchSpan::new(
            offset(max_score_pos),
            offset(max_score_pos + 1),
            i32::from(max_score),
        );
        return (span, opts.with_positions.then(|| vec![max_score_pos]));
    }

    // Phase 3: fill the score matrix over the feasible window
    let f0 = first_occurrence(&f, 0);
    let width = last_idx - f0 + 1;
    let mut h = arena.alloc16(width * m);
    h[..width].copy_from_slice(&h0[f0..=last_idx]);
    let mut c = arena.alloc16(width * m);
    c[..width].copy_from_slice(&c0[f0..=last_idx]);

    for (pidx, &pchar) in pattern.iter().enumerate().skip(1) {
        let fcol = first_occurrence(&f, pidx);
        let row = pidx * width;
        let mut in_gap = false;
        h[row + fcol - f0 - 1] = 0;

        for col in fcol..=last_idx {
            let j0 = col - f0;
            let left = h[row + j0 - 1];
            let gap = if in_gap {
                SCORE_GAP_EXTENSION
            } else {
                SCORE_GAP_START
            };
            let s2 = left.saturating_add(gap);
            let mut s1: i16 = 0;
            let mut consecutive: i16 = 0;

            if t[col] == pchar {
                s1 = h[row - width + j0 - 1].saturating_add(SCORE_MATCH);
                let mut bonus = b[col];
                consecutive = c[row - width + j0 - 1] + 1;
                if bonus == BONUS_BOUNDARY {
                    consecutive = 1;
                } else if consecutive > 1 {
                    let run_start = col + 1 - consecutive as usize;
                    bonus = bonus.max(BONUS_CONSECUTIVE.max(b[run_start]));
                }
                if s1.saturating_add(bonus) < s2 {
                    s1 = s1.saturating_add(b[col]);
                    consecutive = 0;
                } else {
                    s1 = s1.saturating_add(bonus);
                }
            }
            c[row + j0] = consecutive;

            in_gap = s1 < s2;
            let score = s1.max(s2).max(0);
            if pidx == m - 1 && beats(score, max_score) {
                max_score = score;
                max_score_pos = col;
            }
            h[row + j0] = score;
        }
    }

    // Phase 4: backtrace
    let mut j = f0;
    let positions = if opts.with_positions {
        let mut pos = Vec::with_capacity(m);
        let mut i = m - 1;
        j = max_score_pos;
        let mut prefer_match = true;
        loop {
            let row = i * width;
            let j0 = j - f0;
            let s = h[row + j0];

            let fi = first_occurrence(&f, i);
            let s1 = if i > 0 && j >= fi {
                h[row - width + j0 - 1]
            } else {
                0
            };
            let s2 = if j > fi { h[row + j0 - 1] } else { 0 };

            if s > s1 && (s > s2 || (s == s2 && prefer_match)) {
                pos.push(j);
                if i == 0 {
                    break;
                }
                i -= 1;
            }

            let below = row + width + j0 + 1;
            prefer_match = c[row + j0] > 1 || (below < c.len() && c[below] > 0);
            j -= 1;
        }
        pos.reverse();
        Some(pos)
    } else {
        None
    };

    let span = MatchSpan::new(offset(j), offset(max_score_pos + 1), i32::from(max_score));
    (span, positions)
}

#[inline]
fn first_occurrence(f: &[i32], pidx: usize) -> usize {
    usize::try_from(f[pidx]).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::test_support::run;
    use crate::algo::{BONUS_CAMEL_123, BONUS_NON_WORD, Matcher};
    use crate::runes::str_to_runes;

    const M: i32 = SCORE_MATCH as i32;
    const GS: i32 = SCORE_GAP_START as i32;
    const GE: i32 = SCORE_GAP_EXTENSION as i32;
    const BB: i32 = BONUS_BOUNDARY as i32;
    const BC: i32 = BONUS_CAMEL_123 as i32;
    const BN: i32 = BONUS_NON_WORD as i32;
    const BCON: i32 = BONUS_CONSECUTIVE as i32;
    const FCM: i32 = BONUS_FIRST_CHAR_MULTIPLIER as i32;

    #[rustfmt::skip]
    fn fuzzy_cases() -> Vec<(bool, &'static str, &'static str, i32, i32, i32)> {
        vec![
            (false, "fooBarbaz1", "oBZ", 2, 9, M * 3 + BC + GS + GE * 3),
            (false, "foo bar baz", "fbb", 0, 9, M * 3 + BB * FCM + BB * 2 + 2 * GS + 4 * GE),
            (false, "/AutomatorDocument.icns", "rdoc", 9, 13, M * 4 + BC + BCON * 2),
            (false, "/man1/zshcompctl.1", "zshc", 6, 10, M * 4 + BB * FCM + BB * 3),
            (false, "/.oh-my-zsh/cache", "zshc", 8, 13, M * 4 + BB * FCM + BB * 3 + GS),
            (false, "ab0123 456", "12356", 3, 10, M * 5 + BCON * 3 + GS + GE),
            (false, "abc123 456", "12356", 3, 10, M * 5 + BC * FCM + BC * 2 + BCON + GS + GE),
            (false, "foo/bar/baz", "fbb", 0, 9, M * 3 + BB * FCM + BB * 2 + 2 * GS + 4 * GE),
            (false, "fooBarBaz", "fbb", 0, 7, M * 3 + BB * FCM + BC * 2 + 2 * GS + 2 * GE),
            (false, "foo barbaz", "fbb", 0, 8, M * 3 + BB * FCM + BB + GS * 2 + GE * 3),
            (false, "fooBar Baz", "foob", 0, 4, M * 4 + BB * FCM + BB * 3),
            (false, "xFoo-Bar Baz", "foo-b", 1, 6, M * 5 + BC * FCM + BC * 2 + BN + BB),
            (true, "fooBarbaz", "oBz", 2, 9, M * 3 + BC + GS + GE * 3),
            (true, "Foo/Bar/Baz", "FBB", 0, 9, M * 3 + BB * (FCM + 2) + GS * 2 + GE * 4),
            (true, "FooBarBaz", "FBB", 0, 7, M * 3 + BB * FCM + BC * 2 + GS * 2 + GE * 2),
            (true, "FooBar Baz", "FooB", 0, 4, M * 4 + BB * FCM + BB * 2 + BC.max(BB)),
            (true, "foo-bar", "o-ba", 2, 6, M * 4 + BB * 3),
            (true, "fooBarbaz", "oBZ", -1, -1, 0),
            (true, "Foo Bar Baz", "fbb", -1, -1, 0),
            (true, "fooBarbaz", "fooBarbazz", -1, -1, 0),
        ]
    }

    #[test]
    fn test_fuzzy_match_reference_vectors() {
        for matcher in [Matcher::FuzzyV1, Matcher::FuzzyV2] {
            for forward in [true, false] {
                for (case_sensitive, input, pattern, sidx, eidx, score) in fuzzy_cases() {
                    assert_eq!(
                        run(matcher, case_sensitive, false, forward, input, pattern),
                        (sidx, eidx, score),
                        "{matcher:?} input={input} pattern={pattern} forward={forward}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_fuzzy_match_v1_backward() {
        assert_eq!(
            run(Matcher::FuzzyV1, false, false, true, "foobar fb", "fb"),
            (0, 4, M * 2 + BB * FCM + GS + GE)
        );
        assert_eq!(
            run(Matcher::FuzzyV1, false, false, false, "foobar fb", "fb"),
            (7, 9, M * 2 + BB * FCM + BB)
        );
    }

    #[test]
    fn test_empty_pattern() {
        for forward in [true, false] {
            assert_eq!(
                run(Matcher::FuzzyV1, true, false, forward, "foobar", ""),
                (0, 0, 0)
            );
            assert_eq!(
                run(Matcher::FuzzyV2, true, false, forward, "foobar", ""),
                (0, 0, 0)
            );
        }
    }

    #[test]
    fn test_normalized_matches() {
        for matcher in [Matcher::FuzzyV1, Matcher::FuzzyV2] {
            assert_eq!(
                run(matcher, false, true, true, "Só Danço Samba", "So"),
                (0, 2, 56)
            );
            assert_eq!(
                run(matcher, false, true, true, "Só Danço Samba", "sodc"),
                (0, 7, 89)
            );
            assert_eq!(
                run(matcher, false, true, true, "Danço", "danco"),
                (0, 5, 128)
            );
        }
    }

    #[test]
    fn test_long_text_without_slab() {
        let mut text = vec!['x'; 65535 * 2];
        text[65535] = 'z';
        let pattern = str_to_runes("zx");
        let opts = MatchOptions {
            case_sensitive: true,
            ..MatchOptions::default()
        };
        let (span, pos) = fuzzy_match_v2(opts, &text, &pattern, None);
        assert_eq!(pos, Some(vec![65535, 65536]));
        assert_eq!(span.score, M * 2 + BCON);
    }

    #[test]
    fn test_single_char_pattern_prefers_boundary() {
        let text = str_to_runes("abc_b");
        let pattern = str_to_runes("b");
        let forward = fuzzy_match_v2(MatchOptions::default(), &text, &pattern, None);
        assert_eq!(forward.0, MatchSpan::new(4, 5, M + BB * FCM));
        assert_eq!(forward.1, Some(vec![4]));

        let text = str_to_runes("b_b");
        let backward = fuzzy_match_v2(
            MatchOptions {
                forward: false,
                ..MatchOptions::default()
            },
            &text,
            &pattern,
            None,
        );
        assert_eq!(backward.0.start, 2);
    }

    #[test]
    fn test_multi_code_point_lowercase_keeps_first() {
        for matcher in [Matcher::FuzzyV1, Matcher::FuzzyV2] {
            assert_eq!(
                run(matcher, false, false, true, "İstanbul", "ist"),
                (0, 3, M * 3 + BB * FCM + BB * 2),
                "{matcher:?}"
            );
        }
    }

    #[test]
    fn test_span_without_positions_starts_at_first_occurrence() {
        let text = str_to_runes("a_xab");
        let pattern = str_to_runes("ab");
        let opts = MatchOptions {
            with_positions: false,
            ..MatchOptions::default()
        };
        let (span, pos) = fuzzy_match_v2(opts, &text, &pattern, None);
        assert!(pos.is_none());
        assert_eq!(span.start, 0);
        assert_eq!(span.end, 5);
    }

    #[test]
    fn test_small_slab_falls_back_transparently() {
        let cases = [
            ("/AutomatorDocument.icns", "rdoc"),
            ("foo bar baz", "fbb"),
            ("/.oh-my-zsh/cache", "zshc"),
        ];
        for (input, pattern) in cases {
            let text = str_to_runes(input);
            let pattern = str_to_runes(pattern);
            let opts = MatchOptions::default();

            let mut big = Slab::default();
            let mut tiny = Slab::new(4, 4);
            let (full, _) = fuzzy_match_v2(opts, &text, &pattern, Some(&mut big));
            let (fallback, _) = fuzzy_match_v2(opts, &text, &pattern, Some(&mut tiny));
            let (greedy, _) = fuzzy_match_v1(opts, &text, &pattern, None);
            assert_eq!(full.score, fallback.score, "{input}");
            assert_eq!(fallback, greedy, "{input}");
        }
    }

    #[test]
    fn test_slab_reuse_gives_identical_results() {
        let mut slab = Slab::default();
        let opts = MatchOptions::default();
        let first_text = str_to_runes("/AutomatorDocument.icns");
        let first = fuzzy_match_v2(opts, &first_text, &str_to_runes("rdoc"), Some(&mut slab));
        let other = str_to_runes("xFoo-Bar Baz");
        let _ = fuzzy_match_v2(opts, &other, &str_to_runes("foo-b"), Some(&mut slab));
        let again = fuzzy_match_v2(opts, &first_text, &str_to_runes("rdoc"), Some(&mut slab));
        let unbacked = fuzzy_match_v2(opts, &first_text, &str_to_runes("rdoc"), None);
        assert_eq!(first, again);
        assert_eq!(first, unbacked);
    }
}
