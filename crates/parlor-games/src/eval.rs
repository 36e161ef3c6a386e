//! Poker hand evaluation: rank five cards, or pick the best five of seven.

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Standard hand categories, weakest first so the derived ordering is
/// the poker ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Quads,
    StraightFlush,
}

/// A fully comparable hand strength.
///
/// `tiebreak` holds card values in decision order for the category:
/// primary group ranks descending, then kickers descending. Two hands
/// compare by category first, then lexicographically on the tiebreak,
/// which is exactly the poker tie-break rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandRank {
    pub category: HandCategory,
    pub tiebreak: Vec<u8>,
}

/// Ranks exactly five cards.
pub fn evaluate_five(cards: &[Card]) -> HandRank {
    debug_assert_eq!(cards.len(), 5);

    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = straight_high(&values);

    // Count multiplicities: (count, value) sorted by count desc, value desc.
    let mut groups: Vec<(u8, u8)> = Vec::new();
    for &v in &values {
        match groups.iter_mut().find(|(_, gv)| *gv == v) {
            Some((count, _)) => *count += 1,
            None => groups.push((1, v)),
        }
    }
    groups.sort_unstable_by(|a, b| b.cmp(a));

    match (is_flush, straight_high, groups[0].0) {
        (true, Some(high), _) => HandRank {
            category: HandCategory::StraightFlush,
            tiebreak: vec![high],
        },
        (_, _, 4) => HandRank {
            category: HandCategory::Quads,
            tiebreak: vec![groups[0].1, groups[1].1],
        },
        (_, _, 3) if groups[1].0 == 2 => HandRank {
            category: HandCategory::FullHouse,
            tiebreak: vec![groups[0].1, groups[1].1],
        },
        (true, None, _) => HandRank {
            category: HandCategory::Flush,
            tiebreak: values,
        },
        (false, Some(high), _) => HandRank {
            category: HandCategory::Straight,
            tiebreak: vec![high],
        },
        (_, _, 3) => HandRank {
            category: HandCategory::Trips,
            tiebreak: vec![groups[0].1, groups[1].1, groups[2].1],
        },
        (_, _, 2) if groups[1].0 == 2 => HandRank {
            category: HandCategory::TwoPair,
            tiebreak: vec![groups[0].1, groups[1].1, groups[2].1],
        },
        (_, _, 2) => HandRank {
            category: HandCategory::Pair,
            tiebreak: vec![groups[0].1, groups[1].1, groups[2].1, groups[3].1],
        },
        _ => HandRank {
            category: HandCategory::HighCard,
            tiebreak: values,
        },
    }
}

/// The high card of a straight, if these five values form one.
/// Expects values sorted descending. The wheel (A-5-4-3-2) counts as a
/// five-high straight.
fn straight_high(values: &[u8]) -> Option<u8> {
    let distinct = values.windows(2).all(|w| w[0] != w[1]);
    if !distinct {
        return None;
    }
    if values[0] - values[4] == 4 {
        return Some(values[0]);
    }
    if values == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

/// Picks the strongest five-card hand from five to seven cards.
pub fn best_five_from_seven(cards: &[Card]) -> HandRank {
    debug_assert!((5..=7).contains(&cards.len()));

    let n = cards.len();
    let mut best: Option<HandRank> = None;
    for mask in 0u32..(1 << n) {
        if mask.count_ones() != 5 {
            continue;
        }
        let subset: Vec<Card> = (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| cards[i])
            .collect();
        let rank = evaluate_five(&subset);
        if best.as_ref().is_none_or(|b| rank > *b) {
            best = Some(rank);
        }
    }
    best.expect("at least five cards")
}
