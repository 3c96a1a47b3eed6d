//! Simplified hand ranking.
//!
//! Ranks the whole pool of cards a player can see (hole cards plus community
//! cards) rather than the best five-card subset. Scores fall into fixed
//! category tiers with no kicker resolution:
//!
//! | score | category        |
//! |-------|-----------------|
//! | 8000  | straight flush  |
//! | 7000  | four of a kind  |
//! | 6000  | full house      |
//! | 5000  | flush           |
//! | 4000  | straight        |
//! | 3000  | three of a kind |
//! | 2000  | two pair        |
//! | 1000  | one pair        |
//! | 2-14  | high card value |
//!
//! Known deviations from a full evaluator, kept deliberately: the ace never
//! plays low (A-2-3-4-5 scores as ace high), a paired card inside a straight
//! window can mask the straight, and "straight flush" only requires that a
//! flush and a straight both exist somewhere in the pool.

use std::collections::HashMap;

use holdem_protocol::{Card, Suit};

const STRAIGHT_FLUSH: u32 = 8000;
const FOUR_OF_A_KIND: u32 = 7000;
const FULL_HOUSE: u32 = 6000;
const FLUSH: u32 = 5000;
const STRAIGHT: u32 = 4000;
const THREE_OF_A_KIND: u32 = 3000;
const TWO_PAIR: u32 = 2000;
const ONE_PAIR: u32 = 1000;

/// Score a pool of cards. Higher is better.
pub fn rank_hand(cards: &[Card]) -> u32 {
    if cards.is_empty() {
        return 0;
    }

    let mut values: Vec<u8> = cards.iter().map(Card::value).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let mut suit_counts: HashMap<Suit, usize> = HashMap::new();
    for card in cards {
        *suit_counts.entry(card.suit).or_default() += 1;
    }
    let is_flush = suit_counts.values().any(|&n| n >= 5);

    // Five consecutive descending values anywhere in the sorted list.
    let is_straight = values
        .windows(5)
        .any(|window| window[0] - window[4] == 4);

    let mut value_counts: HashMap<u8, usize> = HashMap::new();
    for &value in &values {
        *value_counts.entry(value).or_default() += 1;
    }
    let mut counts: Vec<usize> = value_counts.into_values().collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));

    let top = counts[0];
    let second = counts.get(1).copied().unwrap_or(0);

    if is_flush && is_straight {
        STRAIGHT_FLUSH
    } else if top == 4 {
        FOUR_OF_A_KIND
    } else if top == 3 && second >= 2 {
        FULL_HOUSE
    } else if is_flush {
        FLUSH
    } else if is_straight {
        STRAIGHT
    } else if top == 3 {
        THREE_OF_A_KIND
    } else if top == 2 && second == 2 {
        TWO_PAIR
    } else if top == 2 {
        ONE_PAIR
    } else {
        u32::from(values[0])
    }
}
