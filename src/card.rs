/// Face value of a Skyjo card.
pub type CardValue = i8;

pub const MIN_CARD_VALUE: CardValue = -2;
pub const MAX_CARD_VALUE: CardValue = 12;
/// Number of distinct face values in `MIN_CARD_VALUE..=MAX_CARD_VALUE`.
pub const VALUE_COUNT: usize = (MAX_CARD_VALUE - MIN_CARD_VALUE + 1) as usize;
pub const STANDARD_CARD_COUNT: usize = 150;
pub const DEFAULT_ROWS: usize = 3;
pub const DEFAULT_COLS: usize = 4;
pub const DEFAULT_PLAYERS: usize = 4;
pub const DEFAULT_INITIAL_VISIBLE: usize = 2;

/// Value shown for face-down cells in observations. Lower than any real card.
pub const HIDDEN_SENTINEL: CardValue = MIN_CARD_VALUE - 1;

#[inline]
pub fn in_domain(value: CardValue) -> bool {
    (MIN_CARD_VALUE..=MAX_CARD_VALUE).contains(&value)
}

#[inline]
fn slot(value: CardValue) -> usize {
    debug_assert!(in_domain(value));
    (value - MIN_CARD_VALUE) as usize
}

/// Copies of each face value making up a pile of `n_cards`, indexed by `value - MIN_CARD_VALUE`.
///
/// 150 cards gives the boxed game: five -2s, ten -1s, fifteen 0s and ten of every
/// value from 1 to 12. Any other count repeats the whole domain uniformly and pads
/// the remainder with zeros.
pub fn card_counts(n_cards: usize) -> [usize; VALUE_COUNT] {
    if n_cards == STANDARD_CARD_COUNT {
        let mut counts = [10; VALUE_COUNT];
        counts[slot(-2)] = 5;
        counts[slot(0)] = 15;
        counts
    } else {
        let mut counts = [n_cards / VALUE_COUNT; VALUE_COUNT];
        counts[slot(0)] += n_cards % VALUE_COUNT;
        counts
    }
}

/// Unshuffled pile in ascending value order.
pub fn full_pile(n_cards: usize) -> Vec<CardValue> {
    pile_from_counts(&card_counts(n_cards))
}

pub(crate) fn pile_from_counts(counts: &[usize; VALUE_COUNT]) -> Vec<CardValue> {
    let mut pile = Vec::with_capacity(counts.iter().sum());
    for (offset, &count) in counts.iter().enumerate() {
        let value = MIN_CARD_VALUE + offset as CardValue;
        pile.extend(std::iter::repeat(value).take(count));
    }
    pile
}

/// Removes one copy of `value` from `counts`. Returns false when none is left.
pub(crate) fn take_from_counts(counts: &mut [usize; VALUE_COUNT], value: CardValue) -> bool {
    if !in_domain(value) {
        return false;
    }
    let remaining = &mut counts[slot(value)];
    if *remaining == 0 {
        return false;
    }
    *remaining -= 1;
    true
}

/// Mean face value of a pile of `n_cards`; the expected value of a card nobody has seen.
pub fn mean_card_value(n_cards: usize) -> f64 {
    let counts = card_counts(n_cards);
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let sum: i64 = counts
        .iter()
        .enumerate()
        .map(|(offset, &count)| (MIN_CARD_VALUE as i64 + offset as i64) * count as i64)
        .sum();
    sum as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_distribution_matches_box_contents() {
        let counts = card_counts(STANDARD_CARD_COUNT);
        assert_eq!(counts[0], 5);
        assert_eq!(counts[1], 10);
        assert_eq!(counts[2], 15);
        assert!(counts[3..].iter().all(|&c| c == 10));
        assert_eq!(full_pile(STANDARD_CARD_COUNT).len(), 150);
    }

    #[test]
    fn custom_distribution_pads_with_zeros() {
        // 32 = 2 * 15 + 2
        let counts = card_counts(32);
        assert_eq!(counts.iter().sum::<usize>(), 32);
        assert_eq!(counts[slot(0)], 4);
        assert_eq!(counts[slot(7)], 2);
    }

    #[test]
    fn standard_mean_is_about_five() {
        let mean = mean_card_value(STANDARD_CARD_COUNT);
        assert!((mean - 5.0667).abs() < 1e-3, "mean was {mean}");
    }

    #[test]
    fn take_from_counts_refuses_exhausted_and_foreign_values() {
        let mut counts = card_counts(STANDARD_CARD_COUNT);
        for _ in 0..5 {
            assert!(take_from_counts(&mut counts, -2));
        }
        assert!(!take_from_counts(&mut counts, -2));
        assert!(!take_from_counts(&mut counts, 13));
        assert!(!take_from_counts(&mut counts, HIDDEN_SENTINEL));
    }
}
