use rand::Rng;

/// Fisher-Yates shuffle: walks from the last index down to 1 and swaps each
/// slot with a uniformly picked slot at or before it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Same as [`shuffle`], but follows the element that started at `tracked`
/// and returns where it ended up.
///
/// Tracking the position through the swaps (instead of searching for the
/// element afterwards) keeps the answer right even when two options have the
/// same text.
pub fn shuffle_tracking<T, R: Rng + ?Sized>(items: &mut [T], tracked: usize, rng: &mut R) -> usize {
    let mut position = tracked;
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
        if position == i {
            position = j;
        } else if position == j {
            position = i;
        }
    }
    position
}
