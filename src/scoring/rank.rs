/// Rank every score: 1 + the number of scores strictly greater.
///
/// Equal scores share a rank and the ranks after a tie are skipped,
/// so `[90, 80, 80, 70]` ranks as `[1, 2, 2, 4]`. The result is aligned
/// with the input and does not depend on input order.
pub fn min_ranks(scores: &[f64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut ranks = vec![0u32; scores.len()];
    let mut previous: Option<(f64, u32)> = None;
    for (position, &index) in order.iter().enumerate() {
        let score = scores[index];
        let rank = match previous {
            Some((prev_score, prev_rank)) if prev_score == score => prev_rank,
            _ => position as u32 + 1,
        };
        ranks[index] = rank;
        previous = Some((score, rank));
    }
    ranks
}
