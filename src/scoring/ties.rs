use serde::Serialize;

use super::scorer::ParticipantId;

/// Participants sharing one positive aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TieGroup {
    pub score: f64,
    /// In input order.
    pub participants: Vec<ParticipantId>,
}

/// Tie groups ordered by descending score.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct TieGroups(Vec<TieGroup>);

impl TieGroups {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TieGroup> {
        self.0.iter()
    }

    /// Whether `id` belongs to any group.
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.0.iter().any(|g| g.participants.contains(id))
    }

    /// The group for an exact score, if any.
    pub fn get(&self, score: f64) -> Option<&TieGroup> {
        self.0.iter().find(|g| g.score == score)
    }
}

impl<'a> IntoIterator for &'a TieGroups {
    type Item = &'a TieGroup;
    type IntoIter = std::slice::Iter<'a, TieGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Group participants whose scores are equal and strictly positive.
///
/// Zero scores never form a group, however many entrants share them.
pub fn detect_ties<'a, I>(scores: I) -> TieGroups
where
    I: IntoIterator<Item = (&'a ParticipantId, f64)>,
{
    let mut positive: Vec<(&ParticipantId, f64)> =
        scores.into_iter().filter(|(_, score)| *score > 0.0).collect();
    // Stable, so members keep input order within a score
    positive.sort_by(|a, b| b.1.total_cmp(&a.1));

    let groups = positive
        .chunk_by(|a, b| a.1 == b.1)
        .filter(|chunk| chunk.len() > 1)
        .map(|chunk| TieGroup {
            score: chunk[0].1,
            participants: chunk.iter().map(|(id, _)| (*id).clone()).collect(),
        })
        .collect::<Vec<_>>();

    tracing::debug!(groups = groups.len(), "detected ties");
    TieGroups(groups)
}
