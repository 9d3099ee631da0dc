use crate::domain::model::Participant;
use std::collections::{HashMap, HashSet};

/// Number of participants whose name is shared with at least one other.
pub fn count_duplicates(roster: &[Participant]) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for p in roster {
        *counts.entry(p.name.as_str()).or_default() += 1;
    }
    roster.iter().filter(|p| counts[p.name.as_str()] > 1).count()
}

/// Keeps the first participant for each name, in original order.
pub fn dedupe_by_name(roster: &[Participant]) -> Vec<Participant> {
    let mut seen = HashSet::new();
    roster
        .iter()
        .filter(|p| seen.insert(p.name.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn extend(&mut self, participants: impl IntoIterator<Item = Participant>) -> usize {
        let before = self.participants.len();
        self.participants.extend(participants);
        self.participants.len() - before
    }

    pub fn add_names<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend(names.into_iter().map(Participant::new))
    }

    /// Returns the removed participant, if the id was present.
    pub fn remove(&mut self, id: &str) -> Option<Participant> {
        let pos = self.participants.iter().position(|p| p.id == id)?;
        Some(self.participants.remove(pos))
    }

    pub fn clear(&mut self) {
        self.participants.clear();
    }

    pub fn duplicate_count(&self) -> usize {
        count_duplicates(&self.participants)
    }

    /// Drops later occurrences of repeated names; returns how many were dropped.
    pub fn dedupe(&mut self) -> usize {
        let before = self.participants.len();
        self.participants = dedupe_by_name(&self.participants);
        before - self.participants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str, name: &str) -> Participant {
        Participant {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_in_order() {
        let roster = vec![p("1", "Tom"), p("2", "Tom"), p("3", "Ana")];
        assert_eq!(dedupe_by_name(&roster), vec![p("1", "Tom"), p("3", "Ana")]);
    }

    #[test]
    fn test_dedupe_preserves_order_not_sorted() {
        let roster = vec![p("1", "Zed"), p("2", "Amy"), p("3", "Zed"), p("4", "Bob")];
        let names: Vec<_> = dedupe_by_name(&roster)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Zed", "Amy", "Bob"]);
    }

    #[test]
    fn test_count_duplicates_counts_every_member_of_a_repeat() {
        let roster = vec![p("1", "Tom"), p("2", "Tom"), p("3", "Ana"), p("4", "Tom")];
        assert_eq!(count_duplicates(&roster), 3);
        assert_eq!(count_duplicates(&[p("1", "Solo")]), 0);
        assert_eq!(count_duplicates(&[]), 0);
    }

    #[test]
    fn test_roster_add_remove_clear() {
        let mut roster = Roster::default();
        assert_eq!(roster.add_names(["Ana", "Bo", "Ana"]), 3);
        assert_eq!(roster.duplicate_count(), 2);

        let id = roster.participants()[1].id.clone();
        assert_eq!(roster.remove(&id).map(|p| p.name), Some("Bo".to_string()));
        assert!(roster.remove(&id).is_none());

        assert_eq!(roster.dedupe(), 1);
        assert_eq!(roster.len(), 1);

        roster.clear();
        assert!(roster.is_empty());
    }

    #[test]
    fn test_add_names_generates_unique_ids() {
        let mut roster = Roster::default();
        roster.add_names(["Tom", "Tom"]);
        let ids: HashSet<_> = roster.participants().iter().map(|p| &p.id).collect();
        assert_eq!(ids.len(), 2);
    }
}
