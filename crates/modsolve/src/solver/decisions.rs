use super::pool::PackageId;
use super::rule::Literal;

/// Tracks decisions made during SAT solving.
///
/// The decision_map stores: 0 = undecided, >0 = selected at level N-1,
/// <0 = not selected at level N-1. Level 0 holds assumptions and what they
/// imply.
#[derive(Debug)]
pub struct Decisions {
    decision_map: Vec<i32>,

    /// Decisions in the order they were made
    decision_queue: Vec<Literal>,

    level: u32,
}

impl Decisions {
    /// Create a decisions tracker for package ids `1..=max_package_id`
    pub fn with_capacity(max_package_id: usize) -> Self {
        Self {
            decision_map: vec![0; max_package_id + 1],
            decision_queue: Vec::with_capacity(max_package_id),
            level: 0,
        }
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn increment_level(&mut self) {
        self.level += 1;
    }

    /// Make a decision at the current level
    ///
    /// Returns false if this conflicts with an existing decision
    pub fn decide(&mut self, literal: Literal) -> bool {
        let id = literal.unsigned_abs() as usize;
        if id >= self.decision_map.len() {
            self.decision_map.resize(id + 1, 0);
        }

        let existing = self.decision_map[id];
        if existing != 0 {
            return (existing > 0) == (literal > 0);
        }

        // Store level+1 so that level 0 doesn't become 0 (which means undecided)
        let level_value = (self.level + 1) as i32;
        self.decision_map[id] = if literal > 0 { level_value } else { -level_value };
        self.decision_queue.push(literal);

        true
    }

    /// Check if a literal is satisfied by current decisions
    #[inline]
    pub fn satisfied(&self, literal: Literal) -> bool {
        match self.decision_map.get(literal.unsigned_abs() as usize) {
            Some(&decision) if decision != 0 => (decision > 0) == (literal > 0),
            _ => false,
        }
    }

    /// Check if a literal conflicts with current decisions
    #[inline]
    pub fn conflict(&self, literal: Literal) -> bool {
        match self.decision_map.get(literal.unsigned_abs() as usize) {
            Some(&decision) if decision != 0 => (decision > 0) != (literal > 0),
            _ => false,
        }
    }

    #[inline]
    pub fn undecided(&self, package_id: PackageId) -> bool {
        self.decision_map
            .get(package_id as usize)
            .map(|&d| d == 0)
            .unwrap_or(true)
    }

    /// Get the decision level for a literal/package
    pub fn decision_level(&self, literal: Literal) -> Option<u32> {
        match self.decision_map.get(literal.unsigned_abs() as usize) {
            Some(&decision) if decision != 0 => Some(decision.unsigned_abs() - 1),
            _ => None,
        }
    }

    /// Revert all decisions at levels > target_level
    pub fn revert_to_level(&mut self, target_level: u32) {
        while let Some(&literal) = self.decision_queue.last() {
            match self.decision_level(literal) {
                Some(level) if level > target_level => {
                    self.decision_map[literal.unsigned_abs() as usize] = 0;
                    self.decision_queue.pop();
                }
                _ => break,
            }
        }
        self.level = target_level;
    }

    /// Selected package ids
    pub fn installed(&self) -> Vec<PackageId> {
        self.decision_queue
            .iter()
            .copied()
            .filter(|&literal| literal > 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_and_query() {
        let mut decisions = Decisions::with_capacity(3);
        assert!(decisions.decide(1));
        assert!(decisions.decide(-2));

        assert!(decisions.satisfied(1));
        assert!(decisions.conflict(-1));
        assert!(decisions.satisfied(-2));
        assert!(decisions.conflict(2));
        assert!(decisions.undecided(3));

        assert!(decisions.decide(1));
        assert!(!decisions.decide(2));
        assert_eq!(decisions.installed(), vec![1]);
    }

    #[test]
    fn test_revert_to_level() {
        let mut decisions = Decisions::with_capacity(4);
        decisions.decide(1);
        decisions.increment_level();
        decisions.decide(-2);
        decisions.decide(3);
        decisions.increment_level();
        decisions.decide(4);

        assert_eq!(decisions.decision_level(3), Some(1));
        decisions.revert_to_level(1);
        assert!(decisions.undecided(4));
        assert!(decisions.satisfied(3));
        assert_eq!(decisions.level(), 1);

        decisions.revert_to_level(0);
        assert!(decisions.undecided(2));
        assert!(decisions.undecided(3));
        assert!(decisions.satisfied(1));
        assert_eq!(decisions.installed(), vec![1]);
    }
}
