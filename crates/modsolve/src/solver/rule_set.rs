use super::rule::Rule;

/// Collection of SAT rules with sequential ids
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule to the set, returning its ID
    pub fn add(&mut self, mut rule: Rule) -> u32 {
        let id = self.rules.len() as u32;
        rule.set_id(id);
        self.rules.push(rule);
        id
    }

    pub fn get(&self, id: u32) -> Option<&Rule> {
        self.rules.get(id as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
