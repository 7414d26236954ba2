use super::pool::Pool;
use super::rule::Rule;
use super::rule_set::RuleSet;

/// Encodes the candidates of a pool and their hard links as clauses
pub struct RuleGenerator<'a> {
    pool: &'a Pool,
}

impl<'a> RuleGenerator<'a> {
    pub fn new(pool: &'a Pool) -> Self {
        Self { pool }
    }

    pub fn generate(&self) -> RuleSet {
        let mut rules = RuleSet::new();
        self.add_name_rules(&mut rules);
        self.add_package_rules(&mut rules);

        log::debug!(
            "Generated {} rule(s) for {} candidate(s)",
            rules.len(),
            self.pool.len()
        );
        rules
    }

    /// Exactly one candidate for mandatory ids, at most one for optional ones
    fn add_name_rules(&self, rules: &mut RuleSet) {
        for (name, ids) in self.pool.names() {
            if self.pool.is_mandatory(name) {
                rules.add(Rule::require_one(ids.to_vec()).with_target(name));
            }

            for (i, &a) in ids.iter().enumerate() {
                for &b in &ids[i + 1..] {
                    rules.add(Rule::same_name(a, b).with_target(name));
                }
            }
        }
    }

    fn add_package_rules(&self, rules: &mut RuleSet) {
        for package_id in self.pool.package_ids() {
            let Some(candidate) = self.pool.candidate(package_id) else {
                continue;
            };
            let metadata = candidate.metadata();

            for link in &metadata.depends {
                let providers = self.pool.what_provides(link, package_id);
                if providers.is_empty() {
                    log::trace!("{} has no candidate for {}", candidate, link);
                }
                rules.add(Rule::requires(package_id, providers).with_link(link));
            }

            for link in &metadata.breaks {
                for other in self.pool.what_provides(link, package_id) {
                    rules.add(Rule::breaks(package_id, other).with_link(link));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{Candidate, Link, LinkKind, Origin, PackageMetadata};
    use crate::solver::RuleType;
    use std::sync::Arc;

    fn add(pool: &mut Pool, metadata: PackageMetadata, mandatory: bool) {
        let origin = Origin::builtin(&metadata.pretty_string());
        pool.add(Arc::new(Candidate::new(metadata, origin, 0)), mandatory);
    }

    #[test]
    fn test_clause_shapes() {
        let mut pool = Pool::new();
        add(
            &mut pool,
            PackageMetadata::new("a", "1.0")
                .with_link(Link::parse("a", "b", &[">=1.0"], LinkKind::Depends).unwrap())
                .with_link(Link::parse("a", "c", &["*"], LinkKind::Breaks).unwrap())
                .with_link(Link::parse("a", "z", &["*"], LinkKind::Depends).unwrap()),
            true,
        );
        add(&mut pool, PackageMetadata::new("b", "2.0"), false);
        add(&mut pool, PackageMetadata::new("b", "1.0"), false);
        add(&mut pool, PackageMetadata::new("c", "1.0"), false);

        let rules = RuleGenerator::new(&pool).generate();
        let of_type = |rule_type: RuleType| -> Vec<&Rule> {
            rules.iter().filter(|r| r.rule_type() == rule_type).collect()
        };

        let require_one = of_type(RuleType::RequireOne);
        assert_eq!(require_one.len(), 1);
        assert_eq!(require_one[0].literals(), &[1]);
        assert_eq!(require_one[0].target_name(), Some("a"));

        let same_name = of_type(RuleType::SameName);
        assert_eq!(same_name.len(), 1);
        assert_eq!(same_name[0].literals(), &[-2, -3]);

        let requires = of_type(RuleType::PackageRequires);
        assert_eq!(requires.len(), 2);
        assert_eq!(requires[0].literals(), &[-1, 2, 3]);
        assert_eq!(requires[1].literals(), &[-1]);
        assert_eq!(requires[1].target_name(), Some("z"));
        assert_eq!(requires[1].link().unwrap().constraint, "*");

        let breaks = of_type(RuleType::PackageBreaks);
        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].source_package(), Some(1));
        assert_eq!(breaks[0].literals(), &[-1, -4]);
    }
}
