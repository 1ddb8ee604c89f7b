use std::collections::BTreeMap;

use crate::core::types::Classification;

/// Contig id -> assigned output name
pub type NameMap = BTreeMap<String, String>;

/// Hands out `chromosome{n}` and `plasmid{n}` names, each counter starting at 1
#[derive(Debug, Clone)]
pub struct Namer {
    chromosome_count: usize,
    plasmid_count: usize,
}

impl Default for Namer {
    fn default() -> Self {
        Self {
            chromosome_count: 1,
            plasmid_count: 1,
        }
    }
}

impl Namer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next name for a circular contig; `None` for linear contigs, which keep their id
    pub fn next_name(&mut self, classification: Classification) -> Option<String> {
        let counter = match classification {
            Classification::Chromosome => &mut self.chromosome_count,
            Classification::Plasmid => &mut self.plasmid_count,
            Classification::Linear => return None,
        };
        let prefix = classification.name_prefix()?;
        let name = format!("{prefix}{counter}");
        *counter += 1;
        Some(name)
    }
}

/// Name circularisable contigs in ascending id order.
///
/// Contigs for which `has_origin` is true become chromosomes, the rest plasmids.
#[must_use]
pub fn assign_names<S, F>(ids: &[S], has_origin: F) -> NameMap
where
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    let mut sorted: Vec<&str> = ids.iter().map(|s| s.as_ref()).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut namer = Namer::new();
    let mut names = NameMap::new();
    for id in sorted {
        let classification = if has_origin(id) {
            Classification::Chromosome
        } else {
            Classification::Plasmid
        };
        if let Some(name) = namer.next_name(classification) {
            names.insert(id.to_string(), name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_sorted_id_order() {
        let ids = ["c3", "c1", "c2"];
        let names = assign_names(&ids, |id| id == "c1" || id == "c3");

        assert_eq!(names.len(), 3);
        assert_eq!(names["c1"], "chromosome1");
        assert_eq!(names["c2"], "plasmid1");
        assert_eq!(names["c3"], "chromosome2");
    }

    #[test]
    fn test_counters_are_independent() {
        let ids = vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
        ];
        let names = assign_names(&ids, |id| id == "c");

        assert_eq!(names["a"], "plasmid1");
        assert_eq!(names["b"], "plasmid2");
        assert_eq!(names["c"], "chromosome1");
        assert_eq!(names["d"], "plasmid3");
    }

    #[test]
    fn test_lexicographic_not_numeric_order() {
        let names = assign_names(&["ctg10", "ctg9", "ctg2"], |_| false);
        assert_eq!(names["ctg10"], "plasmid1");
        assert_eq!(names["ctg2"], "plasmid2");
        assert_eq!(names["ctg9"], "plasmid3");
    }

    #[test]
    fn test_linear_contigs_get_no_name() {
        let mut namer = Namer::new();
        assert_eq!(namer.next_name(Classification::Linear), None);
        assert_eq!(
            namer.next_name(Classification::Plasmid).as_deref(),
            Some("plasmid1")
        );
    }

    #[test]
    fn test_empty_input() {
        let ids: [&str; 0] = [];
        assert!(assign_names(&ids, |_| true).is_empty());
    }
}
