use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::Record;

/// Sum `collection_amount` per key. NaN amounts are skipped, but their
/// group still appears.
///
/// Keys come back sorted, and each group is summed in dataset order, so the
/// same input always produces bit-identical totals.
pub fn sum_by<'a, K, I, F>(rows: I, key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    I: IntoIterator<Item = &'a Record>,
    F: Fn(&Record) -> K,
{
    let mut groups = BTreeMap::new();
    for r in rows {
        let total = groups.entry(key(r)).or_insert(0.0);
        if !r.collection_amount.is_nan() {
            *total += r.collection_amount;
        }
    }
    groups
}

/// Totally ordered wrapper so coordinates can take part in a group key.
#[derive(Clone, Copy, Debug)]
pub struct Coord(pub f64);

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coord {}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::record;

    #[test]
    fn sums_per_sorted_key() {
        let rows = vec![
            record("IVA", 2024, "Enero", "Veracruz", 5.0),
            record("IVA", 2024, "Enero", "Altamira", 1.0),
            record("IVA", 2024, "Enero", "Veracruz", 2.5),
        ];
        let g = sum_by(&rows, |r| r.customs_office.clone());
        let got: Vec<(String, f64)> = g.into_iter().collect();
        assert_eq!(
            got,
            vec![("Altamira".to_string(), 1.0), ("Veracruz".to_string(), 7.5)]
        );
    }

    #[test]
    fn nan_amounts_are_skipped() {
        let mut bad = record("IVA", 2024, "Enero", "Tuxpan", 0.0);
        bad.collection_amount = f64::NAN;
        let rows = vec![record("IVA", 2024, "Enero", "Tuxpan", 3.0), bad.clone(), {
            let mut only_nan = bad;
            only_nan.customs_office = "Ensenada".into();
            only_nan
        }];
        let g = sum_by(&rows, |r| r.customs_office.clone());
        assert_eq!(g["Tuxpan"], 3.0);
        assert_eq!(g["Ensenada"], 0.0);
    }

    #[test]
    fn coordinates_group_exactly() {
        assert_eq!(Coord(19.5), Coord(19.5));
        assert!(Coord(-99.1) < Coord(-99.0));
    }
}
