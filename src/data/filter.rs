use std::fmt;

use super::model::HouseRecord;

// ---------------------------------------------------------------------------
// Filter criteria: one immutable snapshot of the user's thresholds
// ---------------------------------------------------------------------------

/// Thresholds for one filter request.
///
/// The three mandatory bounds are always part of the conjunction. An optional
/// bound set to `None` is left out of the conjunction entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub max_price: u32,
    pub min_year: i32,
    pub min_quality: u8,
    pub exact_bedrooms: Option<u32>,
    pub exact_garage: Option<u32>,
    pub min_lot_area: Option<u32>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            max_price: 250_000,
            min_year: 2000,
            min_quality: 5,
            exact_bedrooms: None,
            exact_garage: None,
            min_lot_area: None,
        }
    }
}

/// One term of the conjunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    MaxPrice(u32),
    MinYear(i32),
    MinQuality(u8),
    Bedrooms(u32),
    Garage(u32),
    MinLotArea(u32),
}

impl Clause {
    pub fn matches(&self, record: &HouseRecord) -> bool {
        match *self {
            Clause::MaxPrice(v) => record.sale_price <= v,
            Clause::MinYear(v) => record.year_built >= v,
            Clause::MinQuality(v) => record.overall_quality >= v,
            Clause::Bedrooms(v) => record.bedrooms_above_grade == v,
            Clause::Garage(v) => record.garage_capacity == v,
            Clause::MinLotArea(v) => record.lot_area >= v,
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::MaxPrice(v) => write!(f, "price <= {v}"),
            Clause::MinYear(v) => write!(f, "year >= {v}"),
            Clause::MinQuality(v) => write!(f, "quality >= {v}"),
            Clause::Bedrooms(v) => write!(f, "bedrooms == {v}"),
            Clause::Garage(v) => write!(f, "garage == {v}"),
            Clause::MinLotArea(v) => write!(f, "lot area >= {v}"),
        }
    }
}

impl FilterCriteria {
    /// The clauses that take part in the conjunction, mandatory ones first.
    pub fn active_clauses(&self) -> Vec<Clause> {
        let mut clauses = vec![
            Clause::MaxPrice(self.max_price),
            Clause::MinYear(self.min_year),
            Clause::MinQuality(self.min_quality),
        ];
        clauses.extend(self.exact_bedrooms.map(Clause::Bedrooms));
        clauses.extend(self.exact_garage.map(Clause::Garage));
        clauses.extend(self.min_lot_area.map(Clause::MinLotArea));
        clauses
    }

    /// Whether a record satisfies every active clause.
    pub fn matches(&self, record: &HouseRecord) -> bool {
        self.active_clauses().iter().all(|c| c.matches(record))
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records passing all active clauses, in input order.
pub fn filtered_indices(records: &[HouseRecord], criteria: &FilterCriteria) -> Vec<usize> {
    let clauses = criteria.active_clauses();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| clauses.iter().all(|c| c.matches(r)))
        .map(|(i, _)| i)
        .collect()
}

/// Return the matching records themselves, in input order.
pub fn filter(records: &[HouseRecord], criteria: &FilterCriteria) -> Vec<HouseRecord> {
    filtered_indices(records, criteria)
        .into_iter()
        .map(|i| records[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn scenario() -> Vec<HouseRecord> {
        vec![
            record(100_000, 1990, 5, "NAmes"),
            record(300_000, 2005, 8, "CollgCr"),
            record(600_000, 2015, 9, "NridgHt"),
        ]
    }

    fn varied() -> Vec<HouseRecord> {
        let mut out = Vec::new();
        for i in 0..40u32 {
            let mut r = record(
                80_000 + i * 17_000,
                1950 + (i as i32 * 7) % 70,
                (1 + i % 10) as u8,
                if i % 2 == 0 { "OldTown" } else { "Gilbert" },
            );
            r.bedrooms_above_grade = i % 5;
            r.garage_capacity = i % 4;
            r.lot_area = 4000 + (i * 613) % 12_000;
            out.push(r);
        }
        out
    }

    #[test]
    fn three_record_scenario_selects_middle() {
        let criteria = FilterCriteria {
            max_price: 400_000,
            min_year: 2000,
            min_quality: 6,
            ..FilterCriteria::default()
        };
        let result = filter(&scenario(), &criteria);
        assert_eq!(result, vec![scenario()[1].clone()]);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let criteria = FilterCriteria {
            max_price: 50_000,
            ..FilterCriteria::default()
        };
        assert!(filter(&scenario(), &criteria).is_empty());
        assert!(filter(&[], &criteria).is_empty());
    }

    #[test]
    fn predicate_is_exact() {
        let records = varied();
        let criteria = FilterCriteria {
            max_price: 500_000,
            min_year: 1970,
            min_quality: 3,
            exact_bedrooms: Some(2),
            exact_garage: None,
            min_lot_area: Some(6000),
        };
        let idx = filtered_indices(&records, &criteria);
        for (i, r) in records.iter().enumerate() {
            let expected = r.sale_price <= 500_000
                && r.year_built >= 1970
                && r.overall_quality >= 3
                && r.bedrooms_above_grade == 2
                && r.lot_area >= 6000;
            assert_eq!(idx.contains(&i), expected, "record {i}: {r:?}");
        }
    }

    #[test]
    fn dropping_an_optional_clause_only_widens() {
        let records = varied();
        let base = FilterCriteria {
            max_price: 700_000,
            min_year: 1950,
            min_quality: 1,
            ..FilterCriteria::default()
        };
        for garage in 0..4 {
            let with = filtered_indices(
                &records,
                &FilterCriteria {
                    exact_garage: Some(garage),
                    ..base
                },
            );
            let without = filtered_indices(&records, &base);
            assert!(with.iter().all(|i| without.contains(i)));
        }
        for bedrooms in 0..5 {
            let with = filtered_indices(
                &records,
                &FilterCriteria {
                    exact_bedrooms: Some(bedrooms),
                    ..base
                },
            );
            let without = filtered_indices(&records, &base);
            assert!(with.iter().all(|i| without.contains(i)));
        }
    }

    #[test]
    fn result_keeps_input_order() {
        let records = varied();
        let criteria = FilterCriteria {
            max_price: 1_000_000,
            min_year: 1800,
            min_quality: 1,
            ..FilterCriteria::default()
        };
        let idx = filtered_indices(&records, &criteria);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(idx.len(), records.len());
    }

    #[test]
    fn absent_optionals_are_not_clauses() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.active_clauses().len(), 3);
        let criteria = FilterCriteria {
            exact_bedrooms: Some(0),
            ..criteria
        };
        assert_eq!(criteria.active_clauses().len(), 4);
        assert_eq!(criteria.active_clauses()[3], Clause::Bedrooms(0));
    }
}
