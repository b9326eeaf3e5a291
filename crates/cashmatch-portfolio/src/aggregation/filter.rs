//! Maturity window selection.

use cashmatch_bonds::Instrument;
use cashmatch_core::Date;

/// Instruments maturing in `[start, end]`, ordered by maturity.
///
/// Instruments without a maturity date are dropped. Ties keep input order.
pub fn filter_bonds_by_maturity(instruments: &[Instrument], start: Date, end: Date) -> Vec<&Instrument> {
    let mut selected: Vec<&Instrument> = instruments
        .iter()
        .filter(|inst| {
            inst.maturity_date
                .is_some_and(|maturity| start <= maturity && maturity <= end)
        })
        .collect();
    selected.sort_by_key(|inst| inst.maturity_date);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn bond(id: &str, maturity: Option<Date>) -> Instrument {
        Instrument {
            id: id.to_string(),
            short_code: None,
            name: None,
            instrument_type: "Bond".to_string(),
            issue_date: Some(d(2015, 1, 1)),
            maturity_date: maturity,
            coupon_rate: Some(4.0),
            first_coupon_date: None,
            last_coupon_date: None,
            stub_hint: None,
        }
    }

    #[test]
    fn test_inclusive_window_sorted() {
        let bonds = vec![
            bond("late", Some(d(2030, 1, 1))),
            bond("edge_end", Some(d(2029, 12, 31))),
            bond("undated", None),
            bond("edge_start", Some(d(2026, 1, 1))),
            bond("early", Some(d(2025, 12, 31))),
        ];

        let selected = filter_bonds_by_maturity(&bonds, d(2026, 1, 1), d(2029, 12, 31));
        let ids: Vec<&str> = selected.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["edge_start", "edge_end"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let bonds = vec![
            bond("b", Some(d(2028, 6, 1))),
            bond("a", Some(d(2028, 6, 1))),
        ];
        let selected = filter_bonds_by_maturity(&bonds, d(2026, 1, 1), d(2030, 1, 1));
        assert_eq!(selected[0].id, "b");
        assert_eq!(selected[1].id, "a");
    }

    #[test]
    fn test_empty_window() {
        let bonds = vec![bond("a", Some(d(2028, 6, 1)))];
        assert!(filter_bonds_by_maturity(&bonds, d(2030, 1, 1), d(2029, 1, 1)).is_empty());
    }
}
