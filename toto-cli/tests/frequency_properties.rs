use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use proptest::sample::subsequence;

use toto_cli::analysis::{AnalysisError, DateRange, FrequencyAnalyzer, group_frequency};
use toto_db::models::{DrawRecord, Game, GroupCount};
use toto_db::repository::MemoryRepository;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// Tirages valides : 6 numéros distincts dans 1..=49, dates entre 2020 et 2025.
fn draws_strategy(max_len: usize) -> impl Strategy<Value = Vec<DrawRecord>> {
    let universe: Vec<u8> = (1..=49).collect();
    let one = (
        0u64..2000,
        subsequence(universe, 6).prop_shuffle(),
        proptest::option::of(1u8..=49),
    )
        .prop_map(|(offset, numbers, additional)| {
            DrawRecord::new(base_date() + Days::new(offset), numbers, additional)
        });
    proptest::collection::vec(one, 0..max_len)
}

fn assert_no_inversion(results: &[GroupCount]) {
    for pair in results.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.occurrences > b.occurrences
                || (a.occurrences == b.occurrences && a.group < b.group),
            "inversion entre {:?} et {:?}",
            a,
            b
        );
    }
}

proptest! {
    #[test]
    fn single_number_total_is_arity_times_draws(draws in draws_strategy(60)) {
        let results = group_frequency(&draws, 1, 6, usize::MAX).unwrap();
        let total: u64 = results.iter().map(|gc| u64::from(gc.occurrences)).sum();
        prop_assert_eq!(total, 6 * draws.len() as u64);
    }

    #[test]
    fn results_are_ranked(draws in draws_strategy(40), g in 1usize..=6, top in 0usize..50) {
        let results = group_frequency(&draws, g, 6, top).unwrap();
        prop_assert!(results.len() <= top);
        assert_no_inversion(&results);
        for gc in &results {
            prop_assert_eq!(gc.group.len(), g);
            prop_assert!(gc.group.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(gc.occurrences >= 1);
        }
    }

    #[test]
    fn occurrences_match_subset_count(draws in draws_strategy(30), g in 1usize..=3) {
        let results = group_frequency(&draws, g, 6, 20).unwrap();
        for gc in results {
            let expected = draws
                .iter()
                .filter(|d| gc.group.iter().all(|n| d.winning_numbers.contains(n)))
                .count();
            prop_assert_eq!(gc.occurrences as usize, expected);
        }
    }

    #[test]
    fn range_filter_is_idempotent(draws in draws_strategy(40), a in 0u64..2000, b in 0u64..2000) {
        let range = DateRange::new(
            Some(base_date() + Days::new(a.min(b))),
            Some(base_date() + Days::new(a.max(b))),
        );
        let once = range.filter(draws);
        let twice = range.filter(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn end_date_is_inclusive(offset in 0u64..2000) {
        let end = base_date() + Days::new(offset);
        let range = DateRange::new(None, Some(end));
        prop_assert!(range.contains_date(end));
        prop_assert!(!range.contains_date(end + Days::new(1)));
    }
}

#[test]
fn pairs_scenario_through_entry_point() {
    let analyzer = FrequencyAnalyzer::new(MemoryRepository::new(vec![
        DrawRecord::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), vec![1, 2, 3, 4, 5, 6], None),
        DrawRecord::new(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(), vec![1, 2, 3, 4, 5, 7], None),
    ]));

    let top = analyzer.analyze_group_frequency(2, 5).unwrap();
    assert_eq!(top[0], GroupCount { group: vec![1, 2], occurrences: 2 });
    assert_no_inversion(&top);

    let all = analyzer.analyze_group_frequency(2, 100).unwrap();
    let first_single = all.iter().position(|gc| gc.occurrences == 1).unwrap();
    assert_eq!(all[first_single].group, vec![1, 6]);
    assert_eq!(all[first_single + 1].group, vec![1, 7]);
}

#[test]
fn exact_combination_repeated_twice() {
    let repeated = vec![3, 11, 19, 27, 35, 43];
    let analyzer = FrequencyAnalyzer::new(MemoryRepository::new(vec![
        DrawRecord::new(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(), repeated.clone(), Some(1)),
        DrawRecord::new(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), vec![43, 35, 27, 19, 11, 3], Some(2)),
        DrawRecord::new(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(), vec![1, 2, 3, 4, 5, 6], None),
        DrawRecord::new(NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(), vec![7, 8, 9, 10, 11, 12], None),
    ]));

    let results = analyzer.analyze_exact_combinations(10).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0], GroupCount { group: repeated, occurrences: 2 });
    assert!(results[1..].iter().all(|gc| gc.occurrences == 1));
}

#[test]
fn malformed_month_is_rejected() {
    let err = DateRange::parse("2024-13-01:2024-01-01").unwrap_err();
    assert_eq!(err.expected, "YYYY-MM-DD:YYYY-MM-DD");
}

#[test]
fn group_of_seven_is_rejected() {
    let analyzer = FrequencyAnalyzer::with_game(MemoryRepository::default(), Game::TOTO);
    let err = analyzer.analyze_group_frequency(7, 5).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidGroupSize(_)));
}
