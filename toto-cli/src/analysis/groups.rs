use std::collections::HashMap;

use thiserror::Error;

use toto_db::models::{DrawRecord, GroupCount};

/// Plus grand groupe analysable (un tirage TOTO complet).
pub const MAX_GROUP_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Taille de groupe invalide : {size} (attendu 1 à {max})")]
pub struct GroupSizeError {
    pub size: usize,
    pub max: usize,
}

/// Combinaisons de taille `k` d'une tranche, dans l'ordre lexicographique des positions.
pub struct Combinations<'a> {
    items: &'a [u8],
    indices: Vec<usize>,
    done: bool,
}

pub fn combinations(items: &[u8], k: usize) -> Combinations<'_> {
    Combinations {
        items,
        indices: (0..k).collect(),
        done: k > items.len(),
    }
}

impl Iterator for Combinations<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.done {
            return None;
        }
        let current = self.indices.iter().map(|&i| self.items[i]).collect();

        let n = self.items.len();
        let k = self.indices.len();
        // indice le plus à droite encore incrémentable
        match (0..k).rev().find(|&i| self.indices[i] != i + n - k) {
            Some(i) => {
                self.indices[i] += 1;
                for j in (i + 1)..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }
        Some(current)
    }
}

/// Vérifie `1 <= group_size <= max` puis que chaque tirage a assez de numéros.
pub fn check_group_size(draws: &[DrawRecord], group_size: usize, max: usize) -> Result<(), GroupSizeError> {
    let max = max.min(MAX_GROUP_SIZE);
    if group_size == 0 || group_size > max {
        return Err(GroupSizeError { size: group_size, max });
    }
    if let Some(short) = draws.iter().find(|d| d.winning_numbers.len() < group_size) {
        return Err(GroupSizeError {
            size: group_size,
            max: short.winning_numbers.len(),
        });
    }
    Ok(())
}

/// Compte, pour chaque groupe, le nombre de tirages qui le contiennent.
///
/// Les numéros d'un tirage sont triés et dédoublonnés avant la génération :
/// un tirage ne compte qu'une fois pour un groupe donné.
pub fn count_groups(draws: &[DrawRecord], group_size: usize) -> HashMap<Vec<u8>, u32> {
    let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();
    for draw in draws {
        let mut numbers = draw.sorted_numbers();
        numbers.dedup();
        for group in combinations(&numbers, group_size) {
            *counts.entry(group).or_insert(0) += 1;
        }
    }
    counts
}

/// Tri par occurrences décroissantes puis groupe croissant, tronqué à `top_n`.
pub fn rank(counts: HashMap<Vec<u8>, u32>, top_n: usize) -> Vec<GroupCount> {
    let mut ranked: Vec<GroupCount> = counts
        .into_iter()
        .map(|(group, occurrences)| GroupCount { group, occurrences })
        .collect();
    ranked.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| a.group.cmp(&b.group))
    });
    ranked.truncate(top_n);
    ranked
}

/// Fréquence des groupes de `group_size` numéros sur les tirages donnés.
///
/// `max_group_size` est l'arité du jeu. `group_size = 1` donne la fréquence des
/// numéros seuls, `group_size = arité` celle des combinaisons exactes.
pub fn group_frequency(
    draws: &[DrawRecord],
    group_size: usize,
    max_group_size: usize,
    top_n: usize,
) -> Result<Vec<GroupCount>, GroupSizeError> {
    check_group_size(draws, group_size, max_group_size)?;
    Ok(rank(count_groups(draws, group_size), top_n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draw(date: &str, numbers: &[u8]) -> DrawRecord {
        DrawRecord::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            numbers.to_vec(),
            None,
        )
    }

    fn two_draws() -> Vec<DrawRecord> {
        vec![
            draw("2024-01-01", &[1, 2, 3, 4, 5, 6]),
            draw("2024-01-08", &[1, 2, 3, 4, 5, 7]),
        ]
    }

    #[test]
    fn test_combination_counts() {
        let items = [1, 2, 3, 4, 5, 6];
        let expected = [6, 15, 20, 15, 6, 1];
        for (k, &n) in (1..=6).zip(expected.iter()) {
            assert_eq!(combinations(&items, k).count(), n, "C(6,{k})");
        }
        assert_eq!(combinations(&items, 7).count(), 0);
    }

    #[test]
    fn test_combinations_are_ascending_tuples() {
        let pairs: Vec<Vec<u8>> = combinations(&[3, 8, 20], 2).collect();
        assert_eq!(pairs, vec![vec![3, 8], vec![3, 20], vec![8, 20]]);
    }

    #[test]
    fn test_pairs_scenario() {
        let result = group_frequency(&two_draws(), 2, 6, 5).unwrap();
        assert_eq!(result.len(), 5);
        assert_eq!(result[0].group, vec![1, 2]);
        assert_eq!(result[0].occurrences, 2);
        // toutes les paires sans 6 ni 7 apparaissent deux fois
        assert!(result.iter().all(|gc| gc.occurrences == 2));

        let all = group_frequency(&two_draws(), 2, 6, 100).unwrap();
        assert_eq!(all.len(), 20);
        let singles: Vec<&GroupCount> = all.iter().filter(|gc| gc.occurrences == 1).collect();
        assert_eq!(singles.len(), 10);
        assert_eq!(singles[0].group, vec![1, 6]);
        assert_eq!(singles[1].group, vec![1, 7]);
        assert_eq!(singles[2].group, vec![2, 6]);
    }

    #[test]
    fn test_single_numbers_sum() {
        let draws = two_draws();
        let result = group_frequency(&draws, 1, 6, 100).unwrap();
        let total: u32 = result.iter().map(|gc| gc.occurrences).sum();
        assert_eq!(total as usize, 6 * draws.len());
        assert_eq!(result[0], GroupCount { group: vec![1], occurrences: 2 });
        assert_eq!(result.last().unwrap().group, vec![7]);
    }

    #[test]
    fn test_exact_combinations() {
        let draws = vec![
            draw("2024-01-01", &[6, 5, 4, 3, 2, 1]),
            draw("2024-01-04", &[10, 11, 12, 13, 14, 15]),
            draw("2024-01-08", &[1, 2, 3, 4, 5, 6]),
        ];
        let result = group_frequency(&draws, 6, 6, 10).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], GroupCount { group: vec![1, 2, 3, 4, 5, 6], occurrences: 2 });
        assert_eq!(result[1].occurrences, 1);
    }

    #[test]
    fn test_group_size_bounds() {
        let draws = two_draws();
        assert_eq!(
            group_frequency(&draws, 7, 6, 5).unwrap_err(),
            GroupSizeError { size: 7, max: 6 }
        );
        assert!(group_frequency(&draws, 0, 6, 5).is_err());
        assert!(group_frequency(&[], 7, 6, 5).is_err());
    }

    #[test]
    fn test_short_draw_rejected() {
        let draws = vec![draw("2024-01-01", &[1, 2, 3])];
        assert_eq!(
            group_frequency(&draws, 4, 6, 5).unwrap_err(),
            GroupSizeError { size: 4, max: 3 }
        );
    }

    #[test]
    fn test_empty_and_truncation() {
        assert!(group_frequency(&[], 2, 6, 10).unwrap().is_empty());
        assert!(group_frequency(&two_draws(), 2, 6, 0).unwrap().is_empty());
        assert_eq!(group_frequency(&two_draws(), 6, 6, 50).unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_number_counted_once_per_draw() {
        let draws = vec![draw("2024-01-01", &[5, 5, 1, 2, 3, 4])];
        let counts = count_groups(&draws, 1);
        assert_eq!(counts.get(&vec![5]), Some(&1));
        assert_eq!(counts.len(), 5);
    }

    #[test]
    fn test_input_order_irrelevant() {
        let mut draws = two_draws();
        let forward = group_frequency(&draws, 3, 6, 100).unwrap();
        draws.reverse();
        draws[0].winning_numbers.reverse();
        assert_eq!(group_frequency(&draws, 3, 6, 100).unwrap(), forward);
    }
}
