use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::Serialize;

/// Règles du jeu : nombre de numéros gagnants par tirage et plage des numéros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Game {
    pub arity: usize,
    pub max_number: u8,
}

impl Game {
    /// TOTO de Singapour : 6 numéros parmi 1..=49, plus un numéro complémentaire.
    pub const TOTO: Game = Game {
        arity: 6,
        max_number: 49,
    };

    pub fn contains(&self, n: u8) -> bool {
        (1..=self.max_number).contains(&n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub draw_date: NaiveDate,
    pub draw_no: Option<u32>,
    /// Ordre de publication ; l'analyse trie sa propre copie.
    pub winning_numbers: Vec<u8>,
    pub additional_number: Option<u8>,
}

impl DrawRecord {
    pub fn new(draw_date: NaiveDate, winning_numbers: Vec<u8>, additional_number: Option<u8>) -> Self {
        Self {
            draw_date,
            draw_no: None,
            winning_numbers,
            additional_number,
        }
    }

    pub fn sorted_numbers(&self) -> Vec<u8> {
        let mut numbers = self.winning_numbers.clone();
        numbers.sort_unstable();
        numbers
    }
}

/// Un résultat : un groupe de numéros et le nombre de tirages qui le contiennent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupCount {
    #[serde(rename = "numbers")]
    pub group: Vec<u8>,
    pub occurrences: u32,
}

impl GroupCount {
    pub fn numbers_label(&self) -> String {
        join_numbers(&self.group)
    }
}

pub fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn validate_draw(game: &Game, numbers: &[u8], additional: Option<u8>) -> Result<()> {
    if numbers.len() != game.arity {
        bail!(
            "{} numéros gagnants attendus, {} reçus",
            game.arity,
            numbers.len()
        );
    }
    for &n in numbers {
        if !game.contains(n) {
            bail!("Numéro {} hors limites (1-{})", n, game.max_number);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    if let Some(a) = additional {
        if !game.contains(a) {
            bail!("Numéro complémentaire {} hors limites (1-{})", a, game.max_number);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&Game::TOTO, &[1, 2, 3, 4, 5, 6], Some(7)).is_ok());
        assert!(validate_draw(&Game::TOTO, &[49, 48, 47, 46, 45, 44], None).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        assert!(validate_draw(&Game::TOTO, &[0, 2, 3, 4, 5, 6], None).is_err());
        assert!(validate_draw(&Game::TOTO, &[1, 2, 3, 4, 5, 50], None).is_err());
        assert!(validate_draw(&Game::TOTO, &[1, 2, 3, 4, 5, 6], Some(50)).is_err());
    }

    #[test]
    fn test_validate_draw_duplicates() {
        assert!(validate_draw(&Game::TOTO, &[1, 1, 3, 4, 5, 6], None).is_err());
    }

    #[test]
    fn test_validate_draw_wrong_arity() {
        assert!(validate_draw(&Game::TOTO, &[1, 2, 3, 4, 5], None).is_err());
        assert!(validate_draw(&Game::TOTO, &[1, 2, 3, 4, 5, 6, 7], None).is_err());
    }

    #[test]
    fn test_sorted_numbers_keeps_original_order() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let draw = DrawRecord::new(date, vec![40, 3, 17, 9, 28, 1], None);
        assert_eq!(draw.sorted_numbers(), vec![1, 3, 9, 17, 28, 40]);
        assert_eq!(draw.winning_numbers[0], 40);
    }

    #[test]
    fn test_numbers_label() {
        let gc = GroupCount {
            group: vec![4, 19, 40],
            occurrences: 2,
        };
        assert_eq!(gc.numbers_label(), "4, 19, 40");
    }
}
