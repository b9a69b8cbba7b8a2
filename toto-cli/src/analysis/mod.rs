//! Moteur d'analyse de fréquence : lecture de l'historique, filtrage par
//! plage de dates, comptage des groupes de numéros.
//!
//! Le moteur ne journalise rien et ne garde aucun état entre deux appels :
//! chaque requête travaille sur son propre instantané des tirages.

pub mod groups;
pub mod range;

use thiserror::Error;

use toto_db::error::RepositoryError;
use toto_db::models::{Game, GroupCount};
use toto_db::repository::DrawRepository;

pub use groups::{GroupSizeError, MAX_GROUP_SIZE, group_frequency};
pub use range::{CANONICAL_FORMAT, DateRange, RangeError};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    InvalidRangeFormat(#[from] RangeError),

    #[error(transparent)]
    InvalidGroupSize(#[from] GroupSizeError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub struct FrequencyAnalyzer<R> {
    repository: R,
    game: Game,
}

impl<R: DrawRepository> FrequencyAnalyzer<R> {
    pub fn new(repository: R) -> Self {
        Self::with_game(repository, Game::TOTO)
    }

    pub fn with_game(repository: R, game: Game) -> Self {
        Self { repository, game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Numéros les plus sortis, éventuellement restreints à une plage de dates.
    pub fn analyze_top_numbers(
        &self,
        range: Option<&DateRange>,
        top_n: usize,
    ) -> Result<Vec<GroupCount>, AnalysisError> {
        self.analyze(range, 1, top_n)
    }

    /// Groupes de `group_size` numéros les plus sortis sur tout l'historique.
    pub fn analyze_group_frequency(
        &self,
        group_size: usize,
        top_n: usize,
    ) -> Result<Vec<GroupCount>, AnalysisError> {
        self.analyze(None, group_size, top_n)
    }

    /// Tirages complets sortis plusieurs fois.
    pub fn analyze_exact_combinations(&self, top_n: usize) -> Result<Vec<GroupCount>, AnalysisError> {
        self.analyze(None, self.game.arity, top_n)
    }

    /// Cas général : plage optionnelle, taille de groupe quelconque.
    pub fn analyze(
        &self,
        range: Option<&DateRange>,
        group_size: usize,
        top_n: usize,
    ) -> Result<Vec<GroupCount>, AnalysisError> {
        // taille contrôlée avant d'interroger la base
        groups::check_group_size(&[], group_size, self.game.arity)?;

        let draws = self.repository.fetch_all_draws()?;
        let draws = match range {
            Some(range) => range.filter(draws),
            None => draws,
        };
        Ok(group_frequency(&draws, group_size, self.game.arity, top_n)?)
    }
}
