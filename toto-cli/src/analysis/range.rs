//! Plages de dates et filtrage des tirages.
//!
//! Grammaire acceptée : `YYYY-MM-DD:YYYY-MM-DD`. Un côté vide laisse la borne
//! ouverte, une date seule signifie « à partir de cette date ». La date de fin
//! est incluse : elle est ramenée à 23:59:59.999.
//!
//! Syntaxe héritée : avec la feature `legacy-range`, `YYYY-MM-DD-YYYY-MM-DD`
//! reste acceptée (début aux caractères 0-9, fin aux caractères 11-20).
//! Préférer la forme avec deux-points.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use toto_db::models::DrawRecord;

pub const CANONICAL_FORMAT: &str = "YYYY-MM-DD:YYYY-MM-DD";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Format de plage invalide : '{input}' (attendu {expected})")]
pub struct RangeError {
    pub input: String,
    pub expected: &'static str,
}

impl RangeError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            expected: CANONICAL_FORMAT,
        }
    }
}

/// Intervalle `[début 00:00, fin 23:59:59.999]` ; un côté absent est non borné.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl DateRange {
    pub const UNBOUNDED: DateRange = DateRange {
        start: None,
        end: None,
    };

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start: start.map(|d| d.and_time(NaiveTime::MIN)),
            end: end.map(end_of_day),
        }
    }

    pub fn parse(expr: &str) -> Result<Self, RangeError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Ok(Self::UNBOUNDED);
        }

        if let Some((start, end)) = trimmed.split_once(':') {
            if end.contains(':') {
                return Err(RangeError::new(expr));
            }
            let start = parse_optional_date(start, expr)?;
            let end = parse_optional_date(end, expr)?;
            if start.is_none() && end.is_none() {
                return Err(RangeError::new(expr));
            }
            return Ok(Self::new(start, end));
        }

        #[cfg(feature = "legacy-range")]
        {
            if let Some((start, end)) = split_legacy(trimmed) {
                let start = parse_date(start, expr)?;
                let end = parse_date(end, expr)?;
                return Ok(Self::new(Some(start), Some(end)));
            }
        }

        let start = parse_date(trimmed, expr)?;
        Ok(Self::new(Some(start), None))
    }

    /// Plage construite à partir de deux dates optionnelles (`None` ou vide = non borné).
    pub fn from_parts(start: Option<&str>, end: Option<&str>) -> Result<Self, RangeError> {
        let start = match start {
            Some(s) => parse_optional_date(s, s)?,
            None => None,
        };
        let end = match end {
            Some(s) => parse_optional_date(s, s)?,
            None => None,
        };
        Ok(Self::new(start, end))
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start.is_none_or(|s| instant >= s) && self.end.is_none_or(|e| instant <= e)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(date.and_time(NaiveTime::MIN))
    }

    /// Garde les tirages de la plage, dans leur ordre d'origine.
    pub fn filter(&self, mut draws: Vec<DrawRecord>) -> Vec<DrawRecord> {
        if !self.is_unbounded() {
            draws.retain(|d| self.contains_date(d.draw_date));
        }
        draws
    }
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or(NaiveDateTime::MAX)
}

fn parse_optional_date(s: &str, expr: &str) -> Result<Option<NaiveDate>, RangeError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    parse_date(s, expr).map(Some)
}

/// `YYYY-MM-DD` strict : champs sur deux chiffres, date réelle du calendrier.
fn parse_date(s: &str, expr: &str) -> Result<NaiveDate, RangeError> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(RangeError::new(expr));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| RangeError::new(expr))
}

#[cfg(feature = "legacy-range")]
fn split_legacy(s: &str) -> Option<(&str, &str)> {
    if s.len() != 21 || s.as_bytes()[10] != b'-' {
        return None;
    }
    Some((s.get(..10)?, s.get(11..)?))
}
