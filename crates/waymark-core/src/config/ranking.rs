use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WaymarkError};
use crate::ranking::{Bm25, DEFAULT_BM25_B, DEFAULT_BM25_K1, Ranker, TfIdf};

use super::env::{parse_finite_f64, read_non_empty_env};

pub const ENV_RANKER: &str = "WAYMARK_RANKER";
pub const ENV_BM25_B: &str = "WAYMARK_BM25_B";
pub const ENV_BM25_K1: &str = "WAYMARK_BM25_K1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankerKind {
    #[default]
    Bm25,
    TfIdf,
}

impl RankerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bm25 => "bm25",
            Self::TfIdf => "tfidf",
        }
    }

    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let normalized = raw.map(|value| value.trim().to_ascii_lowercase());
        match normalized.as_deref() {
            None | Some("" | "bm25") => Ok(Self::Bm25),
            Some("tfidf" | "tf-idf") => Ok(Self::TfIdf),
            Some(other) => Err(WaymarkError::Validation(format!(
                "invalid {ENV_RANKER}: {other} (expected bm25|tfidf)"
            ))),
        }
    }
}

impl FromStr for RankerKind {
    type Err = WaymarkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(Some(s))
    }
}

impl fmt::Display for RankerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which ranker scores search hits, and its tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    pub kind: RankerKind,
    pub bm25_b: f64,
    pub bm25_k1: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            kind: RankerKind::Bm25,
            bm25_b: DEFAULT_BM25_B,
            bm25_k1: DEFAULT_BM25_K1,
        }
    }
}

impl RankingConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_raw(
            read_non_empty_env(ENV_RANKER).as_deref(),
            std::env::var(ENV_BM25_B).ok().as_deref(),
            std::env::var(ENV_BM25_K1).ok().as_deref(),
        )
    }

    /// Builds the config from raw variable values. Tuning values must parse as
    /// finite numbers and fit the BM25 parameter ranges.
    pub fn from_raw(
        ranker: Option<&str>,
        bm25_b: Option<&str>,
        bm25_k1: Option<&str>,
    ) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            kind: RankerKind::parse(ranker)?,
            bm25_b: parse_tuning(ENV_BM25_B, bm25_b)?.unwrap_or(defaults.bm25_b),
            bm25_k1: parse_tuning(ENV_BM25_K1, bm25_k1)?.unwrap_or(defaults.bm25_k1),
        };
        Bm25::new(config.bm25_b, config.bm25_k1)?;
        Ok(config)
    }

    /// The one place a concrete ranker is chosen.
    pub fn build_ranker(&self) -> Result<Box<dyn Ranker + Send + Sync>> {
        Ok(match self.kind {
            RankerKind::Bm25 => Box::new(Bm25::new(self.bm25_b, self.bm25_k1)?),
            RankerKind::TfIdf => Box::new(TfIdf),
        })
    }
}

fn parse_tuning(name: &str, raw: Option<&str>) -> Result<Option<f64>> {
    let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    parse_finite_f64(Some(trimmed))
        .map(Some)
        .ok_or_else(|| WaymarkError::Validation(format!("invalid {name}: {trimmed}")))
}
