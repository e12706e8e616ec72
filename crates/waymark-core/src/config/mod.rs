//! Environment-driven runtime configuration, one reader per concern.

mod env;
mod pointer;
mod ranking;

pub use pointer::{ENV_POINTER_EPSILON, PointerConfig};
pub use ranking::{ENV_BM25_B, ENV_BM25_K1, ENV_RANKER, RankerKind, RankingConfig};
