use crate::error::{Result, WaymarkError};

use super::QueryWordStat;

/// Format string the FTS4 `matchinfo()` call must use for [`MatchStatistics::parse`].
///
/// `p` phrase count, `c` column count, `x` per phrase/column hit triples,
/// `n` row count, `a` per-column average tokens, `l` per-column row tokens.
pub const MATCHINFO_FORMAT: &str = "pcxnal";

const WORD: usize = std::mem::size_of::<i32>();
const HIT_TRIPLE: usize = 3 * WORD;

/// Decoded `pcxnal` matchinfo of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStatistics {
    /// One entry per query phrase, in query order.
    pub query_word_stats: Vec<QueryWordStat>,
    /// Tokens in this document across all columns.
    pub doc_word_count: u64,
    /// Sum of per-column corpus averages.
    pub avg_word_count: f64,
    /// Documents in the corpus.
    pub doc_count: u64,
}

impl MatchStatistics {
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let mut cursor = MatchInfoCursor::new(raw);

        let phrase_count = cursor.read_count("phrase count")?;
        let column_count = cursor.read_count("column count")?;
        ensure_declared_length(raw.len(), phrase_count, column_count)?;

        let mut query_word_stats = Vec::with_capacity(phrase_count);
        for _ in 0..phrase_count {
            let mut stat = QueryWordStat::default();
            for _ in 0..column_count {
                stat.appearance_count += u64::from(cursor.read_counter("hits in this row")?);
                // hits across all rows is not used for ranking
                cursor.skip_word("hits in all rows")?;
                stat.matched_document_count += u64::from(cursor.read_counter("docs with hits")?);
            }
            query_word_stats.push(stat);
        }

        let doc_count = u64::from(cursor.read_counter("row count")?);

        let mut avg_word_count = 0.0;
        for _ in 0..column_count {
            avg_word_count += f64::from(cursor.read_counter("column average tokens")?);
        }

        let mut doc_word_count = 0_u64;
        for _ in 0..column_count {
            doc_word_count += u64::from(cursor.read_counter("column row tokens")?);
        }

        Ok(Self {
            query_word_stats,
            doc_word_count,
            avg_word_count,
            doc_count,
        })
    }
}

fn ensure_declared_length(actual: usize, phrase_count: usize, column_count: usize) -> Result<()> {
    let required = phrase_count
        .checked_mul(column_count)
        .and_then(|cells| cells.checked_mul(HIT_TRIPLE))
        .and_then(|hits| column_count.checked_mul(2 * WORD)?.checked_add(hits))
        .and_then(|body| body.checked_add(3 * WORD));
    match required {
        Some(required) if required <= actual => Ok(()),
        Some(required) => Err(WaymarkError::MalformedMatchInfo(format!(
            "{phrase_count} phrases over {column_count} columns need {required} bytes, got {actual}"
        ))),
        None => Err(WaymarkError::MalformedMatchInfo(format!(
            "{phrase_count} phrases over {column_count} columns overflow the buffer size"
        ))),
    }
}

/// Bounds-checked reader of native-endian 32-bit words.
struct MatchInfoCursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> MatchInfoCursor<'a> {
    const fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    fn take_word(&mut self, field: &str) -> Result<[u8; WORD]> {
        let end = self.offset + WORD;
        let word = self
            .buf
            .get(self.offset..end)
            .and_then(|bytes| <[u8; WORD]>::try_from(bytes).ok())
            .ok_or_else(|| {
                WaymarkError::MalformedMatchInfo(format!(
                    "{field} at byte {} runs past the end of a {}-byte buffer",
                    self.offset,
                    self.buf.len()
                ))
            })?;
        self.offset = end;
        Ok(word)
    }

    fn read_i32(&mut self, field: &str) -> Result<i32> {
        self.take_word(field).map(i32::from_ne_bytes)
    }

    fn read_counter(&mut self, field: &str) -> Result<u32> {
        let at = self.offset;
        let value = self.read_i32(field)?;
        u32::try_from(value).map_err(|_| {
            WaymarkError::MalformedMatchInfo(format!("{field} at byte {at} is negative ({value})"))
        })
    }

    fn read_count(&mut self, field: &str) -> Result<usize> {
        let value = self.read_counter(field)?;
        usize::try_from(value)
            .map_err(|_| WaymarkError::MalformedMatchInfo(format!("{field} {value} is too large")))
    }

    fn skip_word(&mut self, field: &str) -> Result<()> {
        self.take_word(field).map(|_| ())
    }
}
