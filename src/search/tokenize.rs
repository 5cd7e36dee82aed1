//! Text tokenization and stemming utilities for search indexing.

use ahash::AHashMap;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use xxhash_rust::xxh3::xxh3_64;

use super::index::{FIELD_COUNT, FIELDS, Field, SearchIndex};
use crate::store::DocumentEntry;

/// Minimum token length for indexing. Set to 1 so short names like `io` or `x` stay searchable.
const MIN_TOKEN_LENGTH: usize = 1;

/// BM25 term frequency saturation.
const K1: f32 = 1.2;
/// BM25 field length normalization.
const B: f32 = 0.75;

/// Common English stop words to filter out from indexing.
/// These high-frequency words add little value to search relevance.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

/// Term hash for fast lookup
pub(crate) type TermHash = u64;

/// Position of a document in the index (build order).
type DocPos = u32;

/// Builder for accumulating per-field term frequencies before BM25 finalization.
pub(crate) struct TermBuilder {
    /// Flat map from (term_hash, doc) → term count per field
    term_docs: HashMap<(TermHash, DocPos), [u32; FIELD_COUNT]>,
    /// Token count per field for each document, indexed by position
    field_lengths: Vec<[u32; FIELD_COUNT]>,
    /// Document refs, indexed by position
    refs: Vec<String>,
    /// Reusable stemmer instance for English language stemming
    stemmer: Stemmer,
}

impl Default for TermBuilder {
    fn default() -> Self {
        Self {
            term_docs: HashMap::default(),
            field_lengths: Vec::new(),
            refs: Vec::new(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl TermBuilder {
    /// Adds a document's `name` and `prefix` fields under the next position.
    pub(crate) fn add_document(&mut self, entry: &DocumentEntry) {
        let Ok(doc) = DocPos::try_from(self.refs.len()) else {
            tracing::warn!("Search index is full, skipping document '{}'", entry.reference);
            return;
        };
        self.refs.push(entry.reference.clone());

        let mut lengths = [0u32; FIELD_COUNT];
        for field in FIELDS {
            lengths[field as usize] = self.add_terms(field.text(entry), doc, field);
        }
        self.field_lengths.push(lengths);
    }

    /// Extracts terms from one field's text, counting frequencies. Returns the field length.
    fn add_terms(&mut self, text: &str, doc: DocPos, field: Field) -> u32 {
        let words = tokenize_and_stem(text, &self.stemmer);

        // Count word frequencies using AHashMap for O(1) operations
        let mut word_counts: AHashMap<String, u32> = AHashMap::with_capacity(words.len());
        for word in words {
            *word_counts.entry(word).or_insert(0) += 1;
        }

        let mut field_len = 0;
        for (word, count) in word_counts {
            field_len += count;
            let slot = self.term_docs.entry((hash_term(&word), doc)).or_default();
            slot[field as usize] += count;
        }
        field_len
    }

    /// Calculates IDF and BM25 scores and produces the final searchable index.
    ///
    /// Per term and document: `sum over fields(boost * idf * tf * (k1 + 1) / (tf + k1 * (1 - b + b * len / avg_len)))`
    /// with `idf = ln(1 + |(N - df + 0.5) / (df + 0.5)|)`.
    pub(crate) fn finalize(self, store_fingerprint: u64) -> SearchIndex {
        let start = std::time::Instant::now();
        let total_docs = self.refs.len() as f32;

        let mut avg_lengths = [1.0f32; FIELD_COUNT];
        if !self.field_lengths.is_empty() {
            for field in FIELDS {
                let total: u64 = self
                    .field_lengths
                    .iter()
                    .map(|lengths| u64::from(lengths[field as usize]))
                    .sum();
                avg_lengths[field as usize] =
                    (total as f32 / self.field_lengths.len() as f32).max(1.0);
            }
        }

        // Group flat term_docs by term_hash
        type GroupedDocs = HashMap<TermHash, Vec<(DocPos, [u32; FIELD_COUNT])>>;
        let mut grouped: GroupedDocs = HashMap::new();
        let total_term_doc_pairs = self.term_docs.len(); // Capture before move
        for ((term_hash, doc), counts) in self.term_docs {
            grouped.entry(term_hash).or_default().push((doc, counts));
        }

        let mut terms: HashMap<TermHash, Vec<(DocPos, f32)>> = HashMap::with_capacity(grouped.len());

        for (term_hash, postings) in grouped {
            let doc_freq = postings.len() as f32;
            let idf = (1.0 + ((total_docs - doc_freq + 0.5) / (doc_freq + 0.5)).abs()).ln();

            let mut scores: Vec<_> = postings
                .into_iter()
                .map(|(doc, counts)| {
                    let lengths = &self.field_lengths[doc as usize];
                    let score: f32 = FIELDS
                        .iter()
                        .filter(|field| counts[**field as usize] > 0)
                        .map(|&field| {
                            let tf = counts[field as usize] as f32;
                            let len_norm =
                                lengths[field as usize] as f32 / avg_lengths[field as usize];
                            let saturated = tf * (K1 + 1.0) / (tf + K1 * (1.0 - B + B * len_norm));
                            field.boost() * idf * saturated
                        })
                        .sum();
                    (doc, score)
                })
                .collect();

            // Descending score, earlier documents first on ties
            scores.sort_by(|(da, a), (db, b)| b.total_cmp(a).then(da.cmp(db)));
            terms.insert(term_hash, scores);
        }

        let index = SearchIndex::new(store_fingerprint, terms, self.refs);

        tracing::info!(
            "Built search index: {} unique terms, {} documents, {} term-document pairs in {:?}",
            index.term_count(),
            index.document_count(),
            total_term_doc_pairs,
            start.elapsed()
        );

        index
    }
}

/// Tokenizes text into searchable terms with stemming and case-aware splitting.
///
/// This function implements a state machine that splits text on multiple boundaries:
/// - **CamelCase**: "HttpServer" → ["Http", "Server", "HttpServer"]
/// - **snake_case**: "parse_json" → ["parse", "json"]
/// - **dotted paths**: "pkg.Loader" → ["pkg", "Loader"]
/// - **digits** stay inside words: "sha256" → ["sha256"], "2.0" → ["2", "0"]
///
/// The state machine maintains two pointers:
/// - `word_start`: Start of the complete word (e.g., "HttpServer")
/// - `subword_start`: Start of the current sub-component (e.g., "Server")
///
/// This allows extracting both individual components and the full compound term.
pub(crate) fn tokenize_and_stem(text: &str, stemmer: &Stemmer) -> Vec<String> {
    let mut tokens = vec![];

    let mut last_case = None; // Track case transitions (None/Some(false)/Some(true))
    let mut word_start = 0; // Start of full word (e.g., "HttpServer")
    let mut subword_start = 0; // Start of subword (e.g., "Server")
    let mut word_start_next_char = true; // Flag: start new word at next char
    let mut subword_start_next_char = true; // Flag: start new subword at next char

    for (i, c) in text.char_indices() {
        if word_start_next_char {
            word_start = i;
            subword_start = i;
            word_start_next_char = false;
            subword_start_next_char = false;
        }

        if subword_start_next_char {
            subword_start = i;
            subword_start_next_char = false;
        }

        // Detect case changes for CamelCase splitting (lowercase → uppercase).
        // Digits belong to the word but carry no case, so "utf8Decoder" still splits at 'D'.
        let current_case = c.is_alphabetic().then(|| c.is_uppercase());
        let case_change = last_case == Some(false) && current_case == Some(true);
        if current_case.is_some() || !c.is_alphanumeric() {
            last_case = current_case;
        }

        if c == '-' || c == '_' {
            // Snake_case / hyphen-case boundary: emit the subword before the delimiter
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH {
                index_token(&text[subword_start..i], &mut tokens, stemmer);
            }
            subword_start_next_char = true;
        } else if !c.is_alphanumeric() {
            // End of a complete word: emit the trailing subword, then the whole word
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH && subword_start != word_start {
                index_token(&text[subword_start..i], &mut tokens, stemmer);
            }
            if i.saturating_sub(word_start) >= MIN_TOKEN_LENGTH {
                index_token(&text[word_start..i], &mut tokens, stemmer);
            }
            word_start_next_char = true;
        } else if case_change {
            // CamelCase boundary: "http" | "Server"
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH {
                index_token(&text[subword_start..i], &mut tokens, stemmer);
            }
            subword_start = i;
        }
    }

    if !word_start_next_char {
        let last_subword = &text[subword_start..];
        if word_start != subword_start && last_subword.len() >= MIN_TOKEN_LENGTH {
            index_token(last_subword, &mut tokens, stemmer);
        }
        let last_word = &text[word_start..];
        if last_word.len() >= MIN_TOKEN_LENGTH {
            index_token(last_word, &mut tokens, stemmer);
        }
    }

    tokens
}

/// Add a token using proper stemming algorithm, filtering out stop words.
pub(crate) fn index_token(token: &str, tokens: &mut Vec<String>, stemmer: &Stemmer) {
    let lowercase = token.to_lowercase();

    if STOP_WORDS.contains(&lowercase.as_str()) {
        return;
    }

    let stemmed = stemmer.stem(&lowercase);
    tokens.push(stemmed.into_owned());
}

/// Hashes a term for lookup (case-insensitive).
///
/// Uses a fixed-seed hash so a serialized index stays valid in other processes.
pub(crate) fn hash_term(term: &str) -> TermHash {
    xxh3_64(term.to_lowercase().as_bytes())
}
