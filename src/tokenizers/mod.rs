use anyhow::Result;
use tiktoken_rs::{cl100k_base, p50k_base, r50k_base, CoreBPE};
use tracing::debug;

use crate::error::SummaryError;
use crate::models::Encoding;

/// Context window of the completion model family we target.
pub const MODEL_MAX_TOKENS: usize = 4096;

pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Vec<usize>;

    /// Fails when the tokens do not form valid UTF-8, e.g. when they end in
    /// the middle of a multi-byte character.
    fn decode(&self, tokens: &[usize]) -> Result<String>;

    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

pub struct BpeTokenizer {
    bpe: CoreBPE,
    encoding: Encoding,
}

impl BpeTokenizer {
    pub fn new(encoding: Encoding) -> Result<Self> {
        let bpe = match encoding {
            Encoding::Cl100kBase => cl100k_base()?,
            Encoding::P50kBase => p50k_base()?,
            Encoding::R50kBase => r50k_base()?,
        };
        Ok(Self { bpe, encoding })
    }

    pub fn for_model(model: &str) -> Result<Self> {
        Self::new(Encoding::for_model(model))
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl Tokenizer for BpeTokenizer {
    fn encode(&self, text: &str) -> Vec<usize> {
        self.bpe.encode_ordinary(text)
    }

    fn decode(&self, tokens: &[usize]) -> Result<String> {
        self.bpe.decode(tokens.to_vec())
    }
}

/// A contiguous run of tokens together with its decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenChunk {
    pub tokens: Vec<usize>,
    pub text: String,
}

/// Tokens left for the payload once `reserved` tokens are set aside.
pub fn token_budget(reserved: usize) -> Result<usize> {
    match MODEL_MAX_TOKENS.checked_sub(reserved) {
        Some(budget) if budget > 0 => Ok(budget),
        _ => Err(SummaryError::TokenBudgetExhausted {
            reserved,
            limit: MODEL_MAX_TOKENS,
        }
        .into()),
    }
}

/// Greedily packs `tokens` into chunks of at most `budget` tokens.
///
/// A boundary that would cut a multi-byte character in half is moved back
/// until the chunk decodes, so every chunk is valid text on its own. When a
/// single character needs more than `budget` tokens the boundary moves
/// forward to the end of that character instead; this is the only case where
/// a chunk holds more than `budget` tokens.
pub fn chunk_tokens<T: Tokenizer + ?Sized>(
    tokenizer: &T,
    tokens: &[usize],
    budget: usize,
) -> Result<Vec<TokenChunk>> {
    let budget = budget.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < tokens.len() {
        let limit = (start + budget).min(tokens.len());
        let decode_to = |end: usize| {
            tokenizer
                .decode(&tokens[start..end])
                .ok()
                .map(|text| (end, text))
        };

        let (end, text) = match (start + 1..=limit).rev().find_map(decode_to) {
            Some(found) => found,
            None => match (limit + 1..=tokens.len()).find_map(decode_to) {
                Some(found) => {
                    debug!(
                        start,
                        end = found.0,
                        budget,
                        "character wider than the chunk budget"
                    );
                    found
                }
                None => (tokens.len(), tokenizer.decode(&tokens[start..])?),
            },
        };

        if end < limit {
            debug!(start, end, "moved chunk boundary off a split character");
        }

        chunks.push(TokenChunk {
            tokens: tokens[start..end].to_vec(),
            text,
        });
        start = end;
    }

    Ok(chunks)
}

/// Tokenizes `payload` and splits it into chunks that fit in the model
/// window after `reserved` tokens.
pub fn plan_chunks<T: Tokenizer + ?Sized>(
    tokenizer: &T,
    payload: &str,
    reserved: usize,
) -> Result<Vec<TokenChunk>> {
    let budget = token_budget(reserved)?;
    let tokens = tokenizer.encode(payload);
    chunk_tokens(tokenizer, &tokens, budget)
}

/// Same as [`plan_chunks`] but only keeps the decoded text.
pub fn generate_prompt_chunks<T: Tokenizer + ?Sized>(
    tokenizer: &T,
    payload: &str,
    reserved: usize,
) -> Result<Vec<String>> {
    Ok(plan_chunks(tokenizer, payload, reserved)?
        .into_iter()
        .map(|chunk| chunk.text)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One token per byte, so boundaries can land inside characters.
    struct ByteTokenizer;

    impl Tokenizer for ByteTokenizer {
        fn encode(&self, text: &str) -> Vec<usize> {
            text.bytes().map(usize::from).collect()
        }

        fn decode(&self, tokens: &[usize]) -> Result<String> {
            let bytes: Vec<u8> = tokens.iter().map(|&t| t as u8).collect();
            Ok(String::from_utf8(bytes)?)
        }
    }

    #[test]
    fn splits_5000_tokens_with_100_reserved_into_two_chunks() {
        let payload = "a".repeat(5000);
        let chunks = plan_chunks(&ByteTokenizer, &payload, 100).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].tokens.len(), 3996);
        assert_eq!(chunks[1].tokens.len(), 1004);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        let payload = "b".repeat(4000);
        let chunks = plan_chunks(&ByteTokenizer, &payload, 96).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, payload);
    }

    #[test]
    fn empty_payload_has_no_chunks() {
        assert!(generate_prompt_chunks(&ByteTokenizer, "", 100)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn exhausted_budget_fails_fast() {
        for reserved in [MODEL_MAX_TOKENS, MODEL_MAX_TOKENS + 1] {
            let err = generate_prompt_chunks(&ByteTokenizer, "hello", reserved).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<SummaryError>(),
                Some(SummaryError::TokenBudgetExhausted { .. })
            ));
        }
        assert_eq!(token_budget(MODEL_MAX_TOKENS - 1).unwrap(), 1);
    }

    #[test]
    fn boundary_never_splits_a_character() {
        // "é" is two bytes; a budget of 3 would cut the second one in half.
        let payload = "aéé";
        let tokens = ByteTokenizer.encode(payload);
        let chunks = chunk_tokens(&ByteTokenizer, &tokens, 4).unwrap();

        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["aé", "é"]);
        assert!(chunks.iter().all(|c| c.tokens.len() <= 4));
        assert_eq!(texts.concat(), payload);
    }

    #[test]
    fn character_wider_than_budget_stays_whole() {
        // Each "é" needs two tokens but only one fits per chunk.
        let payload = "aéb";
        let tokens = ByteTokenizer.encode(payload);
        let chunks = chunk_tokens(&ByteTokenizer, &tokens, 1).unwrap();

        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "é", "b"]);
        assert_eq!(chunks[1].tokens.len(), 2);

        let rejoined: Vec<usize> = chunks.iter().flat_map(|c| c.tokens.clone()).collect();
        assert_eq!(rejoined, tokens);
    }
}
