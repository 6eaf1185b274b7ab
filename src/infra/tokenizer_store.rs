// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Two sources of truth for the tokenizer:
//
//   1. `load()` — a fine-tuned run persisted tokenizer.json into
//      the checkpoint directory; load it so inference uses the
//      exact vocabulary the model was trained with.
//
//   2. `build_stock()` — no usable checkpoint exists. Build a
//      word-level vocabulary from a corpus and hand back an
//      in-memory tokenizer WITHOUT touching the checkpoint
//      directory: directory non-emptiness is the sole
//      "fine-tuned model available" signal, and the stock path
//      must not fake it.
//
// In tokenizers 0.15, train_from_files requires Trainer::Model
// to equal ModelWrapper. The correct approach is to build the
// tokenizer JSON manually and load it, bypassing the trainer
// type mismatch entirely.

use anyhow::Result;
use std::path::PathBuf;
use tokenizers::Tokenizer;

/// Special token ids, BERT convention. Word ids start at 104 so
/// these stay fixed across every rebuilt vocabulary.
pub const PAD_ID:  u32 = 0;
pub const UNK_ID:  u32 = 1;
pub const BOS_ID:  u32 = 101; // [CLS] — decoder start token
pub const EOS_ID:  u32 = 102; // [SEP] — decoder end token
pub const MASK_ID: u32 = 103;

/// First id available for corpus words.
const FIRST_WORD_ID: usize = 104;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load a previously persisted tokenizer from the checkpoint dir.
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.dir.join("tokenizer.json");
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))
    }

    /// Persist a tokenizer into the checkpoint dir (after training).
    pub fn save(&self, tokenizer: &Tokenizer) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join("tokenizer.json");
        tokenizer
            .save(&path, true)
            .map_err(|e| anyhow::anyhow!("Cannot save tokenizer to '{}': {}", path.display(), e))?;
        tracing::debug!("Tokenizer saved to '{}'", path.display());
        Ok(())
    }

    /// Build the stock word-level tokenizer from a corpus, entirely
    /// in memory.
    pub fn build_stock(texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        // ── Step 1: Build vocabulary from word frequencies ────────────────────
        use std::collections::HashMap;
        let mut freq: HashMap<String, usize> = HashMap::new();

        for text in texts {
            for word in text.split_whitespace() {
                let w = word.to_lowercase();
                let w = w.trim_matches(|c: char| !c.is_alphanumeric());
                if !w.is_empty() {
                    *freq.entry(w.to_string()).or_insert(0) += 1;
                }
            }
        }

        // Sort by frequency descending. Word ids start at FIRST_WORD_ID,
        // so cap the word count such that the largest assigned id still
        // fits inside an embedding table of `vocab_size` rows.
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let max_words = vocab_size.saturating_sub(FIRST_WORD_ID);
        words.truncate(max_words);

        // ── Step 2: Build vocab JSON ──────────────────────────────────────────
        let mut vocab = serde_json::json!({
            "[PAD]":  PAD_ID,
            "[UNK]":  UNK_ID,
            "[CLS]":  BOS_ID,
            "[SEP]":  EOS_ID,
            "[MASK]": MASK_ID,
        });

        let mut next_id = FIRST_WORD_ID;
        for (word, _) in &words {
            if vocab.get(word).is_none() {
                vocab[word] = serde_json::json!(next_id);
                next_id += 1;
            }
        }

        // ── Step 3: Assemble tokenizer JSON in HuggingFace format ─────────────
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": PAD_ID,  "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": UNK_ID,  "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": BOS_ID,  "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": EOS_ID,  "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": MASK_ID, "content": "[MASK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        let bytes = serde_json::to_vec(&tokenizer_json)?;
        let tokenizer = Tokenizer::from_bytes(&bytes)
            .map_err(|e| anyhow::anyhow!("Cannot build stock tokenizer: {e}"))?;

        tracing::info!("Stock tokenizer built with {} word entries", next_id - FIRST_WORD_ID);
        Ok(tokenizer)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "Torque = Force * Distance".to_string(),
            "A force of 10 Newtons at 2 meters".to_string(),
        ]
    }

    #[test]
    fn test_stock_tokenizer_round_trips_known_words() {
        let tok = TokenizerStore::build_stock(&corpus(), 4096).unwrap();
        let enc = tok.encode("force distance torque", false).unwrap();
        // All three words were in the corpus, so none should be [UNK]
        assert_eq!(enc.get_ids().len(), 3);
        assert!(enc.get_ids().iter().all(|&id| id != UNK_ID));

        let decoded = tok.decode(enc.get_ids(), true).unwrap();
        assert_eq!(decoded, "force distance torque");
    }

    #[test]
    fn test_unknown_words_map_to_unk() {
        let tok = TokenizerStore::build_stock(&corpus(), 4096).unwrap();
        let enc = tok.encode("flux capacitor", false).unwrap();
        assert!(enc.get_ids().iter().all(|&id| id == UNK_ID));
    }

    #[test]
    fn test_word_ids_fit_the_embedding_table() {
        let vocab_size = 120; // room for only 16 words past the specials
        let tok = TokenizerStore::build_stock(&corpus(), vocab_size).unwrap();
        let enc = tok.encode("torque force distance newtons meters", false).unwrap();
        assert!(enc.get_ids().iter().all(|&id| (id as usize) < vocab_size));
    }

    #[test]
    fn test_save_then_load(){
        let dir   = tempfile::TempDir::new().unwrap();
        let store = TokenizerStore::new(dir.path());
        let tok   = TokenizerStore::build_stock(&corpus(), 4096).unwrap();
        store.save(&tok).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(
            reloaded.encode("force", false).unwrap().get_ids(),
            tok.encode("force", false).unwrap().get_ids()
        );
    }
}
