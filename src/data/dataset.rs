// ============================================================
// Layer 4 — Explanation Dataset
// ============================================================
// Turns TrainingExamples into fully tokenised, fixed-length
// samples and exposes them through Burn's Dataset trait.
//
// Sequence layout per sample (all padded to max_seq_len with 0):
//
//   input_ids          prompt tokens                     (encoder)
//   attention_mask     1 = real token, 0 = padding
//   decoder_input_ids  [CLS] t1 t2 ... tn               (decoder in)
//   labels             t1 t2 ... tn [SEP]               (decoder out)
//
// The decoder input is the target shifted right behind the start
// token, so at every position the model predicts the next target
// token. Pad positions in `labels` keep id 0, which the loss is
// configured to ignore.

use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::domain::training_example::TrainingExample;
use crate::infra::tokenizer_store::{BOS_ID, EOS_ID, PAD_ID};

/// One fully tokenised and padded seq2seq training sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seq2SeqSample {
    pub input_ids:         Vec<u32>,
    pub attention_mask:    Vec<u32>,
    pub decoder_input_ids: Vec<u32>,
    pub labels:            Vec<u32>,
}

pub struct ExplanationDataset {
    samples: Vec<Seq2SeqSample>,
}

impl ExplanationDataset {
    /// Tokenise every example's input and target text independently,
    /// truncating and padding each to `max_seq_len`.
    pub fn from_examples(
        examples:    &[TrainingExample],
        tokenizer:   &Tokenizer,
        max_seq_len: usize,
    ) -> Result<Self> {
        let samples = examples
            .iter()
            .map(|ex| build_sample(ex, tokenizer, max_seq_len))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { samples })
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<Seq2SeqSample> for ExplanationDataset {
    fn get(&self, index: usize) -> Option<Seq2SeqSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

fn build_sample(
    ex:          &TrainingExample,
    tokenizer:   &Tokenizer,
    max_seq_len: usize,
) -> Result<Seq2SeqSample> {
    // ── Encoder side ──────────────────────────────────────────────────────────
    let enc = tokenizer
        .encode(ex.input_text.as_str(), false)
        .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
    let mut input_ids: Vec<u32> = enc.get_ids().to_vec();
    input_ids.truncate(max_seq_len);

    let mut attention_mask = vec![1u32; input_ids.len()];
    while input_ids.len() < max_seq_len {
        input_ids.push(PAD_ID);
        attention_mask.push(0);
    }

    // ── Decoder side ──────────────────────────────────────────────────────────
    let target = tokenizer
        .encode(ex.output_text.as_str(), false)
        .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

    // Full sequence [CLS] target [SEP], truncated to max_seq_len + 1 so
    // both shifted views are at most max_seq_len long
    let mut full: Vec<u32> = Vec::with_capacity(target.get_ids().len() + 2);
    full.push(BOS_ID);
    full.extend_from_slice(target.get_ids());
    full.push(EOS_ID);
    full.truncate(max_seq_len + 1);

    let mut decoder_input_ids: Vec<u32> = full[..full.len() - 1].to_vec();
    let mut labels:            Vec<u32> = full[1..].to_vec();
    while decoder_input_ids.len() < max_seq_len {
        decoder_input_ids.push(PAD_ID);
        labels.push(PAD_ID);
    }

    Ok(Seq2SeqSample {
        input_ids,
        attention_mask,
        decoder_input_ids,
        labels,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tokenizer_store::TokenizerStore;

    fn tokenizer() -> Tokenizer {
        let corpus = vec![
            "torque force distance newtons meters solve physics".to_string(),
        ];
        TokenizerStore::build_stock(&corpus, 4096).unwrap()
    }

    fn example() -> TrainingExample {
        TrainingExample::from_correction(
            "A force of 10 newtons at 2 meters.",
            "torque force distance",
        )
    }

    #[test]
    fn test_sample_shapes_are_fixed() {
        let ds = ExplanationDataset::from_examples(&[example()], &tokenizer(), 32).unwrap();
        let s  = ds.get(0).unwrap();
        assert_eq!(s.input_ids.len(), 32);
        assert_eq!(s.attention_mask.len(), 32);
        assert_eq!(s.decoder_input_ids.len(), 32);
        assert_eq!(s.labels.len(), 32);
    }

    #[test]
    fn test_decoder_input_is_shifted_target() {
        let ds = ExplanationDataset::from_examples(&[example()], &tokenizer(), 32).unwrap();
        let s  = ds.get(0).unwrap();

        assert_eq!(s.decoder_input_ids[0], BOS_ID);
        // labels are the decoder input shifted left by one
        assert_eq!(s.labels[0], s.decoder_input_ids[1]);
        assert!(s.labels.contains(&EOS_ID));
    }

    #[test]
    fn test_truncation_to_max_len() {
        let long = TrainingExample::from_correction(
            &"force ".repeat(100),
            &"torque ".repeat(100),
        );
        let ds = ExplanationDataset::from_examples(&[long], &tokenizer(), 16).unwrap();
        let s  = ds.get(0).unwrap();
        assert_eq!(s.input_ids.len(), 16);
        assert_eq!(s.labels.len(), 16);
        // Fully occupied: no padding survived truncation
        assert!(s.attention_mask.iter().all(|&m| m == 1));
    }

    #[test]
    fn test_padding_masked_out() {
        let short = TrainingExample::from_correction("force", "torque");
        let ds = ExplanationDataset::from_examples(&[short], &tokenizer(), 32).unwrap();
        let s  = ds.get(0).unwrap();
        assert_eq!(*s.attention_mask.last().unwrap(), 0);
        assert_eq!(*s.input_ids.last().unwrap(), PAD_ID);
        assert_eq!(*s.labels.last().unwrap(), PAD_ID);
    }

    #[test]
    fn test_dataset_len() {
        let ds = ExplanationDataset::from_examples(
            &[example(), example()],
            &tokenizer(),
            32,
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.sample_count(), 2);
    }
}
