// ============================================================
// Layer 4 — Seq2Seq Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<Seq2SeqSample>
// into GPU-ready tensors.
//
// How batching works here:
//   Input:  Vec of N samples, each with sequences of length S
//   Output: Seq2SeqBatch with Int tensors of shape [N, S]
//
//   We flatten each field into one long Vec, then reshape:
//   [s1_t1, ..., s1_tS, s2_t1, ..., sN_tS] → [N, S]
//
// All sequences are already padded to the same length by the
// dataset, so no dynamic padding is needed here. The encoder pad
// mask is derived once, as a Bool tensor, so the attention layers
// can ignore padded key positions.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::Seq2SeqSample;

// ─── Seq2SeqBatch ─────────────────────────────────────────────────────────────
/// A batch of seq2seq samples ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
#[derive(Debug, Clone)]
pub struct Seq2SeqBatch<B: Backend> {
    /// Prompt token ids — shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// True at padded encoder positions — shape: [batch_size, seq_len]
    pub encoder_pad_mask: Tensor<B, 2, Bool>,

    /// Shifted target ids fed to the decoder — [batch_size, seq_len]
    pub decoder_input_ids: Tensor<B, 2, Int>,

    /// Next-token labels, pad id 0 where unused — [batch_size, seq_len]
    pub labels: Tensor<B, 2, Int>,
}

// ─── Seq2SeqBatcher ───────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the correct
/// GPU/CPU. Generic over the backend so the same batcher serves
/// training and inference.
#[derive(Clone, Debug)]
pub struct Seq2SeqBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> Seq2SeqBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    fn stack(&self, items: &[Seq2SeqSample], field: impl Fn(&Seq2SeqSample) -> &[u32]) -> Tensor<B, 2, Int> {
        let batch_size = items.len();
        let seq_len    = field(&items[0]).len();

        let flat: Vec<i32> = items
            .iter()
            .flat_map(|s| field(s).iter().map(|&x| x as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len])
    }
}

impl<B: Backend> Batcher<Seq2SeqSample, Seq2SeqBatch<B>> for Seq2SeqBatcher<B> {
    fn batch(&self, items: Vec<Seq2SeqSample>) -> Seq2SeqBatch<B> {
        let input_ids         = self.stack(&items, |s| &s.input_ids);
        let attention_mask    = self.stack(&items, |s| &s.attention_mask);
        let decoder_input_ids = self.stack(&items, |s| &s.decoder_input_ids);
        let labels            = self.stack(&items, |s| &s.labels);

        // attention_mask is 1 for real tokens; the pad mask is its inverse
        let encoder_pad_mask = attention_mask.equal_elem(0);

        Seq2SeqBatch {
            input_ids,
            encoder_pad_mask,
            decoder_input_ids,
            labels,
        }
    }
}
