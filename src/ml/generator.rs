// ============================================================
// Layer 5 — Generator (Inference Engine)
// ============================================================
// Produces the free-text explanatory half of an answer: builds the
// conditioning prompt, runs beam-search generation against the
// live model, and decodes the winning token sequence.
//
// The generation hyperparameters are fixed, not caller-
// configurable: max output length 150, beam width 5, no-repeat
// bigram constraint, early stopping once every surviving beam has
// emitted the end token. No retry, no timeout — a failure here is
// a failure for this one request only.

use std::collections::HashSet;

use anyhow::{Context, Result};
use burn::prelude::*;
use burn::tensor::activation::log_softmax;

use crate::domain::training_example::build_input_text;
use crate::infra::tokenizer_store::{BOS_ID, EOS_ID, MASK_ID, PAD_ID, UNK_ID};
use crate::ml::lifecycle::ModelState;
use crate::ml::InferBackend;

/// Hard cap on generated tokens per answer
const MAX_OUTPUT_LEN: usize = 150;
/// Number of candidate sequences kept alive per step
const BEAM_WIDTH: usize = 5;
/// A generated bigram may never repeat within one beam
const NO_REPEAT_NGRAM: usize = 2;

/// One candidate output sequence during beam search.
#[derive(Debug, Clone)]
struct Beam {
    ids:      Vec<u32>,
    score:    f64,
    finished: bool,
}

pub struct Generator;

impl Generator {
    pub fn new() -> Self {
        Self
    }

    /// Generate the explanatory text for a question against the
    /// given model state. The caller holds the lifecycle lock for
    /// the duration of this call.
    pub fn generate(&self, question: &str, state: &ModelState) -> Result<String> {
        let input_text = build_input_text(question);

        // ── Encode the prompt once ────────────────────────────────────────────
        let encoding = state
            .tokenizer
            .encode(input_text.as_str(), false)
            .map_err(|e| anyhow::anyhow!("Prompt tokenisation failed: {e}"))?;
        let mut prompt_ids: Vec<u32> = encoding.get_ids().to_vec();
        prompt_ids.truncate(state.max_seq_len);

        let prompt_flat: Vec<i32> = prompt_ids.iter().map(|&x| x as i32).collect();
        let prompt_tensor = Tensor::<InferBackend, 1, Int>::from_ints(
            prompt_flat.as_slice(),
            &state.device,
        )
        .unsqueeze::<2>();

        let memory = state.model.encode(prompt_tensor, None);

        // ── Beam search ───────────────────────────────────────────────────────
        // Decoder positions are bounded by the position table, so the
        // effective cap is the smaller of the two limits.
        let max_steps = MAX_OUTPUT_LEN.min(state.max_seq_len.saturating_sub(1));

        let mut beams = vec![Beam {
            ids:      vec![BOS_ID],
            score:    0.0,
            finished: false,
        }];

        for _step in 0..max_steps {
            let mut candidates: Vec<Beam> = Vec::with_capacity(beams.len() * BEAM_WIDTH);

            for beam in &beams {
                if beam.finished {
                    candidates.push(beam.clone());
                    continue;
                }

                let log_probs = self.next_token_log_probs(beam, &memory, state);
                let banned    = banned_next_tokens(&beam.ids);

                for (token, log_prob) in top_candidates(&log_probs, &banned, BEAM_WIDTH) {
                    let mut ids = beam.ids.clone();
                    ids.push(token);
                    candidates.push(Beam {
                        finished: token == EOS_ID,
                        score:    beam.score + log_prob as f64,
                        ids,
                    });
                }
            }

            candidates.sort_by(|a, b| {
                b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal)
            });
            candidates.truncate(BEAM_WIDTH);
            beams = candidates;

            // Early stopping: every surviving beam has ended
            if beams.iter().all(|b| b.finished) {
                break;
            }
        }

        let best = beams.first().context("beam search produced no candidates")?;

        // ── Decode, stripping model-internal control tokens ───────────────────
        let output_ids: Vec<u32> = best
            .ids
            .iter()
            .copied()
            .filter(|id| !is_special(*id))
            .collect();

        let answer = state
            .tokenizer
            .decode(&output_ids, true)
            .map_err(|e| anyhow::anyhow!("Decode failed: {e}"))?;

        // Belt and braces: some tokenizer configs render specials as text
        let answer = answer
            .replace("[CLS]", "")
            .replace("[SEP]", "")
            .replace("[PAD]", "")
            .trim()
            .to_string();

        tracing::debug!("Generated {} tokens, score={:.4}", best.ids.len(), best.score);
        Ok(answer)
    }

    /// Run the decoder over one beam's sequence and return the
    /// log-probabilities for the next token.
    fn next_token_log_probs(&self, beam: &Beam, memory: &Tensor<InferBackend, 3>, state: &ModelState) -> Vec<f32> {
        let ids_flat: Vec<i32> = beam.ids.iter().map(|&x| x as i32).collect();
        let decoder_input = Tensor::<InferBackend, 1, Int>::from_ints(
            ids_flat.as_slice(),
            &state.device,
        )
        .unsqueeze::<2>();

        let logits = state.model.decode(decoder_input, memory.clone(), None);
        let [_, tgt_len, vocab] = logits.dims();

        let last = logits
            .slice([0..1, (tgt_len - 1)..tgt_len, 0..vocab])
            .reshape([vocab]);

        log_softmax(last, 0)
            .into_data()
            .to_vec::<f32>()
            .unwrap_or_default()
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokens that would repeat an already-generated bigram if emitted
/// next. With NO_REPEAT_NGRAM = 2: every token that ever followed
/// the current last token is banned from following it again.
fn banned_next_tokens(ids: &[u32]) -> HashSet<u32> {
    let mut banned = HashSet::new();
    if let Some(&last) = ids.last() {
        for window in ids.windows(NO_REPEAT_NGRAM) {
            if window[0] == last {
                banned.insert(window[1]);
            }
        }
    }
    banned
}

/// Top-k (token, log-prob) pairs, best first, skipping banned ids.
fn top_candidates(log_probs: &[f32], banned: &HashSet<u32>, k: usize) -> Vec<(u32, f32)> {
    let mut ranked: Vec<(u32, f32)> = log_probs
        .iter()
        .enumerate()
        .map(|(id, &lp)| (id as u32, lp))
        .filter(|(id, _)| !banned.contains(id))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(k);
    ranked
}

fn is_special(id: u32) -> bool {
    matches!(id, PAD_ID | UNK_ID | BOS_ID | EOS_ID | MASK_ID)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banned_bigram_repeats() {
        // Sequence ... 7 9 ... 7 — token 9 must not follow 7 again
        let ids = vec![BOS_ID, 7, 9, 12, 7];
        let banned = banned_next_tokens(&ids);
        assert!(banned.contains(&9));
        assert!(!banned.contains(&12));
    }

    #[test]
    fn test_nothing_banned_at_start() {
        assert!(banned_next_tokens(&[BOS_ID]).is_empty());
    }

    #[test]
    fn test_top_candidates_order_and_ban() {
        let log_probs = vec![-3.0, -0.5, -1.0, -0.1];
        let banned: HashSet<u32> = [3].into_iter().collect();

        let top = top_candidates(&log_probs, &banned, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, 1); // -0.5 is best once 3 (-0.1) is banned
        assert_eq!(top[1].0, 2);
    }

    #[test]
    fn test_special_ids_are_stripped() {
        assert!(is_special(PAD_ID));
        assert!(is_special(BOS_ID));
        assert!(is_special(EOS_ID));
        assert!(!is_special(500));
    }
}
