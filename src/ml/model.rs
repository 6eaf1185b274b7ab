use burn::{
    nn::{
        attention::{generate_autoregressive_mask, MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::infra::tokenizer_store::PAD_ID;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct ExplainModelConfig {
    pub vocab_size:         usize,
    pub max_seq_len:        usize,
    pub d_model:            usize,
    pub num_heads:          usize,
    pub num_encoder_layers: usize,
    pub num_decoder_layers: usize,
    pub d_ff:               usize,
    pub dropout:            f64,
}

impl ExplainModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ExplainModel<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.d_model).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let encoder_layers: Vec<EncoderBlock<B>> = (0..self.num_encoder_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        let decoder_layers: Vec<DecoderBlock<B>> = (0..self.num_decoder_layers)
            .map(|_| self.build_decoder_block(device))
            .collect();
        let encoder_norm = LayerNormConfig::new(self.d_model).init(device);
        let decoder_norm = LayerNormConfig::new(self.d_model).init(device);
        let lm_head      = LinearConfig::new(self.d_model, self.vocab_size).init(device);
        let dropout      = DropoutConfig::new(self.dropout).init();
        ExplainModel {
            token_embedding, position_embedding,
            encoder_layers, decoder_layers,
            encoder_norm, decoder_norm,
            lm_head, dropout,
            max_seq_len: self.max_seq_len,
        }
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let self_attn   = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.d_model, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.d_model).init(device);
        let norm1   = LayerNormConfig::new(self.d_model).init(device);
        let norm2   = LayerNormConfig::new(self.d_model).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        EncoderBlock { self_attn, ffn_linear1, ffn_linear2, norm1, norm2, dropout }
    }

    fn build_decoder_block<B: Backend>(&self, device: &B::Device) -> DecoderBlock<B> {
        let self_attn   = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let cross_attn  = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.d_model, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.d_model).init(device);
        let norm1   = LayerNormConfig::new(self.d_model).init(device);
        let norm2   = LayerNormConfig::new(self.d_model).init(device);
        let norm3   = LayerNormConfig::new(self.d_model).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        DecoderBlock {
            self_attn, cross_attn,
            ffn_linear1, ffn_linear2,
            norm1, norm2, norm3, dropout,
        }
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    pub fn forward(&self, x: Tensor<B, 3>, pad_mask: Option<Tensor<B, 2, Bool>>) -> Tensor<B, 3> {
        let mut attn_input = MhaInput::self_attn(x.clone());
        if let Some(mask) = pad_mask {
            attn_input = attn_input.mask_pad(mask);
        }
        let attn_output = self.self_attn.forward(attn_input).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

#[derive(Module, Debug)]
pub struct DecoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub cross_attn:  MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub norm3:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> DecoderBlock<B> {
    pub fn forward(
        &self,
        x:               Tensor<B, 3>,
        memory:          Tensor<B, 3>,
        causal_mask:     Tensor<B, 3, Bool>,
        memory_pad_mask: Option<Tensor<B, 2, Bool>>,
    ) -> Tensor<B, 3> {
        // Causal self-attention: a position may only see its past
        let self_out = self.self_attn
            .forward(MhaInput::self_attn(x.clone()).mask_attn(causal_mask))
            .context;
        let x = self.norm1.forward(x + self.dropout.forward(self_out));

        // Cross-attention into the encoder memory
        let mut cross_input = MhaInput::new(x.clone(), memory.clone(), memory);
        if let Some(mask) = memory_pad_mask {
            cross_input = cross_input.mask_pad(mask);
        }
        let cross_out = self.cross_attn.forward(cross_input).context;
        let x = self.norm2.forward(x + self.dropout.forward(cross_out));

        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm3.forward(x + self.dropout.forward(ffn_out))
    }
}

#[derive(Module, Debug)]
pub struct ExplainModel<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub encoder_layers:     Vec<EncoderBlock<B>>,
    pub decoder_layers:     Vec<DecoderBlock<B>>,
    pub encoder_norm:       LayerNorm<B>,
    pub decoder_norm:       LayerNorm<B>,
    pub lm_head:            Linear<B>,
    pub dropout:            Dropout,
    pub max_seq_len:        usize,
}

impl<B: Backend> ExplainModel<B> {
    /// Token + positional embedding. Encoder and decoder share both
    /// tables (the prompt and the explanation use one vocabulary).
    fn embed(&self, ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch_size, seq_len] = ids.dims();

        let tok_emb = self.token_embedding.forward(ids);

        // Self-attention is permutation-invariant, so position must be
        // injected explicitly.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        self.dropout.forward(tok_emb + pos_emb)
    }

    /// input_ids: [batch, src_len] → memory: [batch, src_len, d_model]
    pub fn encode(
        &self,
        input_ids: Tensor<B, 2, Int>,
        pad_mask:  Option<Tensor<B, 2, Bool>>,
    ) -> Tensor<B, 3> {
        let mut x = self.embed(input_ids);
        for layer in &self.encoder_layers {
            x = layer.forward(x, pad_mask.clone());
        }
        self.encoder_norm.forward(x)
    }

    /// decoder_input_ids: [batch, tgt_len] → logits: [batch, tgt_len, vocab]
    pub fn decode(
        &self,
        decoder_input_ids: Tensor<B, 2, Int>,
        memory:            Tensor<B, 3>,
        memory_pad_mask:   Option<Tensor<B, 2, Bool>>,
    ) -> Tensor<B, 3> {
        let [batch_size, tgt_len] = decoder_input_ids.dims();

        let mut x = self.embed(decoder_input_ids);
        let causal_mask = generate_autoregressive_mask::<B>(batch_size, tgt_len, &x.device());

        for layer in &self.decoder_layers {
            x = layer.forward(x, memory.clone(), causal_mask.clone(), memory_pad_mask.clone());
        }
        let x = self.decoder_norm.forward(x);
        self.lm_head.forward(x)
    }

    /// Full training pass: encode the prompt, decode the shifted
    /// target, return the next-token cross-entropy loss.
    /// Labels with the pad id contribute nothing to the loss.
    pub fn forward_loss(
        &self,
        input_ids:         Tensor<B, 2, Int>,
        encoder_pad_mask:  Tensor<B, 2, Bool>,
        decoder_input_ids: Tensor<B, 2, Int>,
        labels:            Tensor<B, 2, Int>,
    ) -> Tensor<B, 1>
    where
        B: AutodiffBackend,
    {
        let memory = self.encode(input_ids, Some(encoder_pad_mask.clone()));
        let logits = self.decode(decoder_input_ids, memory, Some(encoder_pad_mask));

        let [batch_size, tgt_len, vocab] = logits.dims();
        let ce = burn::nn::loss::CrossEntropyLossConfig::new()
            .with_pad_tokens(Some(vec![PAD_ID as usize]))
            .init(&logits.device());

        ce.forward(
            logits.reshape([batch_size * tgt_len, vocab]),
            labels.reshape([batch_size * tgt_len]),
        )
    }
}
