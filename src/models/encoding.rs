use clap::ValueEnum;
use std::fmt;

/// BPE vocabularies understood by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    Cl100kBase,
    P50kBase,
    R50kBase,
}

impl Encoding {
    /// Picks the vocabulary a completion model was trained with.
    /// Unknown models fall back to `cl100k_base`.
    pub fn for_model(model: &str) -> Self {
        let model = model.trim();
        if model.starts_with("gpt-4")
            || model.starts_with("gpt-3.5")
            || model.starts_with("text-embedding")
        {
            Encoding::Cl100kBase
        } else if model.starts_with("text-davinci-002")
            || model.starts_with("text-davinci-003")
            || model.starts_with("code-")
        {
            Encoding::P50kBase
        } else if model.starts_with("text-")
            || matches!(model, "davinci" | "curie" | "babbage" | "ada")
        {
            Encoding::R50kBase
        } else {
            Encoding::Cl100kBase
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Cl100kBase => write!(f, "cl100k_base"),
            Encoding::P50kBase => write!(f, "p50k_base"),
            Encoding::R50kBase => write!(f, "r50k_base"),
        }
    }
}
