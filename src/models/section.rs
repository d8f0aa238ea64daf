use serde::{Deserialize, Serialize};

/// One titled block of generated content, handed to the report assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySection {
    pub prompt: String,
    pub title: String,
    pub description: String,
}
