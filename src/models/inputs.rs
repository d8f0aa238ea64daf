/// Caller-supplied knobs for a summarization run.
#[derive(Debug, Clone)]
pub struct Inputs {
    /// Completion model identifier, e.g. `text-davinci-003`
    pub model: String,
    /// Max tokens requested for every completion
    pub max_tokens: usize,
    pub add_comment_summary_section: bool,
}
