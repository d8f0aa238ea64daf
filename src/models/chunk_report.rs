/// Token accounting for one run, shown by `--dry-run`.
#[derive(Debug, Default, Clone)]
pub struct ChunkReport {
    pub comment_count: usize,
    pub prompt_tokens: usize,
    pub budget: usize,
    pub chunk_tokens: Vec<usize>,
    pub total_tokens: usize,
}

impl ChunkReport {
    pub fn new(comment_count: usize, prompt_tokens: usize, budget: usize) -> Self {
        Self {
            comment_count,
            prompt_tokens,
            budget,
            chunk_tokens: Vec::new(),
            total_tokens: 0,
        }
    }

    pub fn add_chunk(&mut self, token_count: usize) {
        self.chunk_tokens.push(token_count);
        self.total_tokens += token_count;
    }

    /// Chunk requests plus the merge request.
    pub fn completion_requests(&self) -> usize {
        self.chunk_tokens.len() + 1
    }
}
