mod comment_summary;

pub use comment_summary::{
    is_add_section, render_prompt, CommentSummarySection, SectionPlan, SummaryOptions,
    CHUNK_SEPARATOR, MERGE_INSTRUCTION,
};
