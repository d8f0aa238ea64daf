mod chunk_report;
mod comment;
mod encoding;
mod inputs;
mod issue;
mod output_format;
mod section;

pub use chunk_report::ChunkReport;
pub use comment::{project_comments, serialize_comments, Comment, RawComment, RawUser, BOT_LOGIN};
pub use encoding::Encoding;
pub use inputs::Inputs;
pub use issue::{IssueContext, IssueRef};
pub use output_format::OutputFormat;
pub use section::SummarySection;
