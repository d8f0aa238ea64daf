mod output;
mod template;
mod writer;

pub use output::{print_as_json, print_as_markdown, print_sections};
pub use template::render_template;
pub use writer::Writer;
