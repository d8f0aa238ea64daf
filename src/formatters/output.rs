use anyhow::Result;

use super::Writer;
use crate::models::{OutputFormat, SummarySection};

pub fn print_sections(
    writer: &mut Writer,
    sections: &[SummarySection],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Markdown => print_as_markdown(writer, sections)?,
        OutputFormat::Json => print_as_json(writer, sections)?,
    }
    writer.flush()
}

pub fn print_as_markdown(writer: &mut Writer, sections: &[SummarySection]) -> Result<()> {
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            writer.write("")?;
        }
        writer.write(&format!("### {}", section.title))?;
        writer.write("")?;
        writer.write(section.description.trim())?;
    }
    Ok(())
}

pub fn print_as_json(writer: &mut Writer, sections: &[SummarySection]) -> Result<()> {
    writer.write(&serde_json::to_string_pretty(sections)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn section() -> SummarySection {
        SummarySection {
            prompt: "Summarize".to_string(),
            title: "Comment summary".to_string(),
            description: "\nEveryone agrees to ship.\n".to_string(),
        }
    }

    #[test]
    fn markdown_has_heading_and_trimmed_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        let mut writer = Writer::new(Some(path.clone())).unwrap();

        print_sections(&mut writer, &[section()], OutputFormat::Markdown).unwrap();
        drop(writer);

        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "### Comment summary\n\nEveryone agrees to ship.\n"
        );
    }

    #[test]
    fn json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut writer = Writer::new(Some(path.clone())).unwrap();

        print_sections(&mut writer, &[section()], OutputFormat::Json).unwrap();
        drop(writer);

        let parsed: Vec<SummarySection> =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, vec![section()]);
    }
}
