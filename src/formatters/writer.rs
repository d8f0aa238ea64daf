use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Line sink for rendered sections: the `--output` file, or stdout.
pub struct Writer {
    out: Box<dyn Write>,
}

impl Writer {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let out: Box<dyn Write> = match path {
            Some(p) => {
                if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let file = File::create(&p)
                    .with_context(|| format!("Failed to create {}", p.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        };
        Ok(Self { out })
    }

    pub fn write(&mut self, content: &str) -> Result<()> {
        writeln!(self.out, "{}", content)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
