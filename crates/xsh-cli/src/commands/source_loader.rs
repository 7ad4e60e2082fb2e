use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Where the source comes from: a file, stdin (`-`) or inline text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceInput {
    pub path: Option<PathBuf>,
    pub text: Option<String>,
}

/// Loaded source and the name diagnostics show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

impl SourceInput {
    pub fn new(path: Option<PathBuf>, text: Option<String>) -> Self {
        Self { path, text }
    }

    pub fn load(&self) -> Result<Source, String> {
        if let Some(text) = &self.text {
            return Ok(Source {
                name: "<inline>".to_string(),
                text: text.clone(),
            });
        }
        match &self.path {
            Some(path) if path.as_os_str() == "-" => load_stdin(),
            Some(path) => load_file(path),
            None => Err("source is required: use a positional path, \"-\" or -s/--source".to_string()),
        }
    }
}

fn load_stdin() -> Result<Source, String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(Source {
        name: "<stdin>".to_string(),
        text,
    })
}

fn load_file(path: &Path) -> Result<Source, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    Ok(Source {
        name: path.display().to_string(),
        text,
    })
}
