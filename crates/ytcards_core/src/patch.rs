//! Replacing the region between `<!-- BEGIN tag -->` and `<!-- END tag -->`

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Could not find tags {begin} and {end} in {document}")]
    MissingMarkers {
        begin: String,
        end: String,
        document: String,
    },
    #[error("tag {end} appears before {begin} in {document}")]
    MarkersOutOfOrder {
        begin: String,
        end: String,
        document: String,
    },
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn begin_marker(tag: &str) -> String {
    format!("<!-- BEGIN {tag} -->")
}

pub fn end_marker(tag: &str) -> String {
    format!("<!-- END {tag} -->")
}

/// Replaces everything between the first begin marker and the first end
/// marker with `\n{replacement}\n`. Text outside the markers is untouched.
pub fn patch_region(text: &str, tag: &str, replacement: &str) -> Result<String, PatchError> {
    patch_named(text, tag, replacement, "document")
}

fn patch_named(
    text: &str,
    tag: &str,
    replacement: &str,
    document: &str,
) -> Result<String, PatchError> {
    let begin = begin_marker(tag);
    let end = end_marker(tag);
    let (Some(begin_at), Some(end_at)) = (text.find(&begin), text.find(&end)) else {
        return Err(PatchError::MissingMarkers {
            begin,
            end,
            document: document.to_string(),
        });
    };
    let content_start = begin_at + begin.len();
    if end_at < content_start {
        return Err(PatchError::MarkersOutOfOrder {
            begin,
            end,
            document: document.to_string(),
        });
    }

    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..content_start]);
    out.push('\n');
    out.push_str(replacement);
    out.push('\n');
    out.push_str(&text[end_at..]);
    Ok(out)
}

/// A text document that carries a tagged region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedDocument {
    pub identity: String,
    pub text: String,
}

impl TaggedDocument {
    pub fn new(identity: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            text: text.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, PatchError> {
        let text = fs::read_to_string(path).map_err(|source| PatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), text))
    }

    /// Returns whether the text changed.
    pub fn patch(&mut self, tag: &str, replacement: &str) -> Result<bool, PatchError> {
        let patched = patch_named(&self.text, tag, replacement, &self.identity)?;
        if patched == self.text {
            return Ok(false);
        }
        self.text = patched;
        Ok(true)
    }

    pub fn save(&self, path: &Path) -> Result<(), PatchError> {
        fs::write(path, &self.text).map_err(|source| PatchError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
