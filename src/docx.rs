//! Word document loader.
//!
//! A `.docx` file is a zip archive whose body text lives in
//! `word/document.xml`. Extraction walks that XML, collecting `<w:t>` runs
//! and treating `</w:p>` as a paragraph break. Blank paragraphs are dropped
//! and the rest joined with newlines, one text blob per file.

use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::core::errors::ApiError;

const DOCUMENT_ENTRY: &str = "word/document.xml";

/// One loaded document: its file name and the concatenated paragraph text.
#[derive(Debug, Clone)]
pub struct LoadedDoc {
    pub source: String,
    pub text: String,
}

/// Load every `.docx` file in `dir`, sorted by file name.
///
/// Files with other extensions are skipped silently. A file that matches the
/// extension but cannot be parsed propagates the underlying error.
pub fn load_docs_dir(dir: &Path) -> Result<Vec<LoadedDoc>, ApiError> {
    if !dir.is_dir() {
        return Err(ApiError::NotFound(format!(
            "docs directory not found: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<_> = fs::read_dir(dir)
        .map_err(ApiError::internal)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
        })
        .collect();
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let text = extract_docx_text(&path)?;
        tracing::debug!("loaded {} ({} chars)", source, text.chars().count());
        docs.push(LoadedDoc { source, text });
    }

    Ok(docs)
}

/// Extract the paragraph text of a single `.docx` file.
pub fn extract_docx_text(path: &Path) -> Result<String, ApiError> {
    let file = fs::File::open(path).map_err(ApiError::internal)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| ApiError::Internal(format!("{} is not a docx archive: {}", path.display(), e)))?;

    let mut entry = archive
        .by_name(DOCUMENT_ENTRY)
        .map_err(|e| ApiError::Internal(format!("{} has no document body: {}", path.display(), e)))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(ApiError::internal)?;

    Ok(parse_document_xml(&xml))
}

/// Pull paragraph text out of WordprocessingML.
///
/// Text is captured only between `<w:t>` and `</w:t>`; everything else is
/// markup. `</w:p>` closes a paragraph.
fn parse_document_xml(xml: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut i = 0;

    while i < xml.len() {
        let Some(lt) = xml[i..].find('<') else {
            break;
        };
        let tag_start = i + lt;
        if in_text && lt > 0 {
            current.push_str(&decode_entities(&xml[i..tag_start]));
        }

        let Some(gt) = xml[tag_start..].find('>') else {
            break;
        };
        let tag = &xml[tag_start + 1..tag_start + gt];

        if is_text_open_tag(tag) {
            in_text = !tag.ends_with('/');
        } else if tag == "/w:t" {
            in_text = false;
        } else if tag == "/w:p" {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                paragraphs.push(trimmed.to_string());
            }
            current.clear();
        }

        i = tag_start + gt + 1;
    }

    paragraphs.join("\n")
}

fn is_text_open_tag(tag: &str) -> bool {
    match tag.strip_prefix("w:t") {
        Some(rest) => rest.is_empty() || rest.starts_with(' ') || rest == "/",
        None => false,
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
