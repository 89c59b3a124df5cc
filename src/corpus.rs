//! Corpus loading.
//!
//! Documents are plain text files. The multi-author dataset layout is
//! `<root>/<author_id>/<index>.txt` with author ids starting at 1 and
//! document indexes at 0.

use std::fs;
use std::path::Path;

use crate::errors::{EchoError, Result};

/// Read one document.
pub fn load_document(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| EchoError::Io(format!("{}: {e}", path.display())))
}

/// Load an author's text: a single file as-is, or the first `n_files`
/// `.txt` files of a directory (sorted by name) concatenated.
pub fn load_author_text(path: &Path, n_files: Option<usize>) -> Result<String> {
    if path.is_file() {
        return load_document(path);
    }
    if !path.is_dir() {
        return Err(EchoError::Io(format!("{}: no such file or directory", path.display())));
    }

    let mut files: Vec<_> = fs::read_dir(path)
        .map_err(|e| EchoError::Io(format!("{}: {e}", path.display())))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    if let Some(n) = n_files {
        files.truncate(n);
    }
    if files.is_empty() {
        return Err(EchoError::Data(format!(
            "{}: no .txt files to analyze",
            path.display()
        )));
    }

    let mut text = String::new();
    for file in &files {
        text.push_str(&load_document(file)?);
        text.push('\n');
    }
    Ok(text)
}

/// Load the full authors dataset: `n_documents` texts for each of
/// `n_authors` authors, in author-major order. The flat index of author
/// a's document d is `(a - 1) * n_documents + d`.
pub fn load_dataset(root: &Path, n_authors: usize, n_documents: usize) -> Result<Vec<String>> {
    if n_authors == 0 || n_documents == 0 {
        return Err(EchoError::Config(
            "n_authors and n_documents must be > 0".into(),
        ));
    }

    let mut documents = Vec::with_capacity(n_authors * n_documents);
    for author_id in 1..=n_authors {
        let author_dir = root.join(author_id.to_string());
        for file_index in 0..n_documents {
            let file_path = author_dir.join(format!("{file_index}.txt"));
            documents.push(load_document(&file_path)?);
        }
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("echotext-corpus-{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(path: &Path, content: &str) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_author_directory() {
        let dir = scratch_dir("author");
        write_file(&dir.join("0.txt"), "first text");
        write_file(&dir.join("1.txt"), "second text");
        write_file(&dir.join("notes.md"), "ignored");

        let all = load_author_text(&dir, None).unwrap();
        assert!(all.contains("first text"));
        assert!(all.contains("second text"));
        assert!(!all.contains("ignored"));

        let limited = load_author_text(&dir, Some(1)).unwrap();
        assert!(limited.contains("first text"));
        assert!(!limited.contains("second text"));
    }

    #[test]
    fn test_load_dataset_layout() {
        let root = scratch_dir("dataset");
        for author in 1..=2 {
            let author_dir = root.join(author.to_string());
            fs::create_dir_all(&author_dir).unwrap();
            for doc in 0..2 {
                write_file(&author_dir.join(format!("{doc}.txt")), &format!("a{author} d{doc}"));
            }
        }

        let documents = load_dataset(&root, 2, 2).unwrap();
        assert_eq!(documents.len(), 4);
        assert_eq!(documents[0], "a1 d0");
        assert_eq!(documents[3], "a2 d1");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let root = scratch_dir("missing");
        assert!(matches!(
            load_dataset(&root, 1, 1),
            Err(EchoError::Io(_))
        ));
    }
}
