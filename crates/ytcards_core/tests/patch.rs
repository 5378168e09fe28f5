use std::fs;

use tempfile::TempDir;
use ytcards_core::patch::{PatchError, TaggedDocument};

const README: &str = "# Hello\n\n<!-- BEGIN YOUTUBE-CARDS -->\n<!-- END YOUTUBE-CARDS -->\n\nBye\n";

#[test]
fn patches_file_in_place() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("README.md");
    fs::write(&path, README).expect("write readme");

    let mut doc = TaggedDocument::load(&path).expect("load");
    assert!(doc.patch("YOUTUBE-CARDS", "[card one]\n[card two]").expect("patch"));
    doc.save(&path).expect("save");

    let written = fs::read_to_string(&path).expect("read back");
    assert_eq!(
        written,
        "# Hello\n\n<!-- BEGIN YOUTUBE-CARDS -->\n[card one]\n[card two]\n<!-- END YOUTUBE-CARDS -->\n\nBye\n"
    );

    let mut again = TaggedDocument::load(&path).expect("reload");
    assert!(!again.patch("YOUTUBE-CARDS", "[card one]\n[card two]").expect("repatch"));
    assert_eq!(again.text, written);
}

#[test]
fn errors_name_the_file() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("README.md");
    fs::write(&path, "no markers here\n").expect("write readme");

    let mut doc = TaggedDocument::load(&path).expect("load");
    let err = doc.patch("YOUTUBE-CARDS", "x").expect_err("missing markers");
    assert!(matches!(err, PatchError::MissingMarkers { .. }));
    let message = err.to_string();
    assert!(message.contains("<!-- BEGIN YOUTUBE-CARDS -->"));
    assert!(message.contains(&path.display().to_string()));
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = TempDir::new().expect("tempdir");
    let err = TaggedDocument::load(&temp.path().join("absent.md")).expect_err("absent");
    assert!(matches!(err, PatchError::Io { .. }));
}
