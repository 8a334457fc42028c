//! Build an index from text files on disk, persist it, reload it and query it.

use folio::indexing::PipelineConfig;
use folio::{
    DocumentId, IndexError, IndexPersistence, IndexResult, Match, Pipeline, PlainTextProvider,
    build_index, deserialize, search, serialize,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write_corpus(root: &Path) {
    fs::write(
        root.join("tropical.txt"),
        "The cause of Malaria is a parasite.\u{c}Mosquitoes transmit the disease.",
    )
    .unwrap();
    fs::create_dir_all(root.join("more")).unwrap();
    fs::write(
        root.join("more/history.txt"),
        "Ross studied the Malaria parasite in birds.\nHe won a prize.",
    )
    .unwrap();
    // Not an accepted extension
    fs::write(root.join("cover.png"), "Malaria parasite").unwrap();
    // Hidden directories are skipped
    fs::create_dir_all(root.join(".cache")).unwrap();
    fs::write(root.join(".cache/copy.txt"), "The Malaria parasite").unwrap();
}

fn build_and_search(root: &Path, index_path: &Path, query: &str) -> IndexResult<Vec<Match>> {
    let pipeline = Pipeline::new(
        Arc::new(PlainTextProvider::new()),
        PipelineConfig::default().with_document_workers(2).with_page_workers(2),
    );
    let stats = pipeline.index_directory(root, &IndexPersistence::new(index_path))?;
    assert_eq!(stats.documents_found, 2);
    assert_eq!(stats.pages_indexed, 3);

    let session = IndexPersistence::new(index_path).load()?;
    assert_eq!(session.paths.len(), 2);
    Ok(search(query, &session.index, &[])?)
}

#[test]
fn test_build_persist_and_search() {
    let corpus = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_corpus(corpus.path());

    let matches =
        build_and_search(corpus.path(), &out.path().join("index.bin"), "malaria parasite").unwrap();

    let names: Vec<&str> = matches.iter().map(|m| m.base_name.as_str()).collect();
    assert!(names.contains(&"tropical.txt"));
    assert!(names.contains(&"history.txt"));
    assert!(matches.iter().all(|m| m.page_num == 0));
    assert!(matches.windows(2).all(|w| w[0].score <= w[1].score));
}

#[test]
fn test_scoped_search_after_reload() {
    let corpus = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_corpus(corpus.path());
    let index_path = out.path().join("index.bin");
    build_and_search(corpus.path(), &index_path, "malaria parasite").unwrap();

    let session = IndexPersistence::new(&index_path).load().unwrap();
    let tropical = session
        .paths
        .iter()
        .find(|(_, path)| path.ends_with("tropical.txt"))
        .map(|(id, _)| id)
        .unwrap();

    let scoped = search("malaria parasite", &session.index, &[tropical]).unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].id, tropical);
    assert_eq!(session.paths.resolve(scoped[0].id), Some(scoped[0].filename.as_path()));

    let unknown = search("malaria parasite", &session.index, &[DocumentId::new(1)]).unwrap();
    assert!(unknown.is_empty());
}

#[test]
fn test_serialize_free_functions() {
    let out = TempDir::new().unwrap();
    let index_path = out.path().join("books.bin");
    let records = vec![
        folio::PageRecord::new("/docs/a.txt", 0, "The cause of Malaria is a parasite."),
        folio::PageRecord::new("/docs/a.txt", 1, "Mosquitoes transmit the disease."),
    ];
    let index = build_index(records);
    let paths = folio::PathIdentityCache::from_paths(["/docs/a.txt"]);

    serialize(&index, &paths, &index_path).unwrap();
    assert_eq!(deserialize(&index_path).unwrap(), index);
}

#[test]
fn test_corrupt_index_is_reported() {
    let out = TempDir::new().unwrap();
    let index_path = out.path().join("index.bin");
    fs::write(&index_path, b"not an index at all").unwrap();

    let err: IndexError = deserialize(&index_path).unwrap_err().into();
    assert!(err.is_corruption());
}

#[test]
fn test_missing_root_fails_build() {
    let out = TempDir::new().unwrap();
    let result = build_and_search(
        &out.path().join("absent"),
        &out.path().join("index.bin"),
        "anything",
    );
    assert!(matches!(result, Err(IndexError::Pipeline(_))));
}
