//! End-to-end behavior of the corpus manager over real files.

mod common;

use common::{doc, open_corpus, setup_test_logging, temp_dir};
use docseek::domain::errors::CorpusError;
use docseek::domain::models::Reconciliation;
use docseek::infrastructure::extraction::extract_file;

#[tokio::test]
async fn test_empty_corpus_search_is_a_warning_not_a_crash() {
    let dir = temp_dir();
    let (corpus, report) = open_corpus(dir.path()).await;

    assert_eq!(report.reconciliation, Reconciliation::Empty);
    assert!(matches!(
        corpus.search("x", 3).await,
        Err(CorpusError::EmptyCorpus)
    ));
}

#[tokio::test]
async fn test_add_hello_and_find_it() {
    setup_test_logging();
    let dir = temp_dir();
    let (corpus, _) = open_corpus(dir.path()).await;

    corpus.add_documents(vec![doc("a.txt", "hello")]).await.unwrap();

    let chunks: Vec<String> = corpus
        .chunks()
        .into_iter()
        .map(|c| c.into_text())
        .collect();
    assert_eq!(chunks, vec!["--- Source: a.txt ---\nhello".to_string()]);
    assert_eq!(corpus.index_rows(), Some(1));

    let hits = corpus
        .search("--- Source: a.txt ---\nhello", 1)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk.text(), "--- Source: a.txt ---\nhello");
    assert_eq!(hits[0].relevance_percent(), "100.00%");
}

#[tokio::test]
async fn test_hashed_backend_counts_header_tokens() {
    let dir = temp_dir();
    let (corpus, _) = open_corpus(dir.path()).await;
    corpus.add_documents(vec![doc("a.txt", "hello")]).await.unwrap();

    // "source", "a", "txt" and "hello" fall in distinct buckets, so the body
    // word alone sits at cosine 0.5 from the chunk.
    let hits = corpus.search("hello", 1).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!((hits[0].distance - 1.0).abs() < 1e-5);
    assert!(hits[0].relevance < 1e-5);
    assert_eq!(hits[0].relevance_percent(), "0.00%");
}

#[tokio::test]
async fn test_delete_first_of_two() {
    let dir = temp_dir();
    let (corpus, _) = open_corpus(dir.path()).await;
    corpus
        .add_documents(vec![
            doc("first.txt", "apples and pears"),
            doc("second.txt", "rust borrow checker"),
        ])
        .await
        .unwrap();

    corpus.remove_document(0).await.unwrap();

    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.chunks()[0].source_name(), "second.txt");
    assert_eq!(corpus.index_rows(), Some(1));

    let hits = corpus.search("apples and pears", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].row_id, 0);
    assert_eq!(hits[0].source, "second.txt");
}

#[tokio::test]
async fn test_k_above_corpus_size_returns_all_rows() {
    let dir = temp_dir();
    let (corpus, _) = open_corpus(dir.path()).await;
    corpus
        .add_documents(vec![doc("a.txt", "one"), doc("b.txt", "two")])
        .await
        .unwrap();

    let hits = corpus.search("one", 5).await.unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_persisted_state_survives_reopen() {
    let dir = temp_dir();
    let before = {
        let (corpus, _) = open_corpus(dir.path()).await;
        corpus
            .add_documents(vec![
                doc("a.txt", "ocean tides and moon"),
                doc("b.txt", "compiler lexer parser"),
                doc("c.txt", "tides of the ocean"),
            ])
            .await
            .unwrap();
        corpus.search("ocean tides", 3).await.unwrap()
    };

    let (corpus, report) = open_corpus(dir.path()).await;
    assert_eq!(report.reconciliation, Reconciliation::Consistent);
    assert_eq!(report.chunks, 3);

    let after = corpus.search("ocean tides", 3).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_removing_everything_does_not_resurrect_on_reopen() {
    let dir = temp_dir();
    {
        let (corpus, _) = open_corpus(dir.path()).await;
        corpus.add_documents(vec![doc("a.txt", "gone soon")]).await.unwrap();
        corpus.remove_document(0).await.unwrap();
    }

    let (corpus, report) = open_corpus(dir.path()).await;
    assert_eq!(report.reconciliation, Reconciliation::Empty);
    assert!(corpus.is_empty());
}

#[tokio::test]
async fn test_crash_between_file_writes_is_repaired() {
    let dir = temp_dir();
    {
        let (corpus, _) = open_corpus(dir.path()).await;
        corpus.add_documents(vec![doc("a.txt", "alpha")]).await.unwrap();
    }
    let old_index = std::fs::read(dir.path().join("index.bin")).unwrap();
    {
        let (corpus, _) = open_corpus(dir.path()).await;
        corpus.add_documents(vec![doc("b.txt", "beta")]).await.unwrap();
    }
    // New chunk list, old index: what a crash after the first rename leaves.
    std::fs::write(dir.path().join("index.bin"), old_index).unwrap();

    let (corpus, report) = open_corpus(dir.path()).await;
    assert_eq!(
        report.reconciliation,
        Reconciliation::RebuiltRowMismatch {
            index_rows: 1,
            chunks: 2
        }
    );
    assert_eq!(corpus.index_rows(), Some(2));

    let (_, report) = open_corpus(dir.path()).await;
    assert_eq!(report.reconciliation, Reconciliation::Consistent);
}

#[tokio::test]
async fn test_add_from_files_on_disk() {
    let dir = temp_dir();
    let uploads = temp_dir();
    let text_path = uploads.path().join("notes.txt");
    let empty_path = uploads.path().join("empty.txt");
    let image_path = uploads.path().join("scan.png");
    std::fs::write(&text_path, "meeting notes about budget").unwrap();
    std::fs::write(&empty_path, "").unwrap();
    std::fs::write(&image_path, [0x89, b'P', b'N', b'G']).unwrap();

    let mut documents = Vec::new();
    for path in [&text_path, &empty_path, &image_path] {
        documents.push(extract_file(path).await.unwrap());
    }

    let (corpus, _) = open_corpus(dir.path()).await;
    let report = corpus.add_documents(documents).await.unwrap();

    assert_eq!(report.files_received, 3);
    assert_eq!(report.chunks_added, 1);
    assert_eq!(
        report.dropped,
        vec!["empty.txt".to_string(), "scan.png".to_string()]
    );
    assert_eq!(corpus.chunks()[0].source_name(), "notes.txt");
}

#[tokio::test]
async fn test_row_out_of_range_leaves_corpus_alone() {
    let dir = temp_dir();
    let (corpus, _) = open_corpus(dir.path()).await;
    corpus.add_documents(vec![doc("a.txt", "x")]).await.unwrap();

    let err = corpus.remove_document(1).await.unwrap_err();
    assert_eq!(err.to_string(), CorpusError::RowOutOfRange { row: 1, len: 1 }.to_string());
    assert_eq!(corpus.len(), 1);
}
