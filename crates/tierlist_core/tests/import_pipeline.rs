use std::sync::Arc;
use std::time::Duration;
use tierlist_core::{
    export_document, Document, ImportCommit, ImportError, ImportPipeline, KvDocumentStore,
    MemoryKvRepository, NewThing, StoreError, ThingId, Tier, TierId, TierStore,
};
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;

type MemoryPipeline = ImportPipeline<KvDocumentStore<Arc<MemoryKvRepository>>>;

fn pipeline() -> MemoryPipeline {
    let kv = Arc::new(MemoryKvRepository::new());
    ImportPipeline::new(TierStore::open(KvDocumentStore::new(kv)).into_shared())
}

fn document_with(title: &str) -> Document {
    let mut queue = Tier::new(0, "*", None);
    queue.id = TierId::from("queue");
    let mut top = Tier::new(1, "S", Some("#ff7f7e"));
    top.id = TierId::from("top");
    Document {
        tiers: vec![queue, top],
        things: vec![NewThing::text(title).with_id(ThingId::from(title))],
    }
}

#[tokio::test(start_paused = true)]
async fn loading_lasts_at_least_the_minimum_duration() {
    let pipeline = pipeline();
    let bytes = export_document(&document_with("fast")).unwrap();

    let started = Instant::now();
    let commit = pipeline
        .import_picked("list.json", None, &bytes[..])
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(
        commit,
        ImportCommit::Committed {
            tiers: 2,
            things: 1,
            cleared_placements: 0,
        }
    );
    let store = pipeline.store().lock();
    assert_eq!(store.document(), &document_with("fast"));
    assert!(!store.state().loading);
}

#[tokio::test(start_paused = true)]
async fn store_stays_usable_while_import_is_pending() {
    let pipeline = pipeline();
    let bytes = export_document(&document_with("imported")).unwrap();
    let (mut writer, reader) = tokio::io::duplex(1024);

    let import = pipeline.import_picked("list.json", Some("application/json"), reader);
    let driver = async {
        tokio::task::yield_now().await;
        {
            let mut store = pipeline.store().lock();
            assert!(store.state().loading);
            store.add(NewThing::text("meanwhile"), None);
            assert_eq!(store.document().things.len(), 1);
        }
        writer.write_all(&bytes).await.unwrap();
        drop(writer);
    };

    let (result, ()) = tokio::join!(import, driver);
    result.unwrap();

    let store = pipeline.store().lock();
    assert_eq!(store.document(), &document_with("imported"));
    assert!(!store.state().loading);
}

#[tokio::test(start_paused = true)]
async fn newer_import_wins_over_older_one() {
    let pipeline = pipeline();
    let older = export_document(&document_with("older")).unwrap();
    let newer = export_document(&document_with("newer")).unwrap();
    let (mut writer, slow_reader) = tokio::io::duplex(1024);

    let first = pipeline.import_picked("old.json", None, slow_reader);
    let second = pipeline.import_picked("new.json", None, &newer[..]);
    let feed = async {
        writer.write_all(&older).await.unwrap();
        drop(writer);
    };

    let (first, second, ()) = tokio::join!(first, second, feed);
    assert_eq!(first.unwrap(), ImportCommit::Superseded);
    assert!(matches!(second.unwrap(), ImportCommit::Committed { .. }));

    let store = pipeline.store().lock();
    assert_eq!(store.document(), &document_with("newer"));
    assert!(!store.state().loading);
}

#[tokio::test(start_paused = true)]
async fn malformed_import_keeps_document_and_clears_loading() {
    let pipeline = pipeline();
    let before = pipeline.store().lock().document().clone();

    let err = pipeline
        .import_picked("broken.json", None, &b"{\"things\": 1}"[..])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ImportError::Rejected(StoreError::MalformedImport(_))
    ));
    let store = pipeline.store().lock();
    assert_eq!(store.document(), &before);
    assert!(!store.state().loading);
    assert!(store.state().import_error.is_some());
}

#[tokio::test]
async fn unsupported_files_never_start_loading() {
    let pipeline = pipeline();

    let err = pipeline
        .import_picked("notes.txt", Some("text/plain"), &b"{}"[..])
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFile(_)));

    let err = pipeline.import_file("/tmp/list.csv").await.unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFile(_)));
    assert!(!pipeline.store().lock().state().loading);
}

#[tokio::test]
async fn import_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tier-list.json");
    std::fs::write(&path, export_document(&document_with("disk")).unwrap()).unwrap();

    let pipeline = pipeline().with_min_loading(Duration::from_millis(1));
    let commit = pipeline.import_file(&path).await.unwrap();

    assert!(matches!(commit, ImportCommit::Committed { things: 1, .. }));
    assert_eq!(pipeline.store().lock().document(), &document_with("disk"));
}

#[tokio::test]
async fn missing_file_reports_io_error_and_clears_loading() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline().with_min_loading(Duration::ZERO);

    let err = pipeline
        .import_file(dir.path().join("absent.json"))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::Io(_)));
    assert!(!pipeline.store().lock().state().loading);
}
