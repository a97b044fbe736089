use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::{const_mutex, Mutex};
use tierlist_core::{
    export_document, Document, KvDocumentStore, MemoryKvRepository, TierStore, STORAGE_KEY,
};

static LINES: Mutex<Vec<String>> = const_mutex(Vec::new());

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        LINES.lock().push(record.args().to_string());
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

fn open_and_collect(kv: MemoryKvRepository) -> Vec<String> {
    LINES.lock().clear();
    TierStore::open(KvDocumentStore::new(kv));
    LINES
        .lock()
        .iter()
        .filter(|line| line.starts_with("event=doc_load "))
        .cloned()
        .collect()
}

// One test per binary: the logger is process-global.
#[test]
fn open_reports_doc_load_for_every_source() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let absent = open_and_collect(MemoryKvRepository::new());
    assert_eq!(absent, vec!["event=doc_load module=store status=absent".to_string()]);

    let bytes = export_document(&Document::with_default_tiers()).unwrap();
    let persisted = open_and_collect(MemoryKvRepository::with_entry(STORAGE_KEY, bytes));
    assert_eq!(
        persisted,
        vec!["event=doc_load module=store status=ok tiers=6 things=0".to_string()]
    );

    let unavailable = MemoryKvRepository::new();
    unavailable.set_unavailable(true);
    let failed = open_and_collect(unavailable);
    assert_eq!(failed.len(), 1);
    assert!(failed[0].starts_with("event=doc_load module=store status=error error="));
}
