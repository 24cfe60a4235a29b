use mcstore::{shared_connection, McConfig, INITIAL_SCHEMA_VERSION};
use std::sync::mpsc;
use std::time::Duration;

// One test function: the handle is process-wide, so every check shares it.
#[test]
fn shared_connection_opens_once_per_process() {
    let dir = tempfile::tempdir().unwrap();
    let config = McConfig {
        data_dir: dir.path().to_string_lossy().to_string(),
        db_file_name: "app.db".to_string(),
        testing: true,
    };

    let first = {
        let db = shared_connection(&config).unwrap();
        assert_eq!(db.schema_version().unwrap(), INITIAL_SCHEMA_VERSION);
        assert_eq!(db.last_migration().applied, vec![INITIAL_SCHEMA_VERSION]);
        assert!(db
            .phrases()
            .list()
            .unwrap()
            .iter()
            .all(|p| p.title.starts_with("Test phrase")));
        db.connection() as *const rusqlite::Connection as usize
    };
    assert!(dir.path().join("app.db").exists());

    // Later calls ignore their configuration and hand out the same handle
    let other = tempfile::tempdir().unwrap();
    let elsewhere = McConfig {
        data_dir: other.path().to_string_lossy().to_string(),
        ..config.clone()
    };
    {
        let db = shared_connection(&elsewhere).unwrap();
        assert_eq!(db.connection() as *const rusqlite::Connection as usize, first);
    }
    assert!(!other.path().join("app.db").exists());

    // Two handles held at once on the same thread
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let outer = shared_connection(&config).unwrap();
        let inner = shared_connection(&config).unwrap();
        let same = std::ptr::eq(outer.connection(), inner.connection());
        let count = inner.settings().count().unwrap();
        drop(inner);
        let version = outer.schema_version().unwrap();
        tx.send((same, count, version)).unwrap();
    });

    let (same, count, version) = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("nested shared_connection calls did not return");
    assert!(same);
    assert_eq!(count, 1);
    assert_eq!(version, INITIAL_SCHEMA_VERSION);
}
