use tempfile::tempdir;

// One test only: log4rs accepts a single global install per process.

#[test]
fn init_for_catalog_in_writes_under_the_base_dir() {
    let dir = tempdir().unwrap();
    bookshelf::logger::init_for_catalog_in(dir.path(), "catalog").unwrap();
    log::info!("catalog logging alive");

    let logfile = dir.path().join("catalog_logs").join("catalog.log");
    assert!(logfile.exists());

    // a second install is rejected
    assert!(bookshelf::logger::init().is_err());
}
