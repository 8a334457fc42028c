use folio::Settings;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_env_override_with_nested_keys() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("settings.toml");
    fs::write(
        &config_path,
        "[indexing]\ndocument_workers = 3\n\n[search]\nmax_results = 50\n",
    )
    .unwrap();

    unsafe {
        // Double underscore separates nested levels
        env::set_var("FOLIO_INDEXING__DOCUMENT_WORKERS", "7");
        env::set_var("FOLIO_SEARCH__DISTANCE_CAP", "4");
    }

    let settings = Settings::load_from(&config_path).unwrap();

    unsafe {
        env::remove_var("FOLIO_INDEXING__DOCUMENT_WORKERS");
        env::remove_var("FOLIO_SEARCH__DISTANCE_CAP");
    }

    // Environment beats the file, the file beats defaults
    assert_eq!(settings.indexing.document_workers, 7);
    assert_eq!(settings.search.distance_cap, 4);
    assert_eq!(settings.search.max_results, 50);
    assert_eq!(settings.search.scoring_workers, 10);
}
