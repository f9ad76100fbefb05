//! 永続化ストアのテスト
//!
//! 利用状況とルックブックの保存・読み込みを検証

use chrono::NaiveDate;
use fitcreate::store::{LookbookStore, StatusStore, STATUS_KEY};
use fitcreate_common::{ImageRef, Lookbook, Timeline, UsageStatus};
use tempfile::tempdir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

/// ファイルが無ければ新規状態
#[test]
fn test_status_missing_file_is_fresh() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = StatusStore::new(dir.path());

    let status = store.load(day(17));
    assert_eq!(status, UsageStatus::fresh(day(17)));
    assert!(!store.path().exists());
}

#[test]
fn test_status_file_name() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = StatusStore::new(dir.path());
    assert_eq!(
        store.path().file_name().unwrap().to_string_lossy(),
        format!("{}.json", STATUS_KEY)
    );
}

/// 同日の再読み込みでは利用回数を保持
#[test]
fn test_status_save_and_load_same_day() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = StatusStore::new(dir.path());

    let status = UsageStatus {
        free_uses_today: 1,
        ..UsageStatus::fresh(day(17))
    };
    store.save(&status).expect("保存失敗");

    assert_eq!(store.load(day(17)), status);
}

/// 日付が変わると無料枠がリセットされ、Pro は維持
#[test]
fn test_status_daily_rollover() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = StatusStore::new(dir.path());

    store
        .save(&UsageStatus {
            is_pro: true,
            free_uses_today: 1,
            last_reset_date: day(16).to_string(),
        })
        .expect("保存失敗");

    let status = store.load(day(17));
    assert!(status.is_pro);
    assert_eq!(status.free_uses_today, 0);
    assert_eq!(status.last_reset_date, "2026-10-17");
}

/// キー名は camelCase で保存される
#[test]
fn test_status_json_keys() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = StatusStore::new(dir.path());
    store.save(&UsageStatus::fresh(day(17))).expect("保存失敗");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(json["isPro"], false);
    assert_eq!(json["freeUsesToday"], 0);
    assert_eq!(json["lastResetDate"], "2026-10-17");
}

/// 旧キー（lastUsedDate）も読める
#[test]
fn test_status_legacy_key() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = StatusStore::new(dir.path());
    std::fs::write(
        store.path(),
        r#"{"isPro":false,"freeUsesToday":1,"lastUsedDate":"2026-10-17"}"#,
    )
    .unwrap();

    assert_eq!(store.load(day(17)).free_uses_today, 1);
}

/// 壊れたファイルは新規扱い
#[test]
fn test_status_corrupt_file_is_fresh() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = StatusStore::new(dir.path());
    std::fs::write(store.path(), "{ not json").unwrap();

    assert_eq!(store.load(day(17)), UsageStatus::fresh(day(17)));
}

/// 保存先ディレクトリが無ければ作成
#[test]
fn test_status_creates_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let nested = dir.path().join("config").join("fitcreate");
    let store = StatusStore::new(&nested);

    store.save(&UsageStatus::fresh(day(17))).expect("保存失敗");
    assert!(store.path().exists());
}

#[test]
fn test_lookbook_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = LookbookStore::new(dir.path());
    assert!(store.load().is_empty());

    let timeline = Timeline::new(ImageRef::from_bytes("image/png", b"base"), "Full frontal view");
    let outfit = Lookbook::snapshot(&timeline, "Base look", "Full frontal view").unwrap();
    let mut lookbook = Lookbook::default();
    lookbook.save(outfit.clone());
    store.save(&lookbook).expect("保存失敗");

    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get(&outfit.id), Some(&outfit));
}

#[test]
fn test_lookbook_corrupt_file_is_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = LookbookStore::new(dir.path());
    std::fs::write(dir.path().join("lookbook.json"), "[1, 2").unwrap();

    assert!(store.load().is_empty());
}

/// 書き込みに失敗したら Err を返し、元のファイルは残る
#[cfg(target_os = "linux")]
#[test]
fn test_status_save_reports_write_failure() {
    let dev_full = std::path::Path::new("/dev/full");
    if !dev_full.exists() {
        eprintln!("/dev/full not available; skipping");
        return;
    }
    let dir = tempdir().expect("Failed to create temp dir");
    let store = StatusStore::new(dir.path());
    let before = UsageStatus::fresh(day(17));
    store.save(&before).expect("保存失敗");

    let tmp = dir.path().join(format!("{}.json.tmp", STATUS_KEY));
    std::os::unix::fs::symlink(dev_full, &tmp).unwrap();

    let pro = UsageStatus {
        is_pro: true,
        ..before.clone()
    };
    assert!(store.save(&pro).is_err());
    assert_eq!(store.load(day(17)), before);
    assert!(std::fs::symlink_metadata(&tmp).is_err());
}

#[cfg(target_os = "linux")]
#[test]
fn test_lookbook_save_reports_write_failure() {
    let dev_full = std::path::Path::new("/dev/full");
    if !dev_full.exists() {
        eprintln!("/dev/full not available; skipping");
        return;
    }
    let dir = tempdir().expect("Failed to create temp dir");
    let store = LookbookStore::new(dir.path());
    std::os::unix::fs::symlink(dev_full, dir.path().join("lookbook.json.tmp")).unwrap();

    assert!(store.save(&Lookbook::default()).is_err());
    assert!(!dir.path().join("lookbook.json").exists());
}

/// 保存後に一時ファイルは残らない
#[test]
fn test_save_leaves_no_temp_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = StatusStore::new(dir.path());
    store.save(&UsageStatus::fresh(day(17))).expect("保存失敗");

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec![format!("{}.json", STATUS_KEY)]);
}
