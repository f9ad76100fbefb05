//! 永続化ストア
//!
//! - 利用状況（fitcreate_status.json）: 起動時に読み込み、変更のたびに保存
//! - ルックブック（lookbook.json）: 保存済みコーデ
//!
//! 壊れたファイルは新規扱いにする。
//! 保存は一時ファイル経由で置き換え、書き込み失敗はエラーとして返す。

use crate::error::Result;
use chrono::NaiveDate;
use fitcreate_common::{Lookbook, UsageStatus};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// 利用状況の保存キー
pub const STATUS_KEY: &str = "fitcreate_status";
const LOOKBOOK_FILE_NAME: &str = "lookbook.json";

/// 利用状況ストア
#[derive(Debug, Clone)]
pub struct StatusStore {
    path: PathBuf,
}

impl StatusStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.json", STATUS_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 読み込み（日付が変わっていれば無料枠をリセット）
    pub fn load(&self, today: NaiveDate) -> UsageStatus {
        match read_json::<UsageStatus>(&self.path) {
            Some(status) => status.rolled_over(today),
            None => UsageStatus::fresh(today),
        }
    }

    pub fn save(&self, status: &UsageStatus) -> Result<()> {
        write_json(&self.path, status)
    }
}

/// ルックブックストア
#[derive(Debug, Clone)]
pub struct LookbookStore {
    path: PathBuf,
}

impl LookbookStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(LOOKBOOK_FILE_NAME),
        }
    }

    pub fn load(&self) -> Lookbook {
        read_json(&self.path).unwrap_or_default()
    }

    pub fn save(&self, lookbook: &Lookbook) -> Result<()> {
        write_json(&self.path, lookbook)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot open state file");
            return None;
        }
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt state file, starting fresh");
            None
        }
    }
}

/// 一時ファイルに書き切ってから置き換える（途中で失敗しても元のファイルは残る）
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    if let Err(e) = write_file(&tmp, value) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// `<name>.json` → `<name>.json.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
