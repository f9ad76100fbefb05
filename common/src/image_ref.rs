//! 画像参照（Data URL）
//!
//! 生成サービスとの受け渡しはすべて `data:<mime>;base64,<payload>` 形式で行う。
//! ワードローブのカタログ項目だけは http(s) URL を保持できるが、
//! 生成サービスに渡す前に Data URL へ解決される。

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

lazy_static! {
    static ref DATA_URL_RE: Regex =
        Regex::new(r"^data:([^;,]+);base64,(.+)$").expect("valid data url regex");
}

/// 画像への不透明な参照
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

/// Data URL を分解したもの
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrlParts<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

impl ImageRef {
    /// 任意の文字列（Data URL / http URL / パス）をそのまま保持
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 生バイト列から Data URL を組み立てる
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)))
    }

    /// Base64 済みのデータから組み立てる（APIレスポンス用）
    pub fn from_base64(mime_type: &str, data: &str) -> Self {
        Self(format!("data:{};base64,{}", mime_type, data))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_url(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// MIMEタイプとBase64部分に分解
    pub fn parts(&self) -> Result<DataUrlParts<'_>> {
        let caps = DATA_URL_RE
            .captures(&self.0)
            .ok_or_else(|| Error::Parse("Invalid data URL".into()))?;
        let mime_type = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let data = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        if mime_type.is_empty() {
            return Err(Error::Parse("Could not parse MIME type from data URL".into()));
        }
        Ok(DataUrlParts { mime_type, data })
    }

    pub fn mime_type(&self) -> Result<&str> {
        Ok(self.parts()?.mime_type)
    }

    /// Base64をデコードして生バイト列を返す
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let parts = self.parts()?;
        STANDARD
            .decode(parts.data)
            .map_err(|e| Error::Parse(format!("Invalid base64 payload: {}", e)))
    }

    /// 内容ハッシュ（先頭12桁）。カスタム項目のID生成に使う
    pub fn content_hash(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(digest)[..12].to_string()
    }

    /// 保存時の拡張子
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type().unwrap_or("image/png") {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

impl fmt::Display for ImageRef {
    // Base64本体はログに出さない
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parts() {
            Ok(parts) => write!(f, "<{} {} bytes>", parts.mime_type, parts.data.len()),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
