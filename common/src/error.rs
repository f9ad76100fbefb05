//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    /// タイムラインが空の状態で現在レイヤーを参照した（初期化漏れ）
    #[error("Timeline is empty: no base model layer")]
    EmptyTimeline,

    #[error("Invalid image file: {0}")]
    InvalidFile(String),
}

/// 画像生成サービスの失敗
///
/// どの種類でもタイムラインと利用枠は変更されない。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// コンテンツポリシーによるブロック
    #[error("the request was blocked ({0})")]
    Blocked(String),

    /// 応答はあったが画像が含まれていなかった
    #[error("the AI model did not return an image, please try a different request")]
    NoImage,

    /// ネットワーク・タイムアウト・HTTPエラー
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
