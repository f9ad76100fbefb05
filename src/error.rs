use fitcreate_common::GenerationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitCreateError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`fitcreate config --set-api-key YOUR_KEY` で設定するか GEMINI_API_KEY を指定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像ファイルではありません: {0}")]
    InvalidFile(String),

    #[error("画像の取得に失敗: {0}")]
    Download(String),

    #[error("画像生成に失敗: {0}")]
    Generation(#[from] GenerationError),

    #[error("本日の無料枠を使い切りました。Proにアップグレードしてください")]
    UpgradeRequired,

    #[error("この機能はPro専用です")]
    ProRequired,

    #[error("別の生成処理が実行中です")]
    Busy,

    #[error("モデル画像がありません。先に写真からモデルを作成してください")]
    NoModel,

    #[error("未知の視点: {0}")]
    UnknownViewpoint(String),

    #[error("未知のオプション: {0}")]
    UnknownOption(String),

    #[error("アイテムが見つかりません: {0}")]
    UnknownItem(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] fitcreate_common::Error),
}

impl FitCreateError {
    /// 画面表示用の短いメッセージ（例: "Style session failed: ..."）
    pub fn friendly_message(&self, context: &str) -> String {
        match self {
            FitCreateError::Generation(e) => format!("{}: {}", context, e),
            other => format!("{}: {}", context, other),
        }
    }

    /// 外部要因の失敗か（状態は変更されていない）
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, FitCreateError::Generation(_))
    }
}

pub type Result<T> = std::result::Result<T, FitCreateError>;
