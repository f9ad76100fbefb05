use clap::{Parser, Subcommand};
use fitcreate_common::SortOrder;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fitcreate")]
#[command(about = "バーチャル試着・スタイリングツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話式スタジオを起動
    Studio {
        /// モデル生成に使う写真
        #[arg(short, long, conflicts_with = "model_image")]
        photo: Option<PathBuf>,

        /// 生成済みのモデル画像（生成をスキップ）
        #[arg(short, long)]
        model_image: Option<PathBuf>,

        /// 衣服画像フォルダ（ワードローブに追加）
        #[arg(short, long)]
        garments: Option<PathBuf>,

        /// Save Look の保存先（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 写真からモデル画像を生成
    Model {
        /// 写真のパス
        #[arg(required = true)]
        photo: PathBuf,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// ワードローブを表示
    Wardrobe {
        /// カテゴリで絞り込み
        #[arg(short, long)]
        category: Option<String>,

        /// 名前・タグで検索
        #[arg(short, long)]
        search: Option<String>,

        /// 並び順 (newest/oldest/az/za)
        #[arg(long, default_value = "newest")]
        sort: SortOrder,

        /// 衣服画像フォルダも含める
        #[arg(short, long)]
        garments: Option<PathBuf>,
    },

    /// 無料枠・Pro状態を表示
    Status,

    /// Proにアップグレード
    Subscribe,

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 画像生成モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// ルックブックを表示/管理
    Lookbook {
        /// 指定IDのコーデを削除
        #[arg(long)]
        delete: Option<String>,
    },
}
