//! fitcreate Common Library
//!
//! CLIとフロントエンドで共有される型とロジック:
//! - タイムライン（コーデ編集履歴）
//! - 無料枠の利用ゲート
//! - 生成リクエスト・プロンプト・レスポンス解析
//! - ワードローブとルックブック

pub mod error;
pub mod image_ref;
pub mod lookbook;
pub mod parser;
pub mod prompts;
pub mod timeline;
pub mod transform;
pub mod types;
pub mod usage;
pub mod wardrobe;

pub use error::{Error, GenerationError, Result};
pub use image_ref::ImageRef;
pub use lookbook::Lookbook;
pub use parser::parse_generate_response;
pub use prompts::{EditRequest, ProTool};
pub use timeline::Timeline;
pub use transform::ImageTransformer;
pub use types::{
    is_known_viewpoint, OutfitLayer, SavedOutfit, ViewpointImages, WardrobeItem,
    DEFAULT_VIEWPOINT, VIEWPOINTS,
};
pub use usage::{UsageGate, UsageStatus, FREE_DAILY_LIMIT};
pub use wardrobe::{SortOrder, Wardrobe};
