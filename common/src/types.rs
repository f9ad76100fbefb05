//! 型定義
//!
//! CLIと将来のフロントエンドで共有される型:
//! - WardrobeItem: ワードローブの1アイテム
//! - OutfitLayer: 編集履歴の1ステップ
//! - SavedOutfit: ルックブックに保存したコーデ

use crate::image_ref::ImageRef;
use serde::{Deserialize, Serialize};

/// 視点（ポーズ）の一覧。先頭がベースレイヤーの視点
pub const VIEWPOINTS: &[&str] = &[
    "Full frontal view",
    "3/4 view",
    "Side profile",
    "Walking",
    "Leaning",
];

/// デフォルト視点
pub const DEFAULT_VIEWPOINT: &str = VIEWPOINTS[0];

/// カスタム（ユーザーアップロード）カテゴリ
pub const CUSTOM_CATEGORY: &str = "custom";

pub fn is_known_viewpoint(viewpoint: &str) -> bool {
    VIEWPOINTS.contains(&viewpoint)
}

/// ワードローブアイテム（作成後は不変）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "url")]
    pub image_ref: ImageRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl WardrobeItem {
    pub fn new(id: &str, name: &str, url: &str, category: &str, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            image_ref: ImageRef::new(url),
            category: Some(category.to_string()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// ユーザーアップロードの衣服。IDは内容ハッシュから生成
    pub fn custom(name: &str, image: ImageRef) -> Self {
        Self {
            id: format!("custom-{}", image.content_hash()),
            name: name.to_string(),
            image_ref: image,
            category: Some(CUSTOM_CATEGORY.to_string()),
            tags: vec![CUSTOM_CATEGORY.to_string()],
        }
    }

    /// 参照写真からのコーデ転写で作られるアイテム
    pub fn reference(image: ImageRef) -> Self {
        Self {
            id: format!("ref-{}", image.content_hash()),
            name: "Vibe Check".to_string(),
            image_ref: image,
            category: Some(CUSTOM_CATEGORY.to_string()),
            tags: Vec::new(),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.category.as_deref() == Some(CUSTOM_CATEGORY)
    }
}

/// 視点→画像の対応（挿入順を保持、キーは一意）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewpointImages(Vec<(String, ImageRef)>);

impl ViewpointImages {
    fn single(viewpoint: &str, image: ImageRef) -> Self {
        Self(vec![(viewpoint.to_string(), image)])
    }

    pub fn get(&self, viewpoint: &str) -> Option<&ImageRef> {
        self.0
            .iter()
            .find(|(key, _)| key == viewpoint)
            .map(|(_, image)| image)
    }

    /// 最初に登録された画像
    pub fn first(&self) -> Option<&ImageRef> {
        self.0.first().map(|(_, image)| image)
    }

    /// 既存キーは上書き（位置は保持）、新規キーは末尾に追加
    pub fn insert(&mut self, viewpoint: &str, image: ImageRef) {
        match self.0.iter_mut().find(|(key, _)| key == viewpoint) {
            Some(entry) => entry.1 = image,
            None => self.0.push((viewpoint.to_string(), image)),
        }
    }

    pub fn contains(&self, viewpoint: &str) -> bool {
        self.get(viewpoint).is_some()
    }

    pub fn viewpoints(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 編集履歴の1ステップ
///
/// 生成時の視点で必ず1枚の画像を持つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitLayer {
    pub garment: Option<WardrobeItem>,
    viewpoint_images: ViewpointImages,
}

impl OutfitLayer {
    pub fn new(garment: Option<WardrobeItem>, viewpoint: &str, image: ImageRef) -> Self {
        Self {
            garment,
            viewpoint_images: ViewpointImages::single(viewpoint, image),
        }
    }

    /// ベースモデルのレイヤー（衣服なし）
    pub fn base(viewpoint: &str, image: ImageRef) -> Self {
        Self::new(None, viewpoint, image)
    }

    pub fn viewpoint_images(&self) -> &ViewpointImages {
        &self.viewpoint_images
    }

    pub(crate) fn record_viewpoint(&mut self, viewpoint: &str, image: ImageRef) {
        self.viewpoint_images.insert(viewpoint, image);
    }

    /// 一覧表示用のラベル
    pub fn label(&self) -> &str {
        self.garment
            .as_ref()
            .map(|g| g.name.as_str())
            .unwrap_or("Base Model")
    }

    /// 逆シリアライズ後の検証（空の画像マップは不正）
    pub(crate) fn is_valid(&self) -> bool {
        !self.viewpoint_images.is_empty()
    }
}

/// ルックブックに保存したコーデ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedOutfit {
    pub id: String,
    pub name: String,
    pub layers: Vec<OutfitLayer>,
    pub thumbnail: ImageRef,
}
