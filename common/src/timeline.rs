//! コーデ編集履歴（タイムライン）
//!
//! レイヤーの配列と現在位置のカーソルで表す線形の履歴。
//! - 追加は常に「現在位置+1」。それより後ろ（undo済みの部分）は破棄される
//! - undo はカーソルを戻すだけ。redo は存在しない
//! - index 0 は衣服なしのベースモデルレイヤー

use crate::error::{Error, Result};
use crate::image_ref::ImageRef;
use crate::types::OutfitLayer;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    layers: Vec<OutfitLayer>,
    position: usize,
}

impl Timeline {
    /// ベースモデル画像からタイムラインを作成
    pub fn new(base_image: ImageRef, viewpoint: &str) -> Self {
        Self {
            layers: vec![OutfitLayer::base(viewpoint, base_image)],
            position: 0,
        }
    }

    /// 保存済みのレイヤー列から復元（カーソルは末尾）
    pub fn from_layers(layers: Vec<OutfitLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::EmptyTimeline);
        }
        if layers[0].garment.is_some() {
            return Err(Error::Parse("first layer must be the base model".into()));
        }
        if layers.iter().any(|layer| !layer.is_valid()) {
            return Err(Error::Parse("layer without viewpoint image".into()));
        }
        let position = layers.len() - 1;
        Ok(Self { layers, position })
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn layers(&self) -> &[OutfitLayer] {
        &self.layers
    }

    /// 現在表示中までのレイヤー（0..=position）
    pub fn visible_layers(&self) -> &[OutfitLayer] {
        if self.layers.is_empty() {
            return &[];
        }
        &self.layers[..=self.position]
    }

    pub fn current_layer(&self) -> Result<&OutfitLayer> {
        self.layers.get(self.position).ok_or(Error::EmptyTimeline)
    }

    /// ベースモデル画像（layer 0 の最初の画像）
    pub fn base_image(&self) -> Result<&ImageRef> {
        self.layers
            .first()
            .and_then(|layer| layer.viewpoint_images().first())
            .ok_or(Error::EmptyTimeline)
    }

    /// 指定視点の表示画像
    ///
    /// 現在レイヤーに該当視点が無い場合は、そのレイヤーで最初に生成された画像、
    /// それも無ければベースモデル画像を返す。
    pub fn visible_image(&self, viewpoint: &str) -> Result<&ImageRef> {
        let layer = self.current_layer()?;
        let images = layer.viewpoint_images();
        match images.get(viewpoint).or_else(|| images.first()) {
            Some(image) => Ok(image),
            None => self.base_image(),
        }
    }

    /// 現在位置の次にレイヤーを追加し、それ以降の履歴を破棄する
    pub fn append_layer(&mut self, layer: OutfitLayer) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::EmptyTimeline);
        }
        let discarded = self.layers.len() - (self.position + 1);
        self.layers.truncate(self.position + 1);
        info!(
            label = layer.label(),
            position = self.position + 1,
            discarded,
            "append layer"
        );
        self.layers.push(layer);
        self.position = self.layers.len() - 1;
        Ok(())
    }

    /// 現在レイヤーに別視点の画像を追加（レイヤー数は変わらない）
    pub fn record_viewpoint(&mut self, viewpoint: &str, image: ImageRef) -> Result<()> {
        let position = self.position;
        let layer = self.layers.get_mut(position).ok_or(Error::EmptyTimeline)?;
        layer.record_viewpoint(viewpoint, image);
        info!(viewpoint, position, "record viewpoint");
        Ok(())
    }

    /// 1つ戻る。position 0 では何もしない
    pub fn undo(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }

    /// 適用済み衣服のID（0..=position、重複なし、順序保持）
    pub fn active_garment_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for garment in self.visible_layers().iter().filter_map(|l| l.garment.as_ref()) {
            if !ids.contains(&garment.id) {
                ids.push(garment.id.clone());
            }
        }
        ids
    }

    /// モデルを破棄して空に戻す
    pub fn reset(&mut self) {
        self.layers.clear();
        self.position = 0;
    }
}
