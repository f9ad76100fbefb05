//! スタイリングセッション
//!
//! 全ての編集は同じ流れを通る:
//! 1. 実行中の生成があれば Busy
//! 2. モデル画像が無ければ NoModel
//! 3. 利用ゲート判定（拒否なら通信せず UpgradeRequired）
//! 4. 生成サービス呼び出し
//! 5. 成功時のみタイムライン更新 → 無料枠消費 → 状態保存
//!
//! 失敗時はタイムライン・無料枠・視点のいずれも変更しない。

use crate::error::{FitCreateError, Result};
use crate::store::StatusStore;
use fitcreate_common::{
    is_known_viewpoint, EditRequest, ImageRef, ImageTransformer, Lookbook, OutfitLayer, ProTool,
    SavedOutfit, Timeline, UsageGate, UsageStatus, WardrobeItem, DEFAULT_VIEWPOINT,
};
use tracing::{info, warn};

pub struct StyleSession<T: ImageTransformer> {
    transformer: T,
    timeline: Timeline,
    gate: UsageGate,
    store: Option<StatusStore>,
    viewpoint: String,
    /// 生成中フラグ。操作は `&mut self` で直列化されるため、
    /// 通常の呼び出しでは Busy に到達しない
    loading: bool,
}

/// 生成中フラグを立て、future が途中で破棄されても必ず戻す
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn set(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl<T: ImageTransformer> StyleSession<T> {
    pub fn new(transformer: T, status: UsageStatus) -> Self {
        Self {
            transformer,
            timeline: Timeline::default(),
            gate: UsageGate::new(status),
            store: None,
            viewpoint: DEFAULT_VIEWPOINT.to_string(),
            loading: false,
        }
    }

    /// 利用状況の変更をストアへ保存する
    pub fn with_store(mut self, store: StatusStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn usage(&self) -> &UsageGate {
        &self.gate
    }

    pub fn viewpoint(&self) -> &str {
        &self.viewpoint
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_model(&self) -> bool {
        !self.timeline.is_empty()
    }

    /// 現在の視点で表示する画像
    pub fn visible_image(&self) -> Result<&ImageRef> {
        self.timeline
            .visible_image(&self.viewpoint)
            .map_err(|_| FitCreateError::NoModel)
    }

    pub fn visible_layers(&self) -> &[OutfitLayer] {
        self.timeline.visible_layers()
    }

    /// 適用済みの衣服ID（UI側で重複適用を防ぐのに使う）
    pub fn active_garment_ids(&self) -> Vec<String> {
        self.timeline.active_garment_ids()
    }

    /// 写真からモデル画像を生成してセッションを開始（無料枠は消費しない）
    pub async fn create_model(&mut self, photo: ImageRef) -> Result<()> {
        self.ensure_idle()?;
        let image = self.generate(photo, EditRequest::ModelFromPhoto).await?;
        self.finalize_model(image);
        Ok(())
    }

    /// 確定したモデル画像でタイムラインを作り直す
    pub fn finalize_model(&mut self, image: ImageRef) {
        self.timeline = Timeline::new(image, DEFAULT_VIEWPOINT);
        self.viewpoint = DEFAULT_VIEWPOINT.to_string();
        info!("model finalized");
    }

    /// 衣服を着せる
    pub async fn apply_garment(&mut self, garment_image: ImageRef, item: WardrobeItem) -> Result<()> {
        let base = self.gated_base()?;
        let request = EditRequest::Garment {
            garment: garment_image,
        };
        let image = self.generate(base, request).await?;

        self.timeline
            .append_layer(OutfitLayer::new(Some(item), &self.viewpoint, image))?;
        self.commit_usage();
        Ok(())
    }

    /// 参照写真のコーデを転写
    pub async fn apply_reference(&mut self, reference: ImageRef) -> Result<()> {
        let base = self.gated_base()?;
        let item = WardrobeItem::reference(reference.clone());
        let image = self
            .generate(base, EditRequest::Reference { reference })
            .await?;

        self.timeline
            .append_layer(OutfitLayer::new(Some(item), &self.viewpoint, image))?;
        self.commit_usage();
        Ok(())
    }

    /// Pro専用ツール（レタッチ・メイク・ボディ・テンプレート）
    pub async fn apply_pro_tool(&mut self, tool: ProTool, option: &str) -> Result<()> {
        self.ensure_idle()?;
        let base = self.visible_image()?.clone();
        if !self.gate.is_pro() {
            return Err(FitCreateError::ProRequired);
        }
        let request = tool
            .request(option)
            .ok_or_else(|| FitCreateError::UnknownOption(format!("{}: {}", tool, option)))?;

        let image = self.generate(base, request).await?;
        self.timeline
            .append_layer(OutfitLayer::new(None, &self.viewpoint, image))?;
        self.commit_usage();
        Ok(())
    }

    /// 視点を切り替える
    ///
    /// 現在レイヤーにその視点の画像が無ければ生成して追加する。
    /// 生成した場合は true
    pub async fn select_viewpoint(&mut self, viewpoint: &str) -> Result<bool> {
        self.ensure_idle()?;
        if !is_known_viewpoint(viewpoint) {
            return Err(FitCreateError::UnknownViewpoint(viewpoint.to_string()));
        }
        let layer = self
            .timeline
            .current_layer()
            .map_err(|_| FitCreateError::NoModel)?;
        if layer.viewpoint_images().contains(viewpoint) {
            self.viewpoint = viewpoint.to_string();
            return Ok(false);
        }

        let base = self.gated_base()?;
        let image = self
            .generate(base, EditRequest::Pose(viewpoint.to_string()))
            .await?;

        self.timeline.record_viewpoint(viewpoint, image)?;
        self.viewpoint = viewpoint.to_string();
        self.commit_usage();
        Ok(true)
    }

    /// 1つ前の状態へ戻る（生成中は不可）
    pub fn undo(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.timeline.undo()
    }

    /// モデルを破棄
    pub fn reset(&mut self) {
        self.timeline.reset();
        self.viewpoint = DEFAULT_VIEWPOINT.to_string();
        self.loading = false;
        info!("session reset");
    }

    /// Proにアップグレードして保存
    ///
    /// 保存に失敗した場合はアップグレードしない
    pub fn subscribe(&mut self) -> Result<()> {
        let mut upgraded = self.gate.clone();
        if !upgraded.upgrade() {
            return Ok(());
        }
        if let Some(store) = &self.store {
            store.save(upgraded.status())?;
        }
        self.gate = upgraded;
        info!("upgraded to pro");
        Ok(())
    }

    /// 現在のコーデをルックブック用に保存
    pub fn snapshot(&self, name: &str) -> Result<SavedOutfit> {
        Lookbook::snapshot(&self.timeline, name, &self.viewpoint).map_err(|e| match e {
            fitcreate_common::Error::EmptyTimeline => FitCreateError::NoModel,
            other => other.into(),
        })
    }

    /// 保存済みコーデを復元
    pub fn restore(&mut self, outfit: &SavedOutfit) -> Result<()> {
        self.ensure_idle()?;
        self.timeline = Timeline::from_layers(outfit.layers.clone())?;
        info!(outfit = %outfit.id, layers = self.timeline.len(), "outfit restored");
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.loading {
            return Err(FitCreateError::Busy);
        }
        Ok(())
    }

    /// Busy・NoModel・無料枠を順に確認し、生成のベース画像を返す
    fn gated_base(&self) -> Result<ImageRef> {
        self.ensure_idle()?;
        let base = self.visible_image()?.clone();
        if !self.gate.check_and_consume() {
            return Err(FitCreateError::UpgradeRequired);
        }
        Ok(base)
    }

    async fn generate(&mut self, base: ImageRef, request: EditRequest) -> Result<ImageRef> {
        let result = {
            let _loading = LoadingGuard::set(&mut self.loading);
            self.transformer.transform(&base, &request).await
        };

        result.map_err(|e| {
            warn!(kind = request.kind(), error = %e, "generation failed");
            FitCreateError::Generation(e)
        })
    }

    fn commit_usage(&mut self) {
        if !self.gate.record_success() {
            return;
        }
        if let Some(store) = &self.store {
            if let Err(e) = store.save(self.gate.status()) {
                warn!(path = %store.path().display(), error = %e, "failed to persist usage status");
            }
        }
    }
}
