//! 画像生成サービスの境界
//!
//! 実装はCLI側（Gemini HTTPクライアント）とテスト用のスクリプト実装。

use crate::error::GenerationError;
use crate::image_ref::ImageRef;
use crate::prompts::EditRequest;

/// `transform(image, instructions) -> image`
///
/// 数秒かかることがある。キャンセル・タイムアウトは実装側（伝送層）の責務。
#[allow(async_fn_in_trait)]
pub trait ImageTransformer {
    async fn transform(
        &self,
        base: &ImageRef,
        request: &EditRequest,
    ) -> Result<ImageRef, GenerationError>;
}
