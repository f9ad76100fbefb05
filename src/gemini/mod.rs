//! Gemini API連携
//!
//! 画像生成モデルへの generateContent 呼び出し。
//! パーツ構成: [ベース画像, 2枚目の画像(任意), プロンプト]
//! レスポンス解析は fitcreate_common::parse_generate_response を使用

mod types;

pub use types::{Content, GeminiRequest, GenerationConfig, InlineData, Part};

use crate::config::Config;
use crate::error::{FitCreateError, Result};
use fitcreate_common::{
    parse_generate_response, EditRequest, GenerationError, ImageRef, ImageTransformer,
};
use std::time::Duration;
use tracing::debug;

/// APIキーはURLに載せずヘッダーで送る
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| FitCreateError::Config(format!("HTTPクライアント初期化失敗: {}", e)))?;
        Ok(Self {
            http,
            api_key,
            endpoint: format!(
                "{}/{}:generateContent",
                config.api_base_url.trim_end_matches('/'),
                config.model
            ),
        })
    }

    /// ワードローブ画像のダウンロードにも同じクライアントを使う
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    async fn call(&self, request: &GeminiRequest) -> std::result::Result<String, GenerationError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(transport_error)?;

        if !status.is_success() {
            let preview: String = body.chars().take(300).collect();
            return Err(GenerationError::Transport(format!("API error {}: {}", status, preview)));
        }

        Ok(body)
    }
}

fn transport_error(e: reqwest::Error) -> GenerationError {
    GenerationError::Transport(e.without_url().to_string())
}

/// 画像をリクエストパーツに変換
pub fn inline_part(image: &ImageRef) -> std::result::Result<Part, GenerationError> {
    let parts = image
        .parts()
        .map_err(|e| GenerationError::Transport(format!("cannot encode image: {}", e)))?;
    Ok(Part::InlineData {
        inline_data: InlineData {
            mime_type: parts.mime_type.to_string(),
            data: parts.data.to_string(),
        },
    })
}

/// 編集指示からリクエストを組み立てる
pub fn build_request(
    base: &ImageRef,
    request: &EditRequest,
) -> std::result::Result<GeminiRequest, GenerationError> {
    let mut parts = vec![inline_part(base)?];
    if let Some(extra) = request.extra_image() {
        parts.push(inline_part(extra)?);
    }
    parts.push(Part::Text {
        text: request.prompt(),
    });

    Ok(GeminiRequest {
        contents: vec![Content { parts }],
        generation_config: GenerationConfig::image_only(),
    })
}

impl ImageTransformer for GeminiClient {
    async fn transform(
        &self,
        base: &ImageRef,
        request: &EditRequest,
    ) -> std::result::Result<ImageRef, GenerationError> {
        let body = build_request(base, request)?;
        debug!(kind = request.kind(), base = %base, endpoint = %self.endpoint, "generateContent");

        let response = self.call(&body).await?;
        let image = parse_generate_response(&response)?;

        debug!(kind = request.kind(), image = %image, "generated");
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_garment_has_three_parts() {
        let base = ImageRef::from_base64("image/png", "QkFTRQ==");
        let garment = ImageRef::from_base64("image/jpeg", "R0FSTQ==");
        let request = build_request(&base, &EditRequest::Garment { garment }).unwrap();

        let json = serde_json::to_value(&request).unwrap();
        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "QkFTRQ==");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert!(parts[2]["text"].as_str().unwrap().contains("Virtual try-on"));
        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn test_build_request_single_image() {
        let base = ImageRef::from_base64("image/png", "QkFTRQ==");
        let request = build_request(&base, &EditRequest::Pose("Walking".into())).unwrap();
        assert_eq!(request.contents[0].parts.len(), 2);
    }

    #[test]
    fn test_build_request_rejects_non_data_url() {
        let base = ImageRef::new("https://example.com/model.png");
        let result = build_request(&base, &EditRequest::ModelFromPhoto);
        assert!(matches!(result, Err(GenerationError::Transport(_))));
    }

    /// 接続失敗のエラー文にAPIキーが含まれない
    #[tokio::test]
    async fn test_transport_error_does_not_expose_api_key() {
        let config = Config {
            api_key: Some("SECRETKEY123".into()),
            api_base_url: "http://127.0.0.1:1".into(),
            timeout_seconds: 5,
            ..Config::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        let base = ImageRef::from_base64("image/png", "QkFTRQ==");

        let err = client
            .transform(&base, &EditRequest::Pose("Walking".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
        assert!(!err.to_string().contains("SECRETKEY123"));

        let message = crate::error::FitCreateError::from(err).friendly_message("Pose change failed");
        assert!(!message.contains("SECRETKEY123"));
    }
}
