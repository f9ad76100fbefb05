//! APIレスポンスパーサー
//!
//! Gemini generateContent のレスポンスから生成画像を取り出す。
//!
//! 判定順:
//! 1. promptFeedback.blockReason があれば Blocked
//! 2. 候補のうち最初に inlineData を持つパートを Data URL に変換
//! 3. どれも無ければ NoImage

use crate::error::GenerationError;
use crate::image_ref::ImageRef;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ResponsePart {
    #[serde(alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(alias = "mime_type")]
    mime_type: String,
    data: String,
}

/// レスポンス本文（JSON文字列）をパース
///
/// JSONとして読めない本文は伝送エラー扱い
pub fn parse_generate_response(body: &str) -> Result<ImageRef, GenerationError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Transport(format!("invalid response body: {}", e)))?;

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(GenerationError::Blocked(reason));
    }

    response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data)
        .map(|inline| ImageRef::from_base64(&inline.mime_type, &inline.data))
        .ok_or(GenerationError::NoImage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_part() {
        let body = r#"{
          "candidates": [{
            "content": {
              "parts": [
                {"text": "here you go"},
                {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
              ]
            },
            "finishReason": "STOP"
          }]
        }"#;
        let image = parse_generate_response(body).unwrap();
        assert_eq!(image.as_str(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_parse_snake_case_inline_data() {
        let body = r#"{"candidates":[{"content":{"parts":[{"inline_data":{"mime_type":"image/jpeg","data":"AAAA"}}]}}]}"#;
        let image = parse_generate_response(body).unwrap();
        assert_eq!(image.mime_type().unwrap(), "image/jpeg");
    }

    #[test]
    fn test_parse_blocked() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert_eq!(
            parse_generate_response(body),
            Err(GenerationError::Blocked("SAFETY".to_string()))
        );
    }

    #[test]
    fn test_parse_blocked_takes_priority_over_candidates() {
        let body = r#"{
          "promptFeedback": {"blockReason": "OTHER"},
          "candidates": [{"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "AAAA"}}]}}]
        }"#;
        assert!(matches!(parse_generate_response(body), Err(GenerationError::Blocked(_))));
    }

    #[test]
    fn test_parse_text_only_is_no_image() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"I can't do that"}]}}]}"#;
        assert_eq!(parse_generate_response(body), Err(GenerationError::NoImage));
    }

    #[test]
    fn test_parse_empty_candidates_is_no_image() {
        assert_eq!(parse_generate_response("{}"), Err(GenerationError::NoImage));
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert_eq!(parse_generate_response(body), Err(GenerationError::NoImage));
    }

    #[test]
    fn test_parse_second_candidate() {
        let body = r#"{"candidates":[
          {"content":{"parts":[{"text":"no"}]}},
          {"content":{"parts":[{"inlineData":{"mimeType":"image/webp","data":"UklG"}}]}}
        ]}"#;
        let image = parse_generate_response(body).unwrap();
        assert_eq!(image.mime_type().unwrap(), "image/webp");
    }

    #[test]
    fn test_parse_invalid_json_is_transport() {
        assert!(matches!(
            parse_generate_response("<html>bad gateway</html>"),
            Err(GenerationError::Transport(_))
        ));
    }
}
