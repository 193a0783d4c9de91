//! # API レスポンスエンベロープ
//!
//! 公開 API の統一レスポンス形式 `{ "data": T }` を提供する。

use serde::{Deserialize, Serialize};

/// 公開 API の統一レスポンス型
///
/// 文字一覧・文字詳細・クイズ生成の各エンドポイントは `{ "data": T }` 形式で
/// レスポンスを返す。
///
/// ## 使用例
///
/// ```
/// use kana_shared::ApiResponse;
///
/// let response = ApiResponse::new("あ");
/// assert_eq!(response.data, "あ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// 新しい `ApiResponse` を作成する
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serializeを正しいjson形状にする() {
        let response = ApiResponse::new("か");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "data": "か" }));
    }

    #[test]
    fn test_空のvecペイロードは空配列としてシリアライズされる() {
        let response: ApiResponse<Vec<String>> = ApiResponse::new(Vec::new());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "data": [] }));
    }

    #[test]
    fn test_deserializeでjsonからオブジェクトに変換する() {
        let json = r#"{"data": ["あ", "い"]}"#;
        let response: ApiResponse<Vec<String>> = serde_json::from_str(json).unwrap();

        assert_eq!(response.data, vec!["あ".to_string(), "い".to_string()]);
    }
}
