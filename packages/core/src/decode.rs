//! Image decoding from a multipart upload or a base64 JSON field
use crate::error::PredictError;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde_json::Value;

/// Base64 sources of a JSON request body, in lookup priority order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Base64Body {
    /// `imageBase64` key
    pub image_base64: Option<String>,
    /// `image` key
    pub image: Option<String>,
}

impl Base64Body {
    /// Picks the string-valued `imageBase64` and `image` keys out of a JSON body.
    /// Anything else (other keys, non-string values, non-object bodies) is ignored.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            image_base64: field("imageBase64"),
            image: field("image"),
        }
    }

    fn encoded(self) -> Option<String> {
        let present = |s: &String| !s.is_empty();
        self.image_base64
            .filter(present)
            .or_else(|| self.image.filter(present))
    }
}

/// Raw image sources of a `/predict` request before decoding
#[derive(Debug, Default, Clone)]
pub struct ImageRequest {
    /// Bytes of the multipart `image` field, if the field was present
    pub upload: Option<Vec<u8>>,
    pub body: Base64Body,
}

impl ImageRequest {
    pub fn upload(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            upload: Some(bytes.into()),
            body: Base64Body::default(),
        }
    }

    pub fn json(value: &Value) -> Self {
        Self {
            upload: None,
            body: Base64Body::from_value(value),
        }
    }

    /// Resolves the request to raw image bytes. The upload wins over the JSON body.
    /// No format validation happens here.
    pub fn decode(self) -> Result<Vec<u8>, PredictError> {
        if let Some(bytes) = self.upload {
            return Ok(bytes);
        }

        let encoded = self.body.encoded().ok_or(PredictError::NoImageProvided)?;
        decode_base64(&encoded)
    }
}

/// Decodes standard base64, dropping a data-URL header (`data:image/png;base64,`) if present
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, PredictError> {
    let payload = match encoded.split_once(',') {
        Some((_, data)) => data,
        None => encoded,
    };

    // line-wrapped payloads are common from browsers and CLI tools
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    Ok(BASE64.decode(compact)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_url_prefix_is_stripped() {
        let plain = decode_base64("AAAA").unwrap();
        let prefixed = decode_base64("data:image/png;base64,AAAA").unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain, vec![0, 0, 0]);
    }

    #[test]
    fn only_first_comma_ends_the_prefix() {
        let err = decode_base64("data:x,AAAA,AAAA").unwrap_err();
        assert!(matches!(err, PredictError::DecodeError(_)));
    }

    #[test]
    fn wrapped_base64_is_accepted() {
        assert_eq!(decode_base64("AA\nAA\r\n").unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn malformed_base64_is_a_decode_error() {
        let err = decode_base64("not base64!").unwrap_err();
        assert!(matches!(err, PredictError::DecodeError(_)));
    }

    #[test]
    fn upload_takes_priority_over_body() {
        let request = ImageRequest {
            upload: Some(vec![1, 2, 3]),
            body: Base64Body::from_value(&json!({ "imageBase64": "AAAA" })),
        };
        assert_eq!(request.decode().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn image_base64_key_wins_over_image_key() {
        let request = ImageRequest::json(&json!({ "imageBase64": "AQID", "image": "AAAA" }));
        assert_eq!(request.decode().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn image_key_is_used_as_fallback() {
        let request = ImageRequest::json(&json!({ "image": "AQID" }));
        assert_eq!(request.decode().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_field_counts_as_absent() {
        let request = ImageRequest::json(&json!({ "imageBase64": "", "image": "AQID" }));
        assert_eq!(request.decode().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_body_has_no_image() {
        let err = ImageRequest::json(&json!({})).decode().unwrap_err();
        assert!(matches!(err, PredictError::NoImageProvided));

        let err = ImageRequest::json(&json!({ "imageBase64": 42 }))
            .decode()
            .unwrap_err();
        assert!(matches!(err, PredictError::NoImageProvided));
    }
}
