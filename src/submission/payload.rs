use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::models::Drawing;
use crate::raster::{encode_png, rasterize_with, RasterOptions};

use super::SubmissionError;

/// Request body for the scoring endpoint: `{"image_data": "<base64 png>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub image_data: String,
}

impl SubmissionPayload {
    pub fn from_png(png_bytes: &[u8]) -> Self {
        Self {
            image_data: base64::engine::general_purpose::STANDARD.encode(png_bytes),
        }
    }

    /// Rasterize a drawing snapshot, PNG-encode it and wrap it for submission.
    pub fn from_drawing(drawing: &Drawing, options: &RasterOptions) -> Result<Self, SubmissionError> {
        let image = rasterize_with(drawing, options)?;
        let png = encode_png(&image)?;
        Ok(Self::from_png(&png))
    }

    /// Byte length of the encoded PNG behind `image_data`.
    pub fn png_len(&self) -> usize {
        let padding = self.image_data.bytes().rev().take_while(|&b| b == b'=').count();
        (self.image_data.len() / 4 * 3).saturating_sub(padding)
    }

    pub fn to_json(&self) -> Result<String, SubmissionError> {
        serde_json::to_string(self).map_err(|e| SubmissionError::Encode(e.to_string()))
    }
}

/// Body of a successful scoring response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: f64,
}

impl ScoreResponse {
    pub fn parse(body: &str) -> Result<Self, SubmissionError> {
        serde_json::from_str(body).map_err(|e| SubmissionError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_has_single_image_data_key() {
        let payload = SubmissionPayload::from_png(&[0x89, b'P', b'N', b'G']);
        let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        let encoded = object["image_data"].as_str().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_png_len_matches_decoded_bytes() {
        for len in 0..8 {
            let bytes = vec![7u8; len];
            assert_eq!(SubmissionPayload::from_png(&bytes).png_len(), len);
        }
    }

    #[test]
    fn test_empty_drawing_fails_before_encoding() {
        let err = SubmissionPayload::from_drawing(&Drawing::default(), &RasterOptions::default())
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Rasterization(_)));
    }

    #[test]
    fn test_score_response_parsing() {
        assert_eq!(ScoreResponse::parse(r#"{"score":0.3}"#).unwrap().score, 0.3);
        assert!(matches!(
            ScoreResponse::parse(r#"{"result":"ok"}"#),
            Err(SubmissionError::MalformedResponse(_))
        ));
        assert!(matches!(
            ScoreResponse::parse("<html>"),
            Err(SubmissionError::MalformedResponse(_))
        ));
    }
}
