//! Contract with the overlay-generation service.
//!
//! The service itself lives outside this workspace. The editor only builds
//! the request and decodes the image bytes it gets back.

use crate::error::RemoteError;
use crate::model::Color;
use serde::{Deserialize, Serialize};

/// Payload for a generated overlay.
///
/// Serializes as `{"text": .., "baseColor": "#rrggbb", "secondaryColor": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOverlayRequest {
    pub text: String,
    pub base_color: Color,
    pub secondary_color: Color,
}

impl GenerateOverlayRequest {
    pub fn new(text: impl Into<String>, base_color: Color, secondary_color: Color) -> Self {
        Self {
            text: text.into(),
            base_color,
            secondary_color,
        }
    }

    /// The JSON body sent to the service.
    ///
    /// # Errors
    /// Only if serialization itself fails, which plain strings never do.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Something that turns a request into encoded image bytes.
///
/// Implementations own transport, auth and retries (there are none by
/// default). Any failure comes back as a `RemoteError`.
pub trait OverlayGenerator {
    fn generate(&self, request: &GenerateOverlayRequest) -> Result<Vec<u8>, RemoteError>;
}

impl<F> OverlayGenerator for F
where
    F: Fn(&GenerateOverlayRequest) -> Result<Vec<u8>, RemoteError>,
{
    fn generate(&self, request: &GenerateOverlayRequest) -> Result<Vec<u8>, RemoteError> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_uses_camel_case_and_hex() {
        let request = GenerateOverlayRequest::new("50% off", Color::rgb(255, 0, 0), Color::WHITE);
        let json: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "text": "50% off",
                "baseColor": "#ff0000",
                "secondaryColor": "#ffffff",
            })
        );
    }

    #[test]
    fn request_parses_short_hex() {
        let request: GenerateOverlayRequest =
            serde_json::from_str(r##"{"text":"x","baseColor":"#000","secondaryColor":"#fff"}"##)
                .unwrap();
        assert_eq!(request.base_color, Color::BLACK);
        assert_eq!(request.secondary_color, Color::WHITE);
    }

    #[test]
    fn closures_are_generators() {
        let failing = |_: &GenerateOverlayRequest| -> Result<Vec<u8>, RemoteError> {
            Err(RemoteError::Service("503".into()))
        };
        let request = GenerateOverlayRequest::new("x", Color::BLACK, Color::WHITE);
        assert!(matches!(
            failing.generate(&request),
            Err(RemoteError::Service(_))
        ));
    }
}
