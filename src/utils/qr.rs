use classcue_core::AppError;
use data_encoding::BASE64;
use qrcode::{QrCode, render::svg};

const SVG_MIN_SIZE: u32 = 256;

/// Renders `payload` as an SVG QR code.
pub fn render_svg(payload: &str) -> Result<String, AppError> {
    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| AppError::internal_error(format!("Failed to encode QR code: {}", e)))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(SVG_MIN_SIZE, SVG_MIN_SIZE)
        .build())
}

/// `data:image/svg+xml;base64,...` URL suitable for an `<img src>`.
pub fn svg_data_url(payload: &str) -> Result<String, AppError> {
    let svg = render_svg(payload)?;
    Ok(format!(
        "data:image/svg+xml;base64,{}",
        BASE64.encode(svg.as_bytes())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "3f1c9b52-7d0e-4c1a-9a57-2b8c6f0e4d11|0b6a0c43-22f4-4a52-8f8e-5f7f3b1d9c20|1700000000";

    #[test]
    fn renders_svg_document() {
        let svg = render_svg(TOKEN).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn data_url_round_trips_to_svg() {
        let url = svg_data_url(TOKEN).unwrap();
        let encoded = url.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let decoded = BASE64.decode(encoded.as_bytes()).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), render_svg(TOKEN).unwrap());
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let payload = "x".repeat(8000);
        assert_eq!(render_svg(&payload).unwrap_err().status.as_u16(), 500);
    }
}
