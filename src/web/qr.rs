//! Shareable link and QR code rendering.

use qrcode::{render::svg, QrCode};

use crate::{DropslotError, Result};

/// Build the shareable URL for a record: `{base_url}/file/{id}`.
pub fn share_url(base_url: &str, id: i64) -> String {
    format!("{}/file/{}", base_url.trim_end_matches('/'), id)
}

/// Render a URL as an SVG QR code.
pub fn qr_svg(url: &str) -> Result<String> {
    let code = QrCode::new(url.as_bytes())
        .map_err(|e| DropslotError::Validation(format!("QR encoding failed: {e}")))?;

    let svg = code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(svg)
}
