//! Images: header decode for dimensions, inline data-URI preview when small.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionResult, Metadata};
use crate::pipeline::encode::data_uri;
use crate::pipeline::input::{format_mib, SourceFile};
use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;
use tracing::{debug, warn};

/// What the header decode yields; pixel data is never decoded.
struct ImageInfo {
    format: ImageFormat,
    width: u32,
    height: u32,
    color: ColorType,
}

pub fn convert(file: &SourceFile, config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    let declared = file.content_type_or_default();
    let mut metadata = Metadata::basic(&file.filename, declared, file.size());

    if file.size() as u64 >= config.image_preview_limit {
        debug!(
            "Image '{}' is {} bytes, over the preview limit of {}",
            file.filename,
            file.size(),
            config.image_preview_limit
        );
        let markdown = format!(
            "# Image: {}\n\n*Image too large for preview (size: {} MiB)*",
            file.filename,
            format_mib(file.size())
        );
        return Ok(ConversionResult::new(markdown, metadata, declared));
    }

    let info = match probe(&file.bytes) {
        Ok(info) => info,
        Err(e) => {
            warn!("Image '{}' could not be decoded: {}", file.filename, e);
            let markdown = format!(
                "# Image: {}\n\n*Could not process image for preview: {}*\n\n**Details:**\n\n- Size: {} bytes",
                file.filename,
                e,
                file.size()
            );
            metadata.insert("error", e);
            return Ok(ConversionResult::new(markdown, metadata, declared));
        }
    };

    debug!(
        "Image '{}': {:?} {}x{} {:?}",
        file.filename, info.format, info.width, info.height, info.color
    );
    metadata.insert("width", info.width);
    metadata.insert("height", info.height);
    let format = format!("{:?}", info.format).to_uppercase();
    let mode = color_mode(info.color);

    let uri = data_uri(info.format.to_mime_type(), &file.bytes);
    let markdown = format!(
        "# Image: {name}\n\n![{name}]({uri})\n\n**Details:**\n\n- Width: {}px\n- Height: {}px\n- Format: {format}\n- Mode: {mode}",
        info.width,
        info.height,
        name = file.filename,
    );
    metadata.insert("format", format);
    metadata.insert("mode", mode);

    Ok(ConversionResult::new(markdown, metadata, declared).with_preview(uri))
}

fn probe(bytes: &[u8]) -> Result<ImageInfo, String> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    let format = reader
        .format()
        .ok_or_else(|| "unrecognised image format".to_string())?;
    let decoder = reader.into_decoder().map_err(|e| e.to_string())?;
    let (width, height) = decoder.dimensions();
    Ok(ImageInfo {
        format,
        width,
        height,
        color: decoder.color_type(),
    })
}

/// Conventional short names for the colour layout (`RGB`, `RGBA`, `L`, …).
fn color_mode(color: ColorType) -> String {
    match color {
        ColorType::L8 | ColorType::L16 => "L".to_string(),
        ColorType::La8 | ColorType::La16 => "LA".to_string(),
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => "RGB".to_string(),
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => "RGBA".to_string(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn run(bytes: Vec<u8>, ct: &str, name: &str) -> ConversionResult {
        let file = SourceFile::new(bytes, Some(ct), name);
        convert(&file, &ConversionConfig::default()).unwrap()
    }

    #[test]
    fn small_png_gets_preview_and_dimensions() {
        let r = run(png(4, 3), "image/png", "dot.png");
        let preview = r.preview().unwrap();
        assert!(preview.starts_with("data:image/png;base64,"));
        assert!(r.markdown().starts_with(&format!("# Image: dot.png\n\n![dot.png]({preview})")));
        assert!(r
            .markdown()
            .ends_with("**Details:**\n\n- Width: 4px\n- Height: 3px\n- Format: PNG\n- Mode: RGBA"));
        assert_eq!(r.metadata().get("width").and_then(|v| v.as_u64()), Some(4));
        assert_eq!(r.metadata().get("height").and_then(|v| v.as_u64()), Some(3));
        assert_eq!(r.metadata().get("format").and_then(|v| v.as_str()), Some("PNG"));
        assert_eq!(r.metadata().get("mode").and_then(|v| v.as_str()), Some("RGBA"));
    }

    #[test]
    fn oversized_image_gets_size_notice_only() {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.resize(2 * 1024 * 1024, 0);
        let r = run(bytes, "image/png", "big.png");
        assert!(r.preview().is_none());
        assert_eq!(
            r.markdown(),
            "# Image: big.png\n\n*Image too large for preview (size: 2.00 MiB)*"
        );
    }

    #[test]
    fn svg_degrades_without_preview() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#.to_vec();
        let svg_len = svg.len();
        let r = run(svg, "image/svg+xml", "logo.svg");
        assert!(r.preview().is_none());
        assert!(r.markdown().starts_with("# Image: logo.svg\n\n*Could not process image for preview:"));
        assert!(r.markdown().ends_with(&format!("**Details:**\n\n- Size: {} bytes", svg_len)));
        assert!(r.diagnostic().is_some());
    }
}
