use std::fs;
use std::path::Path;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sketch_core::ImagePayload;

/// Reads an image file into a self-contained `data:` URL. The media type is
/// guessed from the extension; validation of the result is left to the core.
pub fn encode_image(path: &Path) -> anyhow::Result<ImagePayload> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(ImagePayload::new(format!(
        "data:{};base64,{}",
        mime.essence_str(),
        STANDARD.encode(bytes)
    )))
}
