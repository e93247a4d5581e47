use crate::core::extraction;
use crate::core::prompts;
use crate::domain::ports::GenerationService;
use crate::utils::error::{AdvisorError, Result};
use base64::{engine::general_purpose, Engine as _};

/// Sends the menu photo to the vision service and returns the best-effort
/// JSON text of its answer.
pub async fn recognize_menu<G>(service: &G, image: &[u8]) -> Result<String>
where
    G: GenerationService + ?Sized,
{
    if image.is_empty() {
        return Err(AdvisorError::InputError {
            message: "no menu image provided".to_string(),
        });
    }

    // 圖片以 base64 內嵌於請求中
    let image_base64 = general_purpose::STANDARD.encode(image);
    tracing::debug!("Encoded menu image ({} bytes)", image.len());

    let content = service
        .generate(prompts::recognition_request(&image_base64))
        .await?;
    if content.is_empty() {
        tracing::warn!("Vision service returned no content");
    }
    Ok(extraction::extract_json_text(&content))
}
