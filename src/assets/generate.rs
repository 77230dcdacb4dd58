use crate::assets::ingest::{BackgroundImage, accept_trusted_background};
use crate::foundation::error::{MemeError, MemeResult};

/// Prompt used for background generation unless a caller supplies its own.
pub const DEFAULT_PROMPT: &str = "PeaceGuy, the white bear-like figure in a hoodie with a calm, \
confident expression. Generate a square image showing him in a unique, imaginative scene where \
he's spreading peace, resisting war, helping others, or symbolizing unity. The setting should \
reflect action, emotion, or symbolism without using any country flags or specific national \
references. Make the scene meaningful and powerful, but always peaceful in tone. Maintain the \
original style and expression of the character";

/// Parameters sent to an image generation backend.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerationRequest {
    /// Backend model identifier.
    pub model: String,
    /// Text prompt.
    pub prompt: String,
    /// Requested width in pixels.
    pub width: u32,
    /// Requested height in pixels.
    pub height: u32,
    /// Number of images requested; only the first is used.
    pub num_outputs: u32,
    /// Classifier-free guidance scale.
    pub guidance_scale: f64,
    /// Diffusion steps.
    pub num_inference_steps: u32,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            model: "stability-ai/stable-diffusion:ac732df83cea7fff18b8472768c88ad041fa750ff7682a21affe81863cbe77e4".to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            width: 1024,
            height: 1024,
            num_outputs: 1,
            guidance_scale: 7.5,
            num_inference_steps: 50,
        }
    }
}

/// Backend that turns a request into encoded image bytes.
///
/// Transport (HTTP, local model, fixture) is up to the implementor. Returning an empty list means
/// the backend produced nothing.
pub trait ImageGenerator {
    /// Run one generation request and return encoded images in backend order.
    fn generate(&mut self, request: &GenerationRequest) -> anyhow::Result<Vec<Vec<u8>>>;
}

/// Run `generator` and decode its first image as a background.
///
/// Backend failures, empty results and undecodable output are all generation errors.
#[tracing::instrument(skip_all, fields(model = %request.model))]
pub fn generate_background(
    generator: &mut dyn ImageGenerator,
    request: &GenerationRequest,
) -> MemeResult<BackgroundImage> {
    let outputs = generator
        .generate(request)
        .map_err(|e| MemeError::generation(format!("backend failed: {e:#}")))?;
    let first = outputs
        .into_iter()
        .next()
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| MemeError::generation("backend returned no image"))?;
    accept_trusted_background(&first)
        .map_err(|e| MemeError::generation(format!("generated image is unusable: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/generate.rs"]
mod tests;
