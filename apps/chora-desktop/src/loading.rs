use chora_assets::{AssetError, MatcapImage, Typeface};
use chora_render::AppContext;
use chora_scene::{MaterialHandle, PopulateConfig, PopulateSummary, TextureHandle, populate};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Populate the scene once the font arrives.
///
/// A failed load leaves the scene empty. Returns what was inserted, if
/// anything.
pub fn apply_font(
    ctx: &mut AppContext,
    text_material: MaterialHandle,
    fill_material: MaterialHandle,
    config: &PopulateConfig,
    seed: u64,
    result: Result<Typeface, AssetError>,
) -> Option<PopulateSummary> {
    let font = match result {
        Ok(font) => font,
        Err(e) => {
            tracing::error!("font load failed, scene stays empty: {e}");
            return None;
        }
    };
    let mut rng = StdRng::seed_from_u64(seed);
    match populate(
        &mut ctx.scene,
        &font,
        text_material,
        fill_material,
        config,
        &mut rng,
    ) {
        Ok(summary) => {
            tracing::info!(
                "populated with {} solids and text {} (seed {seed})",
                summary.solids,
                summary.text.short()
            );
            Some(summary)
        }
        Err(e) => {
            tracing::error!("scene population failed: {e}");
            None
        }
    }
}

/// The image to upload for `slot`, or `None` to keep the default matcap.
pub fn accept_matcap(
    slot: TextureHandle,
    result: Result<MatcapImage, AssetError>,
) -> Option<MatcapImage> {
    match result {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::error!("matcap {} failed, keeping default: {e}", slot.0);
            None
        }
    }
}
