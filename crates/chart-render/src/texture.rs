//! Offscreen texture allocation

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;

/// Smallest side of an offscreen chart texture, in pixels
pub const MIN_TEXTURE_SIDE: usize = 128;

/// Texture allocation failures; callers skip the frame and retry later
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("texture {width}x{height} has no pixels")]
    Empty { width: usize, height: usize },

    #[error("texture {width}x{height} exceeds the backend limit of {max} pixels per side")]
    TooLarge { width: usize, height: usize, max: usize },
}

/// Reject sizes the backend cannot hold
pub fn check_texture_size(size: [usize; 2], max_side: usize) -> Result<(), RasterError> {
    let [width, height] = size;
    if width == 0 || height == 0 {
        return Err(RasterError::Empty { width, height });
    }
    if width > max_side || height > max_side {
        return Err(RasterError::TooLarge {
            width,
            height,
            max: max_side,
        });
    }
    Ok(())
}

/// Owner of GPU-side (or stand-in) texture resources
pub trait TextureStore {
    type Handle;

    /// Upload `image` as a new texture
    fn allocate(&mut self, name: &str, image: ColorImage) -> Result<Self::Handle, RasterError>;

    /// Free a texture previously returned by [`TextureStore::allocate`]
    fn release(&mut self, handle: Self::Handle);

    /// Id used by draw commands to paint the texture
    fn texture_id(&self, handle: &Self::Handle) -> TextureId;
}

/// Uploads textures through an egui context
pub struct EguiTextureStore<'a> {
    ctx: &'a Context,
}

impl<'a> EguiTextureStore<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }
}

impl TextureStore for EguiTextureStore<'_> {
    type Handle = TextureHandle;

    fn allocate(&mut self, name: &str, image: ColorImage) -> Result<TextureHandle, RasterError> {
        let max_side = self.ctx.input(|i| i.max_texture_side);
        check_texture_size(image.size, max_side)?;
        tracing::debug!("Uploading texture '{}' ({}x{})", name, image.size[0], image.size[1]);
        Ok(self.ctx.load_texture(name, image, TextureOptions::LINEAR))
    }

    fn release(&mut self, handle: TextureHandle) {
        tracing::debug!("Releasing texture {:?}", handle.id());
        // egui frees the texture when the last handle drops
        drop(handle);
    }

    fn texture_id(&self, handle: &TextureHandle) -> TextureId {
        handle.id()
    }
}
