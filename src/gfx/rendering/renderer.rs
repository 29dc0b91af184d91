use crate::{
    error::RenderError,
    gfx::{camera::PerspectiveCamera, scene::Scene},
};

/// Something that draws a scene onto a display surface
pub trait Renderer {
    /// Pixel size the surface is currently displayed at
    fn display_size(&self) -> (u32, u32);

    /// Pixel size the renderer is currently configured for
    fn size(&self) -> (u32, u32);

    /// Reconfigures the drawing buffer; `update_style` also resizes the
    /// on-screen presentation (the window) to match
    fn set_size(&mut self, width: u32, height: u32, update_style: bool);

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError>;
}

/// Requests one callback at the next display refresh
pub trait FrameScheduler {
    fn request_frame(&mut self);
}
