//! Render surface and render loop

use crate::foundation::time::FrameClock;

use super::error::RenderError;
use super::world::{FrameStats, RenderWorld};

/// Drawable target supplied by the host (canvas, window, offscreen buffer)
pub trait RenderSurface {
    /// Current size in pixels
    fn size(&self) -> (u32, u32);

    /// Resize the drawable area
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    /// Present one finished frame
    fn present(&mut self, stats: &FrameStats) -> Result<(), RenderError>;

    /// Whether the surface can still be drawn to
    fn is_available(&self) -> bool {
        true
    }
}

/// Surface that records presented frames without drawing anything
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    lost: bool,
    presented: u64,
    last_frame: Option<FrameStats>,
}

impl HeadlessSurface {
    /// Create a headless surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Simulate losing the surface (context loss, closed canvas)
    pub fn lose(&mut self) {
        self.lost = true;
    }

    /// Number of frames presented so far
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// Statistics of the most recent frame
    pub fn last_frame(&self) -> Option<&FrameStats> {
        self.last_frame.as_ref()
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSurfaceSize { width, height });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn present(&mut self, stats: &FrameStats) -> Result<(), RenderError> {
        if self.lost {
            return Err(RenderError::SurfaceLost);
        }
        self.presented += 1;
        self.last_frame = Some(*stats);
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.lost
    }
}

/// Binds a render surface and drives the render loop
///
/// The host calls [`RenderEngine::frame`] once per display refresh; while the
/// loop is running each call renders and presents the world.
pub struct RenderEngine {
    surface: Box<dyn RenderSurface>,
    clock: FrameClock,
    running: bool,
    disposed: bool,
}

impl RenderEngine {
    /// Bind a surface, failing if it is unusable
    pub fn new(surface: Box<dyn RenderSurface>) -> Result<Self, RenderError> {
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSurfaceSize { width, height });
        }
        if !surface.is_available() {
            return Err(RenderError::SurfaceLost);
        }
        log::info!("Render engine bound to {}x{} surface", width, height);
        Ok(Self {
            surface,
            clock: FrameClock::new(),
            running: false,
            disposed: false,
        })
    }

    /// Begin continuous rendering
    pub fn start_render_loop(&mut self) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        if !self.running {
            log::debug!("Render loop started");
            self.running = true;
        }
        Ok(())
    }

    /// Stop continuous rendering
    pub fn stop_render_loop(&mut self) {
        if self.running {
            log::debug!("Render loop stopped after {} frames", self.clock.frame_count());
        }
        self.running = false;
    }

    /// Whether the render loop is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the engine was disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Render and present one frame if the loop is running
    pub fn frame(&mut self, world: &mut RenderWorld, delta_time: f32) -> Result<Option<FrameStats>, RenderError> {
        if !self.running {
            return Ok(None);
        }
        self.clock.tick(delta_time);
        let stats = world.render();
        self.surface.present(&stats)?;
        Ok(Some(stats))
    }

    /// Resize the surface, returning the new aspect ratio
    pub fn resize(&mut self, width: u32, height: u32) -> Result<f32, RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        self.surface.resize(width, height)?;
        Ok(width as f32 / height as f32)
    }

    /// Current aspect ratio of the surface
    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.surface.size();
        width as f32 / height.max(1) as f32
    }

    /// Frame timing
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Stop rendering and release the surface binding
    pub fn dispose(&mut self) {
        self.stop_render_loop();
        self.disposed = true;
        log::info!("Render engine disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_size_surface_rejected() {
        let result = RenderEngine::new(Box::new(HeadlessSurface::new(0, 600)));
        assert!(matches!(result, Err(RenderError::InvalidSurfaceSize { width: 0, height: 600 })));
    }

    #[test]
    fn test_frame_only_while_running() {
        let mut engine = RenderEngine::new(Box::new(HeadlessSurface::new(800, 600))).unwrap();
        let mut world = RenderWorld::new(0);

        assert_eq!(engine.frame(&mut world, 0.016).unwrap(), None);
        engine.start_render_loop().unwrap();
        assert!(engine.frame(&mut world, 0.016).unwrap().is_some());
        engine.stop_render_loop();
        assert_eq!(engine.frame(&mut world, 0.016).unwrap(), None);
        assert_eq!(engine.clock().frame_count(), 1);
    }

    #[test]
    fn test_resize_reports_aspect() {
        let mut engine = RenderEngine::new(Box::new(HeadlessSurface::new(800, 600))).unwrap();
        assert_relative_eq!(engine.resize(1600, 800).unwrap(), 2.0);
        assert!(engine.resize(0, 10).is_err());
    }

    #[test]
    fn test_headless_surface_records_frames() {
        let mut surface = HeadlessSurface::new(640, 480);
        let stats = FrameStats { frame: 3, ..FrameStats::default() };
        surface.present(&stats).unwrap();
        assert_eq!(surface.frames_presented(), 1);
        assert_eq!(surface.last_frame().map(|s| s.frame), Some(3));

        surface.lose();
        assert!(!surface.is_available());
        assert_eq!(surface.present(&stats), Err(RenderError::SurfaceLost));
        assert!(matches!(
            RenderEngine::new(Box::new(surface)),
            Err(RenderError::SurfaceLost)
        ));
    }

    #[test]
    fn test_disposed_engine_cannot_restart() {
        let mut engine = RenderEngine::new(Box::new(HeadlessSurface::new(800, 600))).unwrap();
        engine.start_render_loop().unwrap();
        engine.dispose();
        assert!(!engine.is_running());
        assert_eq!(engine.start_render_loop(), Err(RenderError::Disposed));
    }
}
