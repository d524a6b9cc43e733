/// Where a render pass is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEnvironment {
    /// Initial, non-interactive pass (server side or before hydration)
    Server,
    /// A document is available and icons can be materialized
    Interactive,
}

/// Rendering context handed to every render pass.
///
/// Icons are only materialized once the context is interactive; during a
/// server pass they stay pending and their markers are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    environment: RenderEnvironment,
    device_pixel_ratio: f32,
}

impl RenderContext {
    pub fn server() -> Self {
        Self {
            environment: RenderEnvironment::Server,
            device_pixel_ratio: 1.0,
        }
    }

    pub fn interactive(device_pixel_ratio: f32) -> Self {
        Self {
            environment: RenderEnvironment::Interactive,
            device_pixel_ratio: device_pixel_ratio.max(1.0),
        }
    }

    /// Called once the document is mounted
    pub fn hydrate(&mut self, device_pixel_ratio: f32) {
        self.environment = RenderEnvironment::Interactive;
        self.device_pixel_ratio = device_pixel_ratio.max(1.0);
    }

    pub fn is_ready(&self) -> bool {
        self.environment == RenderEnvironment::Interactive
    }

    pub fn environment(&self) -> RenderEnvironment {
        self.environment
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// Whether high-resolution icon assets should be used
    pub fn is_retina(&self) -> bool {
        self.device_pixel_ratio >= 2.0
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::server()
    }
}
