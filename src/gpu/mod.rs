//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization and the depth target.

/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth texture shared by the scene passes.
pub mod texture;
