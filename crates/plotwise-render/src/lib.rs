//! Plotwise Render Library
//!
//! Renderer abstraction and implementations for Plotwise.
//! The default implementation uses Vello for GPU-accelerated rendering.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod text_measure;
#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{AreaStyle, GridStyle, Palette, RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use text_measure::ParleyTextMeasure;
#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
