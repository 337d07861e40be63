//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//! - a surface-less variant for offscreen rendering

mod error;
mod frame;
mod gpu;
mod headless;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::{AdapterSummary, Gpu};
pub use headless::HeadlessGpu;
pub use init::GpuInit;
pub use surface::{choose_alpha_mode, choose_present_mode, choose_surface_format, classify_surface_error};
