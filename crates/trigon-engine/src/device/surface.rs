use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks the swapchain format.
///
/// With `prefer_srgb`, the first supported of `Bgra8UnormSrgb`/`Rgba8UnormSrgb`
/// wins; otherwise the surface's own first (preferred) format is used.
/// Returns `None` when the surface reports no formats at all.
pub fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}

pub fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// FIFO is the only mode every surface must support.
pub fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        wgpu::PresentMode::Fifo
    }
}

/// Maps a frame acquisition error to the action the runtime should take.
///
/// Lost/Outdated surfaces are reported as reconfigurable; the caller only
/// reconfigures when `size` is non-zero.
pub fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;

    // wgpu rejects 0x0 configurations; defer until the window has area again.
    if new_size.width == 0 || new_size.height == 0 {
        return;
    }

    let (width, height) = clamp_extent(new_size, device.limits().max_texture_dimension_2d);
    config.width = width;
    config.height = height;

    surface.configure(device, config);
}

/// Caps each side of `size` at `max`, the device's 2D texture limit.
pub(crate) fn clamp_extent(size: PhysicalSize<u32>, max: u32) -> (u32, u32) {
    let clamped = (size.width.min(max), size.height.min(max));
    if clamped != (size.width, size.height) {
        log::warn!(
            "surface size {}x{} exceeds the device limit {max}; using {}x{}",
            size.width,
            size.height,
            clamped.0,
            clamped.1
        );
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_within_limit_is_unchanged() {
        assert_eq!(clamp_extent(PhysicalSize::new(800, 600), 8192), (800, 600));
        assert_eq!(clamp_extent(PhysicalSize::new(8192, 8192), 8192), (8192, 8192));
    }

    #[test]
    fn extent_over_limit_is_capped_per_side() {
        assert_eq!(clamp_extent(PhysicalSize::new(20000, 16), 8192), (8192, 16));
        assert_eq!(clamp_extent(PhysicalSize::new(16, 9000), 8192), (16, 8192));
    }

    fn caps(formats: &[wgpu::TextureFormat]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            present_modes: vec![wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox],
            alpha_modes: vec![
                wgpu::CompositeAlphaMode::Opaque,
                wgpu::CompositeAlphaMode::PreMultiplied,
            ],
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn no_formats_yields_none() {
        assert_eq!(choose_surface_format(&caps(&[]), true), None);
    }

    #[test]
    fn srgb_preferred_when_available() {
        let c = caps(&[
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        assert_eq!(
            choose_surface_format(&c, true),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn rgba_srgb_accepted_as_second_choice() {
        let c = caps(&[
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ]);
        assert_eq!(
            choose_surface_format(&c, true),
            Some(wgpu::TextureFormat::Rgba8UnormSrgb)
        );
    }

    #[test]
    fn first_format_when_srgb_not_wanted() {
        let c = caps(&[
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        assert_eq!(
            choose_surface_format(&c, false),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn first_format_when_no_srgb_reported() {
        let c = caps(&[wgpu::TextureFormat::Rgba16Float]);
        assert_eq!(
            choose_surface_format(&c, true),
            Some(wgpu::TextureFormat::Rgba16Float)
        );
    }

    // ── alpha / present ───────────────────────────────────────────────────

    #[test]
    fn supported_alpha_request_is_kept() {
        let c = caps(&[wgpu::TextureFormat::Bgra8Unorm]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::PreMultiplied
        );
    }

    #[test]
    fn unsupported_alpha_request_falls_back_to_first() {
        let c = caps(&[wgpu::TextureFormat::Bgra8Unorm]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PostMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn empty_alpha_modes_fall_back_to_auto() {
        let mut c = caps(&[wgpu::TextureFormat::Bgra8Unorm]);
        c.alpha_modes.clear();
        assert_eq!(choose_alpha_mode(&c, None), wgpu::CompositeAlphaMode::Auto);
    }

    #[test]
    fn present_mode_request_honored_or_fifo() {
        let c = caps(&[wgpu::TextureFormat::Bgra8Unorm]);
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Mailbox),
            wgpu::PresentMode::Mailbox
        );
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Immediate),
            wgpu::PresentMode::Fifo
        );
    }

    // ── surface errors ────────────────────────────────────────────────────

    #[test]
    fn surface_errors_map_to_actions() {
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Lost),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::Fatal
        );
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Timeout),
            SurfaceErrorAction::SkipFrame
        );
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Other),
            SurfaceErrorAction::SkipFrame
        );
    }
}
