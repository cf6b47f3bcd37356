use crate::coords::Viewport;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *caps.formats.first()?;
    if !prefer_srgb {
        return Some(first);
    }

    caps.formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or(Some(first))
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// A window surface plus its current configuration.
pub(crate) struct Swapchain<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
}

impl<'w> Swapchain<'w> {
    pub(crate) fn new(surface: wgpu::Surface<'w>, config: wgpu::SurfaceConfiguration) -> Self {
        Self { surface, config }
    }

    #[inline]
    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Applies `viewport` if it is drawable. Returns whether the surface was
    /// reconfigured; a 0x0 surface cannot be configured, so minimized windows
    /// keep the previous configuration.
    pub(crate) fn configure(&mut self, device: &wgpu::Device, viewport: Viewport) -> bool {
        if !viewport.is_valid() {
            return false;
        }
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.surface.configure(device, &self.config);
        true
    }

    pub(crate) fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Reacts to a failed [`Swapchain::acquire`].
    pub(crate) fn recover(&self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = action_for(&err);
        match action {
            SurfaceErrorAction::Reconfigured => self.surface.configure(device, &self.config),
            SurfaceErrorAction::Fatal => log::error!("surface error: {err}"),
            SurfaceErrorAction::SkipFrame => log::debug!("surface error: {err}"),
        }
        action
    }
}

pub(crate) fn action_for(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: &[wgpu::TextureFormat]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn prefers_srgb_format() {
        let c = caps(&[wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb]);
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn no_formats() {
        assert_eq!(choose_surface_format(&caps(&[]), true), None);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let c = wgpu::SurfaceCapabilities {
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            ..Default::default()
        };
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn error_actions() {
        assert_eq!(action_for(&wgpu::SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(action_for(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(action_for(&wgpu::SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }
}
