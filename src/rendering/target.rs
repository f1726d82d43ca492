//! Off-screen color + depth target the scene renders into.

/// Depth format shared by the off-screen target and the scene pipeline
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Target dimensions in physical pixels, never zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    fn extent(self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

/// Size bookkeeping, kept apart from the GPU textures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TargetState {
    size: TargetSize,
    /// Bumped on every reallocation so readers know to rebind
    generation: u64,
}

impl TargetState {
    /// Record a requested size; true when storage must be reallocated
    fn request(&mut self, size: TargetSize) -> bool {
        if size == self.size {
            return false;
        }
        self.size = size;
        self.generation += 1;
        true
    }
}

pub struct OffscreenTarget {
    state: TargetState,
    format: wgpu::TextureFormat,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

impl OffscreenTarget {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, size: TargetSize) -> Self {
        let (color_view, depth_view) = Self::allocate(device, format, size);
        Self {
            state: TargetState {
                size,
                generation: 0,
            },
            format,
            color_view,
            depth_view,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: TargetSize,
    ) -> (wgpu::TextureView, wgpu::TextureView) {
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Color"),
            size: size.extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Depth"),
            size: size.extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        (
            color.create_view(&wgpu::TextureViewDescriptor::default()),
            depth.create_view(&wgpu::TextureViewDescriptor::default()),
        )
    }

    /// Match `size`. Same size is a no-op; contents are not preserved otherwise.
    pub fn resize(&mut self, device: &wgpu::Device, size: TargetSize) -> bool {
        if !self.state.request(size) {
            return false;
        }
        let (color_view, depth_view) = Self::allocate(device, self.format, size);
        self.color_view = color_view;
        self.depth_view = depth_view;
        log::debug!(
            "Offscreen target reallocated at {}x{} (generation {})",
            size.width,
            size.height,
            self.state.generation
        );
        true
    }

    pub fn size(&self) -> TargetSize {
        self.state.size
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_never_zero() {
        assert_eq!(TargetSize::new(0, 0), TargetSize::new(1, 1));
        assert_eq!(TargetSize::new(640, 0).height, 1);
        assert_eq!(TargetSize::new(640, 480).width, 640);
    }

    #[test]
    fn test_same_size_twice_is_noop() {
        let mut state = TargetState {
            size: TargetSize::new(800, 600),
            generation: 0,
        };
        assert!(state.request(TargetSize::new(1024, 768)));
        let after_first = state;
        assert!(!state.request(TargetSize::new(1024, 768)));
        assert_eq!(state, after_first);
        assert_eq!(state.size, TargetSize::new(1024, 768));
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn test_generation_counts_reallocations() {
        let mut state = TargetState {
            size: TargetSize::new(1, 1),
            generation: 0,
        };
        for (w, h) in [(2, 2), (2, 2), (3, 2), (3, 2), (2, 2)] {
            state.request(TargetSize::new(w, h));
        }
        assert_eq!(state.generation, 3);
    }
}
