//! Frame capture to PNG for recording mode.

use std::sync::mpsc;

use crate::error::SketchError;
use crate::params::RecordingConfig;

const BYTES_PER_PIXEL: u32 = 4;

/// Row pitch the GPU copy requires for `width` pixels
fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Strip per-row padding from a mapped copy buffer
fn unpad_rows(data: &[u8], width: u32, height: u32, padded_bytes_per_row: u32) -> Vec<u8> {
    let row = (width * BYTES_PER_PIXEL) as usize;
    let mut pixels = Vec::with_capacity(row * height as usize);
    for y in 0..height as usize {
        let start = y * padded_bytes_per_row as usize;
        pixels.extend_from_slice(&data[start..start + row]);
    }
    pixels
}

fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// Swap the red and blue channels in place
fn bgra_to_rgba(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

/// Outcome of a `map_async` call once the device has been polled
fn map_status(
    receiver: &mpsc::Receiver<Result<(), wgpu::BufferAsyncError>>,
    frame_num: u64,
) -> Result<(), SketchError> {
    match receiver.try_recv() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(SketchError::Readback { frame_num, source }),
        Err(_) => Err(SketchError::Readback {
            frame_num,
            source: wgpu::BufferAsyncError,
        }),
    }
}

/// Copies presented frames to numbered PNG files
pub struct FrameCapture {
    config: RecordingConfig,
}

impl FrameCapture {
    pub fn new(config: RecordingConfig) -> Self {
        Self { config }
    }

    /// Read `texture` back and save it as frame `frame_num`.
    ///
    /// The texture must have been created with `COPY_SRC`. Blocks until the
    /// copy is done.
    pub fn capture(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        frame_num: u64,
    ) -> Result<(), SketchError> {
        let (width, height) = (texture.width(), texture.height());
        let padded = padded_bytes_per_row(width);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Capture Buffer"),
            size: (padded * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Capture Encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        device.poll(wgpu::Maintain::Wait);
        map_status(&receiver, frame_num)?;

        let mut pixels = {
            let data = slice.get_mapped_range();
            unpad_rows(&data, width, height, padded)
        };
        buffer.unmap();

        if is_bgra(texture.format()) {
            bgra_to_rgba(&mut pixels);
        }

        let path = self.config.frame_path(frame_num);
        image::save_buffer(&path, &pixels, width, height, image::ColorType::Rgba8)
            .map_err(|source| SketchError::Capture { path, source })?;

        let total = self.config.total_frames();
        if frame_num % self.config.fps.max(1) as u64 == 0 || frame_num + 1 == total {
            log::info!("Captured frame {}/{}", frame_num + 1, total);
        }
        Ok(())
    }
}
