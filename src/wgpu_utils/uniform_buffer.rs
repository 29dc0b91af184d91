use std::marker::PhantomData;

/// A `Pod` value living in a uniform buffer
///
/// Uploads are skipped while the bytes match the last upload, so calling
/// [`UniformBuffer::write`] every frame costs nothing for a still camera.
pub struct UniformBuffer<T> {
    buffer: wgpu::Buffer,
    last_upload: Option<Vec<u8>>,
    _content: PhantomData<T>,
}

impl<T: bytemuck::Pod> UniformBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<T>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            last_upload: None,
            _content: PhantomData,
        }
    }

    /// Returns whether anything was queued for upload
    pub fn write(&mut self, queue: &wgpu::Queue, value: &T) -> bool {
        let bytes = bytemuck::bytes_of(value);
        if self.last_upload.as_deref() == Some(bytes) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        self.last_upload = Some(bytes.to_vec());
        true
    }

    /// Layout entry for binding this buffer at `binding`
    pub fn layout_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }
    }

    pub fn bind_entry(&self, binding: u32) -> wgpu::BindGroupEntry<'_> {
        wgpu::BindGroupEntry {
            binding,
            resource: self.buffer.as_entire_binding(),
        }
    }
}
