/// Builds a bind group together with its layout from a list of entries that
/// share one visibility.
pub struct BindGroupBuilder<'a> {
    label: &'a str,
    visibility: wgpu::ShaderStages,
    layout_entries: Vec<wgpu::BindGroupLayoutEntry>,
    entries: Vec<wgpu::BindGroupEntry<'a>>,
}

impl<'a> BindGroupBuilder<'a> {
    pub fn new(label: &'a str, visibility: wgpu::ShaderStages) -> Self {
        Self {
            label,
            visibility,
            layout_entries: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Declares a uniform buffer binding without a resource, for layouts
    /// shared by many bind groups.
    pub fn uniform_layout(mut self, binding: u32) -> Self {
        self.layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility: self.visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });
        self
    }

    pub fn uniform(self, binding: u32, resource: wgpu::BindingResource<'a>) -> Self {
        let mut builder = self.uniform_layout(binding);
        builder.entries.push(wgpu::BindGroupEntry { binding, resource });
        builder
    }

    pub fn build_layout(&self, device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} bind group layout", self.label)),
            entries: &self.layout_entries,
        })
    }

    pub fn build_with_layout(
        self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} bind group", self.label)),
            layout,
            entries: &self.entries,
        })
    }

    pub fn build(self, device: &wgpu::Device) -> (wgpu::BindGroupLayout, wgpu::BindGroup) {
        let layout = self.build_layout(device);
        let bind_group = self.build_with_layout(device, &layout);
        (layout, bind_group)
    }
}
