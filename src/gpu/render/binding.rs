// ============================================
// Binding Table - Декларативные привязки ресурсов прохода
// ============================================
// Каждый проход собирает свою таблицу slot → ресурс и получает
// из неё bind group целиком. Между проходами ничего не "протекает".

/// Ресурс в слоте
#[derive(Clone, Copy)]
pub enum Resource<'a> {
    Texture(&'a wgpu::TextureView),
    Sampler(&'a wgpu::Sampler),
    Buffer(&'a wgpu::Buffer),
}

pub struct BindingTable<'a> {
    label: &'a str,
    slots: Vec<(u32, Resource<'a>)>,
}

impl<'a> BindingTable<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            slots: Vec::new(),
        }
    }

    pub fn bind(mut self, slot: u32, resource: Resource<'a>) -> Self {
        upsert(&mut self.slots, slot, resource);
        self
    }

    pub fn texture(self, slot: u32, view: &'a wgpu::TextureView) -> Self {
        self.bind(slot, Resource::Texture(view))
    }

    pub fn sampler(self, slot: u32, sampler: &'a wgpu::Sampler) -> Self {
        self.bind(slot, Resource::Sampler(sampler))
    }

    pub fn buffer(self, slot: u32, buffer: &'a wgpu::Buffer) -> Self {
        self.bind(slot, Resource::Buffer(buffer))
    }

    pub fn build(&self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> wgpu::BindGroup {
        let entries: Vec<wgpu::BindGroupEntry> = self
            .slots
            .iter()
            .map(|(slot, resource)| wgpu::BindGroupEntry {
                binding: *slot,
                resource: match *resource {
                    Resource::Texture(view) => wgpu::BindingResource::TextureView(view),
                    Resource::Sampler(sampler) => wgpu::BindingResource::Sampler(sampler),
                    Resource::Buffer(buffer) => buffer.as_entire_binding(),
                },
            })
            .collect();

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout,
            entries: &entries,
        })
    }
}

/// Повторная запись в слот заменяет прежний ресурс
fn upsert<T>(slots: &mut Vec<(u32, T)>, slot: u32, value: T) {
    match slots.iter_mut().find(|(s, _)| *s == slot) {
        Some(entry) => entry.1 = value,
        None => slots.push((slot, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebinding_a_slot_replaces_it() {
        let mut slots = Vec::new();
        upsert(&mut slots, 0, "hdr");
        upsert(&mut slots, 1, "sampler");
        upsert(&mut slots, 0, "ao");
        assert_eq!(slots, vec![(0, "ao"), (1, "sampler")]);
    }
}
