/// RGBA8 texture used to round off the background points
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTexture {
    pub size: u32,
    pub pixels: Vec<u8>,
}

impl SpriteTexture {
    /// White disc whose alpha falls linearly from 1 at the centre to 0 at the edge
    pub fn radial_gradient(size: u32) -> Self {
        let half = size as f32 / 2.0;
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - half;
                let dy = y as f32 + 0.5 - half;
                let d = (dx * dx + dy * dy).sqrt() / half;
                let alpha = (1.0 - d).clamp(0.0, 1.0);
                pixels.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
            }
        }

        Self { size, pixels }
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixels[((y * self.size + x) * 4 + 3) as usize]
    }
}
