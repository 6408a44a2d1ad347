// ============================================
// SMAA - Режимы, субпиксельные индексы и таблица площадей
// ============================================
// Таблица площадей строится при старте: для каждого паттерна
// пересекающих рёбер и пары расстояний до концов линии считается
// площадь трапеции под ревекторизованным силуэтом. Диагональные
// паттерны не используются, поэтому в таблице только ортогональная часть.

/// Вариант SMAA (Z переключает по кругу)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmaaMode {
    Off,
    /// Edges → weights → neighborhood blending
    X1,
    /// То же + temporal resolve с прошлым кадром и flip-jitter
    T2x,
}

impl SmaaMode {
    pub fn next(self) -> Self {
        match self {
            SmaaMode::Off => SmaaMode::X1,
            SmaaMode::X1 => SmaaMode::T2x,
            SmaaMode::T2x => SmaaMode::Off,
        }
    }
}

/// Индексы строк таблицы площадей для кадра (x - диагонали, y - горизонталь, z - вертикаль)
pub fn subsample_indices(frame: u64, enabled: bool) -> [f32; 4] {
    if !enabled {
        return [0.0; 4];
    }
    if frame % 2 == 0 {
        [1.0, 1.0, 1.0, 0.0]
    } else {
        [2.0, 2.0, 2.0, 0.0]
    }
}

/// Параметры SMAA на один кадр
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmaaFrameParams {
    pub subsample_indices: [f32; 4],
    /// Доля прошлого кадра в T2x resolve: 0 - история не используется
    pub history_weight: f32,
}

impl SmaaFrameParams {
    pub fn new(mode: SmaaMode, subsample: bool, frame: u64, history_valid: bool) -> Self {
        let temporal = mode == SmaaMode::T2x;
        Self {
            subsample_indices: subsample_indices(frame, subsample),
            history_weight: if temporal && history_valid { 1.0 } else { 0.0 },
        }
    }
}

/// Сторона плитки одного паттерна: корни расстояний 0..15
pub const AREA_TILE: usize = 16;
/// Значения пересекающих рёбер после билинейной выборки: 0, 0.25, 0.75, 1 → 0, 1, 3, 4
pub const AREA_TILES: usize = 5;
pub const AREA_WIDTH: u32 = (AREA_TILE * AREA_TILES) as u32;
/// Смещения субпикселя по строкам таблицы (строка 0 без смещения)
pub const SUBSAMPLE_OFFSETS: [f32; 7] = [0.0, -0.25, 0.25, -0.125, 0.125, -0.375, 0.375];
pub const AREA_HEIGHT: u32 = AREA_WIDTH * SUBSAMPLE_OFFSETS.len() as u32;

/// После этого расстояния сглаживание коротких линий не применяется
const SMOOTH_MAX_DISTANCE: f32 = 32.0;

/// Плитка (e1, e2) для каждого из 16 паттернов.
/// Бит 0: ребро снизу слева, 1: снизу справа, 2: сверху слева, 3: сверху справа
const PATTERN_TILES: [(usize, usize); 16] = [
    (0, 0), (3, 0), (0, 3), (3, 3),
    (1, 0), (4, 0), (1, 3), (4, 3),
    (0, 1), (3, 1), (0, 4), (3, 4),
    (1, 1), (4, 1), (1, 4), (4, 4),
];

type Area = (f32, f32);

fn add(a: Area, b: Area) -> Area {
    (a.0 + b.0, a.1 + b.1)
}

/// Площадь между отрезком p1→p2 и ребром в пикселе [x, x + 1]:
/// (под ребром, над ребром)
fn segment_area(p1: (f32, f32), p2: (f32, f32), x: f32) -> Area {
    let d = (p2.0 - p1.0, p2.1 - p1.1);
    let x1 = x;
    let x2 = x + 1.0;
    let inside = (x1 >= p1.0 && x1 < p2.0) || (x2 > p1.0 && x2 <= p2.0);
    if !inside {
        return (0.0, 0.0);
    }

    let y1 = p1.1 + d.1 * (x1 - p1.0) / d.0;
    let y2 = p1.1 + d.1 * (x2 - p1.0) / d.0;
    let trapezoid = y1.signum() == y2.signum() || y1.abs() < 1e-4 || y2.abs() < 1e-4;

    if trapezoid {
        let a = (y1 + y2) / 2.0;
        if a < 0.0 {
            (a.abs(), 0.0)
        } else {
            (0.0, a.abs())
        }
    } else {
        // Отрезок пересекает ребро внутри пикселя: два треугольника
        let cross = -p1.1 * d.0 / d.1 + p1.0;
        let frac = cross.fract();
        let a1 = if cross > p1.0 { y1 * frac / 2.0 } else { 0.0 };
        let a2 = if cross < p2.0 { y2 * (1.0 - frac) / 2.0 } else { 0.0 };
        let a = if a1.abs() > a2.abs() { a1 } else { -a2 };
        if a < 0.0 {
            (a1.abs(), a2.abs())
        } else {
            (a2.abs(), a1.abs())
        }
    }
}

/// U-паттерны: на коротких линиях площадь подтягивается к sqrt-профилю
fn smooth_area(d: f32, a1: Area, a2: Area) -> Area {
    let p = (d / SMOOTH_MAX_DISTANCE).clamp(0.0, 1.0);
    let smooth = |a: f32| {
        let b = (a * 2.0).sqrt() * 0.5;
        b + (a - b) * p
    };
    (smooth(a1.0) + smooth(a2.0), smooth(a1.1) + smooth(a2.1))
}

/// Площадь для паттерна и расстояний до левого и правого концов линии
pub fn ortho_area(pattern: usize, left: f32, right: f32, offset: f32) -> Area {
    let d = left + right + 1.0;
    let o1 = 0.5 + offset;
    let o2 = 0.5 + offset - 1.0;
    let mid = (d / 2.0, 0.0);

    match pattern {
        // L-паттерны сдвигаются только со стороны пересекающего ребра
        1 if left <= right => segment_area((0.0, o2), mid, left),
        2 if left >= right => segment_area(mid, (d, o2), left),
        3 => smooth_area(
            d,
            segment_area((0.0, o2), mid, left),
            segment_area(mid, (d, o2), left),
        ),
        4 if left <= right => segment_area((0.0, o1), mid, left),
        // Z-паттерны со смещением: среднее Z и двух L
        6 if offset.abs() > 0.0 => {
            let z = segment_area((0.0, o1), (d, o2), left);
            let l = add(segment_area((0.0, o1), mid, left), segment_area(mid, (d, o2), left));
            ((z.0 + l.0) / 2.0, (z.1 + l.1) / 2.0)
        }
        6 | 7 | 14 => segment_area((0.0, o1), (d, o2), left),
        8 if left >= right => segment_area(mid, (d, o1), left),
        9 if offset.abs() > 0.0 => {
            let z = segment_area((0.0, o2), (d, o1), left);
            let l = add(segment_area((0.0, o2), mid, left), segment_area(mid, (d, o1), left));
            ((z.0 + l.0) / 2.0, (z.1 + l.1) / 2.0)
        }
        9 | 11 | 13 => segment_area((0.0, o2), (d, o1), left),
        12 => smooth_area(
            d,
            segment_area((0.0, o1), mid, left),
            segment_area(mid, (d, o1), left),
        ),
        _ => (0.0, 0.0),
    }
}

fn to_unorm(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Таблица AREA_WIDTH x AREA_HEIGHT, RG8.
/// x = e1 * 16 + sqrt(левое расстояние), y = строка смещения * 80 + e2 * 16 + sqrt(правое)
pub fn area_table() -> Vec<[u8; 2]> {
    let width = AREA_WIDTH as usize;
    let mut data = vec![[0u8; 2]; width * AREA_HEIGHT as usize];

    for (row, &offset) in SUBSAMPLE_OFFSETS.iter().enumerate() {
        for (pattern, &(e1, e2)) in PATTERN_TILES.iter().enumerate() {
            for right in 0..AREA_TILE {
                for left in 0..AREA_TILE {
                    let (a, b) = ortho_area(pattern, (left * left) as f32, (right * right) as f32, offset);
                    let x = e1 * AREA_TILE + left;
                    let y = row * width + e2 * AREA_TILE + right;
                    data[y * width + x] = [to_unorm(a), to_unorm(b)];
                }
            }
        }
    }
    data
}

/// Таблица площадей на GPU (Rg8Unorm, билинейная выборка)
pub struct SmaaAreaTexture {
    pub view: wgpu::TextureView,
}

impl SmaaAreaTexture {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let extent = wgpu::Extent3d {
            width: AREA_WIDTH,
            height: AREA_HEIGHT,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("SMAA Area Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rg8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let table = area_table();
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&table),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(AREA_WIDTH * 2),
                rows_per_image: Some(AREA_HEIGHT),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("SMAA area table {}x{} uploaded", AREA_WIDTH, AREA_HEIGHT);

        Self { view }
    }
}
