// ============================================
// Tone Curve - Оператор Лоттеса
// ============================================
// f(x) = x^a / (x^(a*d) * b + c)

/// Контраст
pub const CONTRAST: f32 = 1.1;
/// Плечо
pub const SHOULDER: f32 = 0.97;
/// Средний серый на входе/выходе
pub const MID_IN: f32 = 0.3;
pub const MID_OUT: f32 = 0.18;

/// Коэффициенты кривой (a, b, c, d)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCurve {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl ToneCurve {
    /// Решение в замкнутом виде: кривая проходит через (MID_IN, MID_OUT)
    /// и достигает 1 в white_point
    pub fn solve(white_point: f32) -> Self {
        let a = CONTRAST;
        let d = SHOULDER;
        let ad = a * d;
        let h = white_point;

        let b = (h.powf(a) - MID_IN.powf(a) / MID_OUT) / (h.powf(ad) - MID_IN.powf(ad));
        let c = h.powf(a) - h.powf(ad) * b;

        Self { a, b, c, d }
    }

    /// Та же формула, что в tonemap.wgsl
    #[cfg(test)]
    pub fn evaluate(&self, x: f32) -> f32 {
        x.powf(self.a) / (x.powf(self.a * self.d) * self.b + self.c)
    }

    /// Упаковка для uniform: (a, b, c, d)
    pub fn to_array(self) -> [f32; 4] {
        [self.a, self.b, self.c, self.d]
    }
}

/// x^2 / (x + k) достигает 1 в white_point при k = w(w-1)
pub fn cross_talk_coefficient(white_point: f32) -> f32 {
    white_point * (white_point - 1.0)
}
