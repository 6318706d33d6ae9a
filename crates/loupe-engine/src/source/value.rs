/// Scalar sample types that can be windowed and interpolated as `f64`.
pub trait RealValue: Copy + Default + Send + Sync + 'static {
    fn to_f64(self) -> f64;
}

macro_rules! real_value {
    ($($t:ty),*) => {
        $(
            impl RealValue for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

real_value!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
