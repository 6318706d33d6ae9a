use super::argb;

/// Number of entries in a [`Lut`].
pub const LUT_SIZE: usize = 256;

/// 256-entry RGB color lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    pub reds: [u8; LUT_SIZE],
    pub greens: [u8; LUT_SIZE],
    pub blues: [u8; LUT_SIZE],
}

impl Lut {
    /// Builds a table from `f(index) -> (r, g, b)`.
    pub fn from_fn(mut f: impl FnMut(u8) -> (u8, u8, u8)) -> Self {
        let mut lut = Lut {
            reds: [0; LUT_SIZE],
            greens: [0; LUT_SIZE],
            blues: [0; LUT_SIZE],
        };
        for i in 0..LUT_SIZE {
            let (r, g, b) = f(i as u8);
            lut.reds[i] = r;
            lut.greens[i] = g;
            lut.blues[i] = b;
        }
        lut
    }

    pub fn grays() -> Self {
        Self::from_fn(|i| (i, i, i))
    }

    /// Black → red → yellow → white heat ramp.
    pub fn fire() -> Self {
        Self::from_fn(|i| {
            let v = i as u16 * 3;
            let r = v.min(255) as u8;
            let g = v.saturating_sub(255).min(255) as u8;
            let b = v.saturating_sub(510).min(255) as u8;
            (r, g, b)
        })
    }

    /// Opaque pixel for table entry `index`.
    #[inline]
    pub fn lookup(&self, index: u8) -> u32 {
        let i = index as usize;
        argb::rgb(self.reds[i], self.greens[i], self.blues[i])
    }
}

impl Default for Lut {
    fn default() -> Self {
        Self::grays()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grays_is_identity_ramp() {
        let lut = Lut::grays();
        assert_eq!(lut.lookup(0), argb::BLACK);
        assert_eq!(lut.lookup(255), 0xffff_ffff);
        assert_eq!(lut.lookup(7), argb::gray(7));
    }

    #[test]
    fn fire_ends_black_and_white() {
        let lut = Lut::fire();
        assert_eq!(lut.lookup(0), argb::BLACK);
        assert_eq!(lut.lookup(255), 0xffff_ffff);
        assert_eq!(lut.lookup(85), argb::rgb(255, 0, 0));
    }
}
