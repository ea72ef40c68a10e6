use std::ops;

/// Linear RGB colour. Channels are never clamped while tracing and may leave [0, 1].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Colour {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Colour {
    pub const BLACK: Colour = Colour::new(0.0, 0.0, 0.0);
    pub const WHITE: Colour = Colour::new(1.0, 1.0, 1.0);

    pub const fn new(red: f64, green: f64, blue: f64) -> Colour {
        Colour { red, green, blue }
    }

    pub fn grey(level: f64) -> Colour {
        Colour::new(level, level, level)
    }

    /// Applies `f` to every channel.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Colour {
        Colour::new(f(self.red), f(self.green), f(self.blue))
    }
}

impl ops::Add<Colour> for Colour {
    type Output = Colour;

    fn add(self, rhs: Colour) -> Colour {
        Colour::new(
            self.red + rhs.red,
            self.green + rhs.green,
            self.blue + rhs.blue,
        )
    }
}

impl ops::AddAssign<Colour> for Colour {
    fn add_assign(&mut self, rhs: Colour) {
        self.red += rhs.red;
        self.green += rhs.green;
        self.blue += rhs.blue;
    }
}

impl ops::Mul<Colour> for Colour {
    type Output = Colour;

    fn mul(self, rhs: Colour) -> Colour {
        Colour::new(
            self.red * rhs.red,
            self.green * rhs.green,
            self.blue * rhs.blue,
        )
    }
}

impl ops::MulAssign<Colour> for Colour {
    fn mul_assign(&mut self, rhs: Colour) {
        self.red *= rhs.red;
        self.green *= rhs.green;
        self.blue *= rhs.blue;
    }
}

impl ops::Mul<f64> for Colour {
    type Output = Colour;

    fn mul(self, rhs: f64) -> Colour {
        self.map(|channel| channel * rhs)
    }
}

impl ops::Div<f64> for Colour {
    type Output = Colour;

    fn div(self, rhs: f64) -> Colour {
        self.map(|channel| channel / rhs)
    }
}

impl From<Colour> for image::Rgb<u8> {
    /// Clamps every channel to [0, 1] and quantises it to 8 bits.
    fn from(value: Colour) -> Self {
        let quantize = |channel: f64| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        image::Rgb([
            quantize(value.red),
            quantize(value.green),
            quantize(value.blue),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_per_channel() {
        let a = Colour::new(0.5, 1.0, 2.0);
        let b = Colour::new(2.0, 0.5, 0.25);
        assert_eq!(a * b, Colour::new(1.0, 0.5, 0.5));
        assert_eq!(a + b, Colour::new(2.5, 1.5, 2.25));
        assert_eq!(a / 10.0, Colour::new(0.05, 0.1, 0.2));
        assert_eq!(a * 2.0, Colour::new(1.0, 2.0, 4.0));
    }

    #[test]
    fn conversion_to_pixel_clamps() {
        let pixel: image::Rgb<u8> = Colour::new(-0.5, 0.5, 7.0).into();
        assert_eq!(pixel, image::Rgb([0, 128, 255]));
    }
}
