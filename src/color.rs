//! Straight-alpha RGBA8 colors and the CSS-style color grammar used by
//! command arguments (named colors, hex, `rgb()`, `rgba()`).

/// Straight-alpha RGBA8 (r,g,b are not premultiplied).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("not a valid color: '{input}'")]
pub struct ColorParseError {
    pub input: String,
}

/// CSS named colors. Lookup is linear; the table is small.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS-style color string: a named color, `#rgb`, `#rrggbb`,
    /// `#rrggbbaa`, `rgb(r, g, b)` with integer components, or
    /// `rgba(r, g, b, a)` with a fractional alpha in 0..=1.
    pub fn parse_css(input: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError {
            input: input.to_string(),
        };

        // Whitespace is insignificant everywhere in this grammar.
        let s: String = input
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        if let Some((_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == s) {
            return Ok(Self::opaque(rgb[0], rgb[1], rgb[2]));
        }

        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(err);
        }

        if let Some(body) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').collect();
            if parts.len() != 3 {
                return Err(err());
            }
            let chan = |p: &str| p.parse::<u8>().ok();
            return match (chan(parts[0]), chan(parts[1]), chan(parts[2])) {
                (Some(r), Some(g), Some(b)) => Ok(Self::opaque(r, g, b)),
                _ => Err(err()),
            };
        }

        if let Some(body) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').collect();
            if parts.len() != 4 {
                return Err(err());
            }
            let chan = |p: &str| p.parse::<u8>().ok();
            let alpha = parts[3]
                .parse::<f64>()
                .ok()
                .filter(|a| a.is_finite() && (0.0..=1.0).contains(a));
            return match (chan(parts[0]), chan(parts[1]), chan(parts[2]), alpha) {
                (Some(r), Some(g), Some(b), Some(a)) => {
                    Ok(Self::new(r, g, b, (a * 255.0).round() as u8))
                }
                _ => Err(err()),
            };
        }

        Err(err())
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                // #rgb expands each digit: #f0a -> #ff00aa.
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let d = c.to_digit(16)? as u8;
                    out[i] = d * 16 + d;
                }
                Some(Self::opaque(out[0], out[1], out[2]))
            }
            6 => Some(Self::opaque(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
            )),
            8 => Some(Self::new(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Canonical export format: `rgb(r, g, b)` when fully opaque, otherwise
    /// `rgba(r, g, b, a)` with a fractional alpha. Parsing the result yields
    /// an equal color.
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                f64::from(self.a) / 255.0
            )
        }
    }

    /// Scale the alpha channel from 0 toward its full value: `fade(0)` is
    /// fully transparent, `fade(1)` is the color itself.
    pub fn fade(self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            a: (f64::from(self.a) * t).round().clamp(0.0, 255.0) as u8,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_parse() {
        assert_eq!(Rgba8::parse_css("red").unwrap(), Rgba8::opaque(255, 0, 0));
        assert_eq!(
            Rgba8::parse_css(" Rebecca Purple ").unwrap(),
            Rgba8::opaque(102, 51, 153)
        );
        assert_eq!(Rgba8::parse_css("black").unwrap(), Rgba8::BLACK);
    }

    #[test]
    fn hex_forms_parse() {
        assert_eq!(Rgba8::parse_css("#f00").unwrap(), Rgba8::opaque(255, 0, 0));
        assert_eq!(
            Rgba8::parse_css("#00ff7f").unwrap(),
            Rgba8::opaque(0, 255, 127)
        );
        assert_eq!(
            Rgba8::parse_css("#00ff7f80").unwrap(),
            Rgba8::new(0, 255, 127, 128)
        );
    }

    #[test]
    fn functional_forms_parse() {
        assert_eq!(
            Rgba8::parse_css("rgb(1, 2, 3)").unwrap(),
            Rgba8::opaque(1, 2, 3)
        );
        assert_eq!(
            Rgba8::parse_css("rgba(10, 20, 30, 0.5)").unwrap(),
            Rgba8::new(10, 20, 30, 128)
        );
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        for bad in [
            "",
            "notacolor",
            "#12",
            "#12345",
            "rgb(1,2)",
            "rgb(300,0,0)",
            "rgba(0,0,0,2)",
            "rgb(1,2,3",
        ] {
            assert!(Rgba8::parse_css(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn css_export_round_trips() {
        for c in [
            Rgba8::opaque(255, 0, 0),
            Rgba8::new(10, 20, 30, 128),
            Rgba8::new(0, 0, 0, 1),
            Rgba8::BLACK,
        ] {
            assert_eq!(Rgba8::parse_css(&c.to_css()).unwrap(), c);
        }
    }

    #[test]
    fn fade_endpoints() {
        let c = Rgba8::new(9, 8, 7, 200);
        assert_eq!(c.fade(0.0).a, 0);
        assert_eq!(c.fade(1.0), c);
        assert_eq!(c.fade(0.5).a, 100);
    }
}
