use crate::error::{NebulaError, NebulaResult};

/// Straight (non-premultiplied) color: integer RGB channels plus a
/// real-valued alpha in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 1.0,
    };

    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 1.0,
    };

    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional,
    /// case-insensitive).
    pub fn parse_hex(s: &str) -> NebulaResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> NebulaResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| NebulaError::color(format!("invalid hex byte \"{pair}\"")))
        }

        let (r, g, b, a) = match s.len() {
            6 => (hex_byte(&s[0..2])?, hex_byte(&s[2..4])?, hex_byte(&s[4..6])?, 255),
            8 => (
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
                hex_byte(&s[6..8])?,
            ),
            _ => {
                return Err(NebulaError::color(
                    "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
                ));
            }
        };

        Ok(Self::new(r, g, b, f64::from(a) / 255.0))
    }

    /// Per-channel linear interpolation. RGB rounds to the nearest
    /// integer; alpha stays real-valued, rounded to 2 decimals.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        let alpha = a.a + (b.a - a.a) * t;
        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: ((alpha * 100.0).round() / 100.0).clamp(0.0, 1.0),
        }
    }

    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    pub offset: f64, // 0..1 along the gradient axis
    pub color: Rgba,
}

/// Ordered set of color stops. Offsets are non-decreasing by convention,
/// not enforced.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    stops: Vec<ColorStop>,
}

impl Palette {
    pub fn new(stops: Vec<ColorStop>) -> NebulaResult<Self> {
        if stops.is_empty() {
            return Err(NebulaError::config("palette must have at least one stop"));
        }
        for stop in &stops {
            if !stop.offset.is_finite() || !(0.0..=1.0).contains(&stop.offset) {
                return Err(NebulaError::config("palette stop offset must be in [0, 1]"));
            }
        }
        Ok(Self { stops })
    }

    /// Build a palette from `(offset, hex)` pairs. A stop whose color
    /// string does not parse keeps its slot with a transparent color and
    /// a warning, rather than failing the whole palette.
    pub fn parse(pairs: &[(f64, &str)]) -> NebulaResult<Self> {
        let stops = pairs
            .iter()
            .map(|&(offset, hex)| {
                let color = match Rgba::parse_hex(hex) {
                    Ok(c) => c,
                    Err(err) => {
                        tracing::warn!(%hex, %err, "unparsable palette color, keeping stop transparent");
                        Rgba::TRANSPARENT
                    }
                };
                ColorStop { offset, color }
            })
            .collect();
        Self::new(stops)
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Move one stop along the gradient axis (offset clamped to [0, 1]).
    /// Out-of-range indices are ignored.
    pub fn set_stop_offset(&mut self, index: usize, offset: f64) {
        if let Some(stop) = self.stops.get_mut(index) {
            stop.offset = offset.clamp(0.0, 1.0);
        }
    }

    /// Stop-wise interpolation between two palettes. Offsets interpolate
    /// along with colors. Where stop counts differ, the unpaired tail is
    /// carried over unchanged from whichever palette has it — a local
    /// degradation instead of a failed fade.
    pub fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let paired = from.stops.len().min(to.stops.len());
        let mut stops = Vec::with_capacity(from.stops.len().max(to.stops.len()));

        for i in 0..paired {
            let a = from.stops[i];
            let b = to.stops[i];
            stops.push(ColorStop {
                offset: a.offset + (b.offset - a.offset) * t,
                color: Rgba::lerp(a.color, b.color, t),
            });
        }
        if from.stops.len() > paired {
            stops.extend_from_slice(&from.stops[paired..]);
        } else {
            stops.extend_from_slice(&to.stops[paired..]);
        }

        Self { stops }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum FadeState {
    Idle,
    Fading {
        from: Palette,
        to: Palette,
        duration_secs: f64,
        elapsed_secs: f64,
    },
}

/// Time-boxed linear interpolation between two palettes.
///
/// `begin` snapshots the *current interpolated* palette as the new start
/// point, so re-triggering mid-fade never jumps. On completion the
/// palette snaps exactly to the target (no residual floating drift) and
/// the machine returns to idle.
#[derive(Clone, Debug)]
pub struct PaletteFade {
    current: Palette,
    state: FadeState,
}

impl PaletteFade {
    pub fn new(initial: Palette) -> Self {
        Self {
            current: initial,
            state: FadeState::Idle,
        }
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.state, FadeState::Fading { .. })
    }

    pub fn current(&self) -> &Palette {
        &self.current
    }

    pub fn begin(&mut self, target: Palette, duration_secs: f64) -> NebulaResult<()> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(NebulaError::animation(
                "fade duration must be finite and > 0",
            ));
        }
        self.state = FadeState::Fading {
            from: self.current.clone(),
            to: target,
            duration_secs,
            elapsed_secs: 0.0,
        };
        Ok(())
    }

    pub fn tick(&mut self, dt_secs: f64) -> &Palette {
        if let FadeState::Fading {
            from,
            to,
            duration_secs,
            elapsed_secs,
        } = &mut self.state
        {
            *elapsed_secs += dt_secs;
            let progress = (*elapsed_secs / *duration_secs).clamp(0.0, 1.0);
            if progress >= 1.0 {
                self.current = to.clone();
                self.state = FadeState::Idle;
            } else {
                self.current = Palette::lerp(from, to, progress);
            }
        }
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop(c0: Rgba, c1: Rgba) -> Palette {
        Palette::new(vec![
            ColorStop {
                offset: 0.0,
                color: c0,
            },
            ColorStop {
                offset: 1.0,
                color: c1,
            },
        ])
        .unwrap()
    }

    #[test]
    fn hex_parsing_roundtrip() {
        assert_eq!(Rgba::parse_hex("#7F00FF").unwrap(), Rgba::new(127, 0, 255, 1.0));
        let c = Rgba::parse_hex("8332d3ff").unwrap();
        assert_eq!((c.r, c.g, c.b), (0x83, 0x32, 0xd3));
        assert_eq!(c.a, 1.0);
        assert!(Rgba::parse_hex("#12345").is_err());
        assert!(Rgba::parse_hex("#gggggg").is_err());
    }

    #[test]
    fn empty_palette_is_rejected() {
        assert!(Palette::new(vec![]).is_err());
    }

    #[test]
    fn unparsable_stop_degrades_locally() {
        let p = Palette::parse(&[(0.0, "#7F00FF"), (0.4, "not-a-color"), (0.8, "#000000")])
            .unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p.stops()[1].color, Rgba::TRANSPARENT);
        assert_eq!(p.stops()[0].color, Rgba::new(127, 0, 255, 1.0));
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let from = two_stop(Rgba::new(0, 0, 0, 0.0), Rgba::new(100, 100, 100, 1.0));
        let to = two_stop(Rgba::new(255, 0, 0, 1.0), Rgba::new(0, 0, 0, 0.0));

        assert_eq!(Palette::lerp(&from, &to, 0.0), from);
        assert_eq!(Palette::lerp(&from, &to, 1.0), to);

        let mid = Palette::lerp(&from, &to, 0.5);
        assert_eq!(mid.stops()[0].color, Rgba::new(128, 0, 0, 0.5));
        assert_eq!(mid.stops()[1].color, Rgba::new(50, 50, 50, 0.5));
    }

    #[test]
    fn lerp_is_monotonic_per_channel() {
        let from = two_stop(Rgba::new(20, 200, 0, 0.1), Rgba::new(255, 0, 128, 1.0));
        let to = two_stop(Rgba::new(240, 10, 255, 0.9), Rgba::new(0, 255, 64, 0.2));

        let channels = |p: &Palette| -> Vec<(f64, f64, f64, f64)> {
            p.stops()
                .iter()
                .map(|s| {
                    let c = s.color;
                    (f64::from(c.r), f64::from(c.g), f64::from(c.b), c.a)
                })
                .collect()
        };

        let mut prev = channels(&from);
        for step in 1..=20 {
            let t = step as f64 / 20.0;
            let next = channels(&Palette::lerp(&from, &to, t));
            for (i, (&(pr, pg, pb, pa), &(nr, ng, nb, na))) in
                prev.iter().zip(next.iter()).enumerate()
            {
                let (fr, fg, fb, fa) = channels(&from)[i];
                let (tr, tg, tb, ta) = channels(&to)[i];
                for (f, t_end, p, n) in [
                    (fr, tr, pr, nr),
                    (fg, tg, pg, ng),
                    (fb, tb, pb, nb),
                    (fa, ta, pa, na),
                ] {
                    if t_end >= f {
                        assert!(n >= p, "channel regressed: {p} -> {n} at t={t}");
                    } else {
                        assert!(n <= p, "channel regressed: {p} -> {n} at t={t}");
                    }
                }
            }
            prev = next;
        }
        assert_eq!(Palette::lerp(&from, &to, 1.0), to);
    }

    #[test]
    fn lerp_alpha_rounds_to_two_decimals() {
        let from = two_stop(Rgba::new(0, 0, 0, 0.0), Rgba::BLACK);
        let to = two_stop(Rgba::new(0, 0, 0, 1.0), Rgba::BLACK);
        let c = Palette::lerp(&from, &to, 1.0 / 3.0).stops()[0].color;
        assert_eq!(c.a, 0.33);
    }

    #[test]
    fn mismatched_stop_counts_carry_tail() {
        let from = two_stop(Rgba::BLACK, Rgba::WHITE);
        let to = Palette::new(vec![
            ColorStop {
                offset: 0.0,
                color: Rgba::WHITE,
            },
            ColorStop {
                offset: 0.5,
                color: Rgba::BLACK,
            },
            ColorStop {
                offset: 1.0,
                color: Rgba::TRANSPARENT,
            },
        ])
        .unwrap();

        let mid = Palette::lerp(&from, &to, 0.5);
        assert_eq!(mid.len(), 3);
        assert_eq!(mid.stops()[2], to.stops()[2]);
    }

    #[test]
    fn fade_half_way_is_midpoint() {
        // duration 1s sampled at 0.5s: every channel exactly midway.
        let from = two_stop(Rgba::new(0, 0, 0, 0.0), Rgba::BLACK);
        let to = two_stop(Rgba::new(200, 100, 50, 1.0), Rgba::BLACK);
        let mut fade = PaletteFade::new(from);
        fade.begin(to, 1.0).unwrap();

        let p = fade.tick(0.5);
        assert_eq!(p.stops()[0].color, Rgba::new(100, 50, 25, 0.5));
        assert!(fade.is_fading());
    }

    #[test]
    fn fade_completion_snaps_to_target() {
        let from = two_stop(Rgba::BLACK, Rgba::WHITE);
        let to = two_stop(Rgba::WHITE, Rgba::BLACK);
        let mut fade = PaletteFade::new(from);
        fade.begin(to.clone(), 1.0).unwrap();
        fade.tick(0.7);
        fade.tick(0.7);
        assert!(!fade.is_fading());
        assert_eq!(fade.current(), &to);
    }

    #[test]
    fn retrigger_restarts_from_current_interpolation() {
        let from = two_stop(Rgba::new(0, 0, 0, 1.0), Rgba::BLACK);
        let to = two_stop(Rgba::new(200, 0, 0, 1.0), Rgba::BLACK);
        let back = two_stop(Rgba::new(0, 0, 0, 1.0), Rgba::BLACK);

        let mut fade = PaletteFade::new(from);
        fade.begin(to, 1.0).unwrap();
        fade.tick(0.5); // r == 100

        fade.begin(back, 1.0).unwrap();
        let p = fade.tick(0.5); // halfway from 100 back toward 0
        assert_eq!(p.stops()[0].color.r, 50);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let p = two_stop(Rgba::BLACK, Rgba::WHITE);
        let mut fade = PaletteFade::new(p.clone());
        assert!(fade.begin(p, 0.0).is_err());
    }
}
