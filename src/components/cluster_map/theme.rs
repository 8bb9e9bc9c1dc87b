//! Visual theming for the cluster map.
//!
//! Provides colors, the fallback cluster palette, and per-element styles.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, new opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let channel = |c: u8| (f64::from(c) + (255.0 - f64::from(c)) * f) as u8;
		Self {
			r: channel(self.r),
			g: channel(self.g),
			b: channel(self.b),
			a: self.a,
		}
	}

	/// Parses `#RRGGBB`, `#RGB`, `rgb(...)` or `rgba(...)`.
	///
	/// Returns `None` for anything else so callers can fall back to a palette.
	pub fn parse(color_str: &str) -> Option<Self> {
		let s = color_str.trim();
		if let Some(hex) = s.strip_prefix('#') {
			return match hex.len() {
				6 => Some(Color::rgb(
					u8::from_str_radix(hex.get(0..2)?, 16).ok()?,
					u8::from_str_radix(hex.get(2..4)?, 16).ok()?,
					u8::from_str_radix(hex.get(4..6)?, 16).ok()?,
				)),
				3 => {
					let nibble = |i: usize| {
						u8::from_str_radix(hex.get(i..i + 1)?, 16)
							.ok()
							.map(|v| v * 17)
					};
					Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
				}
				_ => None,
			};
		}
		if s.starts_with("rgb") {
			let nums: Vec<&str> = s
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			let r = nums.first()?.parse().ok()?;
			let g = nums.get(1)?.parse().ok()?;
			let b = nums.get(2)?.parse().ok()?;
			let a = match nums.get(3) {
				Some(a) => a.parse().ok()?,
				None => 1.0,
			};
			return Some(Color::rgba(r, g, b, a));
		}
		None
	}

	/// CSS hex form when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors handed to clusters whose dataset entry has none.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Cycled by cluster index.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Bright accents that read well on a near-black background (default)
	pub fn neon() -> Self {
		Self {
			colors: vec![
				Color::rgb(122, 255, 122), // Mint
				Color::rgb(0, 230, 255),   // Cyan
				Color::rgb(255, 170, 60),  // Amber
				Color::rgb(255, 100, 180), // Pink
				Color::rgb(170, 130, 255), // Violet
				Color::rgb(255, 235, 90),  // Lemon
				Color::rgb(90, 200, 160),  // Jade
				Color::rgb(255, 120, 100), // Coral
			],
		}
	}

	/// Color for the cluster at `index`, wrapping around.
	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return Color::rgb(128, 128, 128);
		}
		self.colors[index % self.colors.len()]
	}
}

impl Default for NodePalette {
	fn default() -> Self {
		Self::neon()
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for the radial gradient
	pub color_secondary: Color,
	/// Whether to use a radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Connector line style.
#[derive(Clone, Debug)]
pub struct ConnectorStyle {
	/// Opacity of hub-to-cluster links (tinted with the cluster color)
	pub hub_alpha: f64,
	/// Dash pattern (dash, gap) of hub links in world units
	pub hub_dash: (f64, f64),
	/// Opacity of cluster-to-leaf links
	pub leaf_alpha: f64,
}

/// Node glyph and perimeter style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Glyph for a hub without one in the dataset
	pub hub_glyph: &'static str,
	/// Glyph drawn for every leaf
	pub leaf_glyph: &'static str,
	/// Glyph used for clusters without one in the dataset
	pub cluster_glyph: &'static str,
	/// Opacity of the cluster territory outline
	pub perimeter_alpha: f64,
	/// Ring drawn around the selected node
	pub selection_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Theme name, for logs.
	pub name: &'static str,
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Link lines.
	pub connector: ConnectorStyle,
	/// Glyphs, perimeters and selection ring.
	pub node: NodeStyle,
	/// Fallback cluster colors.
	pub palette: NodePalette,
}

impl Theme {
	/// Near-black space backdrop with tinted links (default)
	pub fn void() -> Self {
		Self {
			name: "void",
			background: BackgroundStyle {
				color: Color::rgb(5, 5, 5),
				color_secondary: Color::rgb(14, 16, 22),
				use_gradient: true,
				vignette: 0.2,
			},
			connector: ConnectorStyle {
				hub_alpha: 0.5,
				hub_dash: (1.0, 0.5),
				leaf_alpha: 0.15,
			},
			node: NodeStyle {
				hub_glyph: "🏢",
				leaf_glyph: "🏠",
				cluster_glyph: "●",
				perimeter_alpha: 0.4,
				selection_color: Color::rgba(0, 255, 255, 0.8),
			},
			palette: NodePalette::neon(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::void()
	}
}
