//! Length units and conversion to pixels against a measurement snapshot.

/// Supported units for element-query conditions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Unit {
    Px,
    Em,
    Rem,
    Vw,
    Vh,
    Vmin,
    Vmax,
}

impl Unit {
    /// The unit's CSS suffix, as it appears in condition text and in
    /// generated class names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Em => "em",
            Unit::Rem => "rem",
            Unit::Vw => "vw",
            Unit::Vh => "vh",
            Unit::Vmin => "vmin",
            Unit::Vmax => "vmax",
        }
    }
}

/// Document-root client metrics used to evaluate viewport-relative units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width_px: f32,
    pub height_px: f32,
}

/// Context for resolving relative lengths to pixels.
///
/// - `em_size_px` is the computed font size of the context element.
/// - `root_em_size_px` is the computed font size of the document root; `rem`
///   always resolves against it, never the local context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LengthContext {
    pub em_size_px: f32,
    pub root_em_size_px: f32,
    pub viewport: Viewport,
}

impl Default for LengthContext {
    fn default() -> Self {
        Self {
            em_size_px: DEFAULT_EM_PX,
            root_em_size_px: DEFAULT_EM_PX,
            viewport: Viewport {
                width_px: 0.0,
                height_px: 0.0,
            },
        }
    }
}

/// Em size substituted when the host cannot produce a computed font size.
pub const DEFAULT_EM_PX: f32 = 16.0;

/// Compute the pixel value for a measurement using the given context.
///
/// - Px: returns the raw value.
/// - Em/Rem: scales by the context / root em size.
/// - Vw/Vh: a percentage of the viewport dimension.
/// - Vmin/Vmax: min/max of the per-1% vw and vh bases.
pub fn to_pixels(value: f32, unit: Unit, context: &LengthContext) -> f32 {
    match unit {
        Unit::Px => value,
        Unit::Em => value * context.em_size_px,
        Unit::Rem => value * context.root_em_size_px,
        Unit::Vw => value * context.viewport.width_px / 100.0,
        Unit::Vh => value * context.viewport.height_px / 100.0,
        Unit::Vmin | Unit::Vmax => {
            let vw_basis = context.viewport.width_px / 100.0;
            let vh_basis = context.viewport.height_px / 100.0;
            let basis = if matches!(unit, Unit::Vmin) {
                vw_basis.min(vh_basis)
            } else {
                vw_basis.max(vh_basis)
            };
            value * basis
        }
    }
}
