//! Host document interface.
//!
//! The engine never touches a concrete DOM: selection, tree access,
//! measurement, and class mutation all go through this trait. An adapter
//! instance embodies one evaluation scope — `select` answers for the
//! subtree the host wants evaluated.

use crate::units::Viewport;

pub trait DocumentAdapter {
    type Handle: Copy + Eq;

    /// All elements under the evaluation scope matching a CSS selector.
    fn select(&self, selector: &str) -> Vec<Self::Handle>;

    /// Parent element if any.
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Current rendered box width of the element, in pixels.
    fn box_width_px(&self, element: Self::Handle) -> f32;

    /// Computed font size in pixels; `None` element means the document root.
    /// A `None` result means the host cannot measure it, and the engine
    /// substitutes the configured fallback.
    fn font_size_px(&self, element: Option<Self::Handle>) -> Option<f32>;

    /// Document-root client metrics, the basis for viewport-relative units.
    fn viewport(&self) -> Viewport;

    /// Add a class token to the element's class set. Adding a class that is
    /// already present is a no-op.
    fn add_class(&mut self, element: Self::Handle, class: &str);

    /// Remove a class token from the element's class set. Removing an absent
    /// class is a no-op.
    fn remove_class(&mut self, element: Self::Handle, class: &str);
}
