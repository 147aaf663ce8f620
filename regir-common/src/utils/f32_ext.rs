pub trait F32Ext
where
    Self: Sized,
{
    fn saturate(self) -> Self;

    /// Returns `self` if it's a finite, non-negative number or `0.0`
    /// otherwise.
    ///
    /// Applied to every weight computed out of scene data before it enters a
    /// reservoir (NaN emittance, degenerate triangles etc.).
    fn or_zero(self) -> Self;
}

impl F32Ext for f32 {
    fn saturate(self) -> Self {
        self.clamp(0.0, 1.0)
    }

    fn or_zero(self) -> Self {
        if self.is_finite() && self > 0.0 {
            self
        } else {
            0.0
        }
    }
}
