use std::fmt::{Debug, Display, Formatter};

quantity!(Cost);

impl Cost {
    /// Round to whole rupees, half away from zero.
    #[must_use]
    pub fn whole(self) -> Self {
        Self(self.0.round())
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let precision = f.precision().unwrap_or(2);
        write!(f, "₹{:.*}", precision, self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}₹", self.0)
    }
}
