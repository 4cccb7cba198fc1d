/// Open/closed state of the mobile navigation container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuToggle {
    open: bool,
}

impl MenuToggle {
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the state; returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Value for the container's `data-menu-open` attribute.
    pub const fn state_attr(&self) -> &'static str {
        if self.open { "true" } else { "false" }
    }
}
