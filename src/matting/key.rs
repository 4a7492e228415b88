use crate::matting::pixel::Channel;

/// The saturated primary a color plate was photographed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyColor {
    Red,
    Green,
    Blue,
}

/// The channel-selector tables the algorithms dispatch on. Each is a total
/// `KeyColor → Channel` mapping, declared here once so the rotation data
/// is testable independent of any pixel loop.
impl KeyColor {
    /// The channel the key names directly.
    pub const fn dominant_channel(self) -> Channel {
        match self {
            Self::Red => Channel::Red,
            Self::Green => Channel::Green,
            Self::Blue => Channel::Blue,
        }
    }

    /// First cross-channel rotation. Drives the two-plate alpha estimate,
    /// the white half of the three-plate estimate, and the white/color-A
    /// term of the four-plate estimate.
    pub const fn primary_cross_channel(self) -> Channel {
        match self {
            Self::Red => Channel::Blue,
            Self::Green => Channel::Red,
            Self::Blue => Channel::Green,
        }
    }

    /// Second cross-channel rotation. Drives the black half of the
    /// three-plate estimate and the white/color-B term of the four-plate
    /// estimate.
    pub const fn secondary_cross_channel(self) -> Channel {
        match self {
            Self::Red => Channel::Green,
            Self::Green => Channel::Blue,
            Self::Blue => Channel::Red,
        }
    }
}
