use derive_more::Display;

/// Whether the extrinsic transforms can be applied in a different order without changing `M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Commutativity {
    #[display(fmt = "the transformations do not commute")]
    DoNotCommute,
    #[display(fmt = "only rotations commute with each other")]
    OnlyRotationsCommute,
    #[display(fmt = "all transformations commute")]
    AllCommute,
}

impl Commutativity {
    /// The numeric answer code, `0`, `1` or `2` in declaration order.
    pub fn code(self) -> u8 {
        match self {
            Commutativity::DoNotCommute => 0,
            Commutativity::OnlyRotationsCommute => 1,
            Commutativity::AllCommute => 2,
        }
    }
}

/// Rotations about different axes do not commute, and neither do a rotation and a translation,
/// so reordering the factors of `M = Rz * Rx * Ry * T` changes the camera.
pub fn commutativity() -> Commutativity {
    Commutativity::DoNotCommute
}
