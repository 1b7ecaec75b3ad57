//! Proxy directions an interface is bridged in.

use bitflags::bitflags;

bitflags! {
    /// Which proxy directions are generated for an interface.
    ///
    /// `OUTBOUND` lets local code call a foreign object through the interface;
    /// `INBOUND` lets the foreign host call a locally implemented object.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct BridgeDirections: u8 {
        const OUTBOUND = 0b01;
        const INBOUND = 0b10;
        const BOTH = Self::OUTBOUND.bits() | Self::INBOUND.bits();
    }
}

impl BridgeDirections {
    /// Check if outbound proxies are generated.
    #[inline]
    pub fn outbound(self) -> bool {
        self.contains(BridgeDirections::OUTBOUND)
    }

    /// Check if inbound trampolines and the vtable initializer are generated.
    #[inline]
    pub fn inbound(self) -> bool {
        self.contains(BridgeDirections::INBOUND)
    }
}

impl Default for BridgeDirections {
    fn default() -> Self {
        BridgeDirections::BOTH
    }
}
