//! Barcode scan records.

/// Event yielded by the camera decoder stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    /// Decoder type tag, e.g. `qr` or `org.iso.QRCode`.
    pub kind: String,
    /// Raw decoded payload.
    pub data: String,
}

impl ScanEvent {
    pub fn new(kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }
}

/// Result held between a successful decode and the next reset.
pub type ScanResult = ScanEvent;
