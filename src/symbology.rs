use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Barcode symbologies a scan may ask for. Names follow the ZXing
/// `BarcodeFormat` spelling that clients already send.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbology {
    AZTEC,
    CODABAR,
    CODE_39,
    CODE_93,
    CODE_128,
    DATA_MATRIX,
    EAN_8,
    EAN_13,
    ITF,
    MAXICODE,
    PDF_417,
    QR_CODE,
    RSS_14,
    RSS_EXPANDED,
    UPC_A,
    UPC_E,
    UPC_EAN_EXTENSION,
}

impl Symbology {
    pub const ALL: [Symbology; 17] = [
        Symbology::AZTEC,
        Symbology::CODABAR,
        Symbology::CODE_39,
        Symbology::CODE_93,
        Symbology::CODE_128,
        Symbology::DATA_MATRIX,
        Symbology::EAN_8,
        Symbology::EAN_13,
        Symbology::ITF,
        Symbology::MAXICODE,
        Symbology::PDF_417,
        Symbology::QR_CODE,
        Symbology::RSS_14,
        Symbology::RSS_EXPANDED,
        Symbology::UPC_A,
        Symbology::UPC_E,
        Symbology::UPC_EAN_EXTENSION,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Symbology::AZTEC => "AZTEC",
            Symbology::CODABAR => "CODABAR",
            Symbology::CODE_39 => "CODE_39",
            Symbology::CODE_93 => "CODE_93",
            Symbology::CODE_128 => "CODE_128",
            Symbology::DATA_MATRIX => "DATA_MATRIX",
            Symbology::EAN_8 => "EAN_8",
            Symbology::EAN_13 => "EAN_13",
            Symbology::ITF => "ITF",
            Symbology::MAXICODE => "MAXICODE",
            Symbology::PDF_417 => "PDF_417",
            Symbology::QR_CODE => "QR_CODE",
            Symbology::RSS_14 => "RSS_14",
            Symbology::RSS_EXPANDED => "RSS_EXPANDED",
            Symbology::UPC_A => "UPC_A",
            Symbology::UPC_E => "UPC_E",
            Symbology::UPC_EAN_EXTENSION => "UPC_EAN_EXTENSION",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Symbology {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        Symbology::ALL
            .iter()
            .copied()
            .find(|sym| sym.name() == wanted)
            .ok_or_else(|| ScanError::UnsupportedFormat(s.to_string()))
    }
}

/// The resolved, validated set of symbologies for one scan call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSet(BTreeSet<Symbology>);

impl FormatSet {
    /// Resolve requested names, falling back to `defaults` when the request
    /// names none. The first unknown name fails the whole set.
    pub fn resolve<S: AsRef<str>>(requested: &[S], defaults: &[Symbology]) -> Result<Self> {
        if requested.is_empty() {
            return Ok(Self(defaults.iter().copied().collect()));
        }
        let mut set = BTreeSet::new();
        for name in requested {
            set.insert(name.as_ref().parse::<Symbology>()?);
        }
        Ok(Self(set))
    }

    pub fn contains(&self, sym: Symbology) -> bool {
        self.0.contains(&sym)
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbology> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Symbology::name).collect()
    }
}

impl FromIterator<Symbology> for FormatSet {
    fn from_iter<I: IntoIterator<Item = Symbology>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
