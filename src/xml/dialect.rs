// Embedded XML dialects found in broadcast WAV files

use serde::Serialize;

/// Recognized XML metadata schemes, in search priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum XmlDialect {
    /// EBU Core (EBU Tech 3293)
    EbuCore,
    /// BWF MetaEdit export
    BwfMetaEdit,
    /// Avid Pro Tools session data
    ProTools,
    /// BWF `axml` chunk
    Axml,
    /// Any other XML document
    Generic,
}

impl XmlDialect {
    /// Search order; the first dialect whose marker occurs anywhere wins
    pub const PRIORITY: [XmlDialect; 5] = [
        XmlDialect::EbuCore,
        XmlDialect::BwfMetaEdit,
        XmlDialect::ProTools,
        XmlDialect::Axml,
        XmlDialect::Generic,
    ];

    /// Byte sequence that opens a block of this dialect
    pub fn start_marker(&self) -> &'static [u8] {
        match self {
            XmlDialect::EbuCore => b"<ebucore:ebuCoreMain",
            XmlDialect::BwfMetaEdit => b"<BWFMetaEdit>",
            XmlDialect::ProTools => b"<ProTools",
            XmlDialect::Axml => b"<axml",
            XmlDialect::Generic => b"<?xml",
        }
    }

    /// Known closing tag; the generic dialect infers it from the root element
    pub fn closing_tag(&self) -> Option<&'static [u8]> {
        match self {
            XmlDialect::EbuCore => Some(&b"</ebucore:ebuCoreMain>"[..]),
            XmlDialect::BwfMetaEdit => Some(&b"</BWFMetaEdit>"[..]),
            XmlDialect::ProTools => Some(&b"</ProTools>"[..]),
            XmlDialect::Axml => Some(&b"</axml>"[..]),
            XmlDialect::Generic => None,
        }
    }

    /// Prefix for flattened metadata keys
    pub fn prefix(&self) -> &'static str {
        match self {
            XmlDialect::EbuCore => "ebucore",
            XmlDialect::BwfMetaEdit => "bwfmetaedit",
            XmlDialect::ProTools => "protools",
            XmlDialect::Axml => "axml",
            XmlDialect::Generic => "xml",
        }
    }

    /// Dialect owning a flattened key such as `ebucore_title`
    pub fn from_key(key: &str) -> Option<Self> {
        let (prefix, _) = key.split_once('_')?;
        Self::PRIORITY.into_iter().find(|d| d.prefix() == prefix)
    }
}

impl std::fmt::Display for XmlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}
