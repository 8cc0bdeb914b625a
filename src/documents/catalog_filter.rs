use std::{fmt, str::FromStr};

use phf::phf_map;

use crate::Status;

/// Storefront platform a listing is filtered on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Mac,
}

/// Storefront language a listing is filtered on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    English,
    German,
    Spanish,
    French,
    Italian,
    Japanese,
    Dutch,
    Swedish,
    Danish,
    Portuguese,
}

/// The encodings of a platform or language used by the storefront: the
/// fragment embedded in wrapIDs, the value of the listing query filter and
/// the attribute id of the GraphQL catalog.
#[derive(Debug)]
pub struct CatalogCodes {
    pub tag: &'static str,
    pub query: &'static str,
    pub id: &'static str,
}

impl Platform {
    pub fn code(&self) -> &'static str {
        match self {
            Platform::Windows => "win",
            Platform::Mac => "mac",
        }
    }

    pub fn codes(&self) -> &'static CatalogCodes {
        &PLATFORM_CODES[self.code()]
    }
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::German => "ger",
            Language::Spanish => "spa",
            Language::French => "fre",
            Language::Italian => "ita",
            Language::Japanese => "jap",
            Language::Dutch => "dut",
            Language::Swedish => "swe",
            Language::Danish => "dan",
            Language::Portuguese => "por",
        }
    }

    pub fn codes(&self) -> &'static CatalogCodes {
        &LANGUAGE_CODES[self.code()]
    }
}

impl FromStr for Platform {
    type Err = Status;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "win" | "windows" => Ok(Platform::Windows),
            "mac" | "macos" => Ok(Platform::Mac),
            _ => Err(Status::invalid_argument(format!(
                "unknown platform '{s}', expected one of: win, mac"
            ))),
        }
    }
}

impl FromStr for Language {
    type Err = Status;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eng" | "english" => Ok(Language::English),
            "ger" | "german" => Ok(Language::German),
            "spa" | "spanish" => Ok(Language::Spanish),
            "fre" | "french" => Ok(Language::French),
            "ita" | "italian" => Ok(Language::Italian),
            "jap" | "japanese" => Ok(Language::Japanese),
            "dut" | "dutch" => Ok(Language::Dutch),
            "swe" | "swedish" => Ok(Language::Swedish),
            "dan" | "danish" => Ok(Language::Danish),
            "por" | "portuguese" => Ok(Language::Portuguese),
            _ => Err(Status::invalid_argument(format!(
                "unknown language '{s}', expected one of: eng, ger, spa, fre, ita, jap, dut, swe, dan, por"
            ))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Platform and language pair selecting one slice of the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogFilter {
    pub platform: Platform,
    pub language: Language,
}

impl CatalogFilter {
    pub fn new(platform: Platform, language: Language) -> Self {
        CatalogFilter { platform, language }
    }

    /// Fragment every matching wrapID contains, e.g. `t1l1` for win/eng.
    pub fn tag(&self) -> String {
        format!("{}{}", self.platform.codes().tag, self.language.codes().tag)
    }

    /// Query string suffix narrowing the listing to this platform and language.
    pub fn query(&self) -> String {
        format!(
            "&platform[filter]={}&language[filter]={}",
            self.platform.codes().query,
            self.language.codes().query
        )
    }
}

static PLATFORM_CODES: phf::Map<&'static str, CatalogCodes> = phf_map! {
    "win" => CatalogCodes { tag: "t1", query: "Windows%2C150", id: "150" },
    "mac" => CatalogCodes { tag: "t2", query: "Mac%2C153", id: "153" },
};

static LANGUAGE_CODES: phf::Map<&'static str, CatalogCodes> = phf_map! {
    "eng" => CatalogCodes { tag: "l1", query: "English%2C114", id: "114" },
    "ger" => CatalogCodes { tag: "l2", query: "German%2C117", id: "117" },
    "spa" => CatalogCodes { tag: "l3", query: "Spanish%2C120", id: "120" },
    "fre" => CatalogCodes { tag: "l4", query: "French%2C123", id: "123" },
    "ita" => CatalogCodes { tag: "l7", query: "Italian%2C126", id: "126" },
    "jap" => CatalogCodes { tag: "l8", query: "Japanese%2C129", id: "129" },
    "dut" => CatalogCodes { tag: "l10", query: "Dutch%2C135", id: "135" },
    "swe" => CatalogCodes { tag: "l11", query: "Swedish%2C138", id: "138" },
    "dan" => CatalogCodes { tag: "l12", query: "Danish%2C141", id: "141" },
    "por" => CatalogCodes { tag: "l13", query: "Portuguese%2C144", id: "144" },
};
