use lazy_static::lazy_static;
use phf::{phf_map, phf_set};
use regex::{Captures, Regex};

/// Decodes HTML character references the way an HTML5 parser does.
///
/// Numeric references in `0x80..=0x9F` map to their Windows-1252
/// characters, null, surrogate and out-of-range references become U+FFFD
/// and the legacy named references (`&eacute`, `&copy2024`) are decoded
/// without their `;`. Anything that is not a reference is left as it is.
pub fn unescape(input: &str) -> String {
    CHAR_REF
        .replace_all(input, |caps: &Captures| decode_reference(&caps[1]))
        .into_owned()
}

fn decode_reference(reference: &str) -> String {
    match reference.strip_prefix('#') {
        Some(numeric) => decode_numeric(numeric),
        None => decode_named(reference),
    }
}

fn decode_numeric(numeric: &str) -> String {
    let digits = numeric.trim_end_matches(';');
    let parsed = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    };
    // Only overflow can fail, the pattern guarantees the digits.
    let code_point = parsed.unwrap_or(u32::MAX);

    if let Some(replacement) = WINDOWS_1252.get(&code_point) {
        return replacement.to_string();
    }
    if (0xD800..=0xDFFF).contains(&code_point) || code_point > 0x10FFFF {
        return REPLACEMENT_CHARACTER.to_string();
    }
    if is_dropped_code_point(code_point) {
        return String::new();
    }
    char::from_u32(code_point)
        .map(String::from)
        .unwrap_or_else(|| REPLACEMENT_CHARACTER.to_string())
}

fn is_dropped_code_point(code_point: u32) -> bool {
    matches!(code_point, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || code_point & 0xFFFE == 0xFFFE
}

fn decode_named(name: &str) -> String {
    if let Some(decoded) = lookup_named(name) {
        return decoded;
    }

    // Longest legacy prefix wins, the rest is kept verbatim: `&notit;` gives `¬it;`.
    let boundaries: Vec<usize> = name.char_indices().map(|(i, _)| i).skip(2).collect();
    for &end in boundaries.iter().rev() {
        let (prefix, rest) = name.split_at(end);
        if let Some(decoded) = lookup_named(prefix) {
            return decoded + rest;
        }
    }
    format!("&{name}")
}

/// Looks up a full reference name, with or without its trailing `;`.
fn lookup_named(name: &str) -> Option<String> {
    let terminated = if name.ends_with(';') {
        name.to_owned()
    } else if LEGACY_NAMES.contains(name) {
        format!("{name};")
    } else {
        return None;
    };

    let reference = format!("&{terminated}");
    let decoded = html_escape::decode_html_entities(&reference);
    // Entity values are at most two characters; anything longer is a partial decode.
    if decoded.chars().count() > 2 {
        return None;
    }
    Some(decoded.into_owned())
}

const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

lazy_static! {
    static ref CHAR_REF: Regex =
        Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\x0C <&#;]{1,32};?)").unwrap();
}

static WINDOWS_1252: phf::Map<u32, char> = phf_map! {
    0x00u32 => '\u{FFFD}',
    0x0Du32 => '\r',
    0x80u32 => '\u{20AC}',
    0x81u32 => '\u{81}',
    0x82u32 => '\u{201A}',
    0x83u32 => '\u{0192}',
    0x84u32 => '\u{201E}',
    0x85u32 => '\u{2026}',
    0x86u32 => '\u{2020}',
    0x87u32 => '\u{2021}',
    0x88u32 => '\u{02C6}',
    0x89u32 => '\u{2030}',
    0x8Au32 => '\u{0160}',
    0x8Bu32 => '\u{2039}',
    0x8Cu32 => '\u{0152}',
    0x8Du32 => '\u{8D}',
    0x8Eu32 => '\u{017D}',
    0x8Fu32 => '\u{8F}',
    0x90u32 => '\u{90}',
    0x91u32 => '\u{2018}',
    0x92u32 => '\u{2019}',
    0x93u32 => '\u{201C}',
    0x94u32 => '\u{201D}',
    0x95u32 => '\u{2022}',
    0x96u32 => '\u{2013}',
    0x97u32 => '\u{2014}',
    0x98u32 => '\u{02DC}',
    0x99u32 => '\u{2122}',
    0x9Au32 => '\u{0161}',
    0x9Bu32 => '\u{203A}',
    0x9Cu32 => '\u{0153}',
    0x9Du32 => '\u{9D}',
    0x9Eu32 => '\u{017E}',
    0x9Fu32 => '\u{0178}',
};

/// Named references that HTML5 still decodes without a trailing `;`.
static LEGACY_NAMES: phf::Set<&'static str> = phf_set! {
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml",
    "COPY", "Ccedil", "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT",
    "Iacute", "Icirc", "Igrave", "Iuml", "LT", "Ntilde", "Oacute", "Ocirc",
    "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN", "Uacute",
    "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig",
    "agrave", "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil",
    "cent", "copy", "curren", "deg", "divide", "eacute", "ecirc", "egrave",
    "eth", "euml", "frac12", "frac14", "frac34", "gt", "iacute", "icirc",
    "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf",
    "ordm", "oslash", "otilde", "ouml", "para", "plusmn", "pound", "quot",
    "raquo", "reg", "sect", "shy", "sup1", "sup2", "sup3", "szlig",
    "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml", "yacute",
    "yen", "yuml",
};
