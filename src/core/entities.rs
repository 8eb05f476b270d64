//! XML Entity Table
//!
//! Named character references resolved during text and attribute scanning:
//! - The five XML entities: &lt; &gt; &amp; &quot; &apos;
//! - The HTML 4 Latin-1, symbol and special sets (&nbsp; &copy; &mdash; ...)
//! - Numeric character references: &#123; &#x7B;
//!
//! Output escaping lives here too, with Cow for zero-copy when nothing needs
//! escaping.

use std::borrow::Cow;

/// Named entities, sorted by name for binary search
static ENTITIES: &[(&str, u32)] = &[
    ("AElig", 198), ("Aacute", 193), ("Acirc", 194), ("Agrave", 192), ("Alpha", 913),
    ("Aring", 197), ("Atilde", 195), ("Auml", 196), ("Beta", 914), ("Ccedil", 199),
    ("Chi", 935), ("Dagger", 8225), ("Delta", 916), ("ETH", 208), ("Eacute", 201),
    ("Ecirc", 202), ("Egrave", 200), ("Epsilon", 917), ("Eta", 919), ("Euml", 203),
    ("Gamma", 915), ("Iacute", 205), ("Icirc", 206), ("Igrave", 204), ("Iota", 921),
    ("Iuml", 207), ("Kappa", 922), ("Lambda", 923), ("Mu", 924), ("Ntilde", 209), ("Nu", 925),
    ("OElig", 338), ("Oacute", 211), ("Ocirc", 212), ("Ograve", 210), ("Omega", 937),
    ("Omicron", 927), ("Oslash", 216), ("Otilde", 213), ("Ouml", 214), ("Phi", 934),
    ("Pi", 928), ("Prime", 8243), ("Psi", 936), ("Rho", 929), ("Scaron", 352), ("Sigma", 931),
    ("THORN", 222), ("Tau", 932), ("Theta", 920), ("Uacute", 218), ("Ucirc", 219),
    ("Ugrave", 217), ("Upsilon", 933), ("Uuml", 220), ("Xi", 926), ("Yacute", 221),
    ("Yuml", 376), ("Zeta", 918), ("aacute", 225), ("acirc", 226), ("acute", 180),
    ("aelig", 230), ("agrave", 224), ("alefsym", 8501), ("alpha", 945), ("amp", 38),
    ("and", 8743), ("ang", 8736), ("apos", 39), ("aring", 229), ("asymp", 8776),
    ("atilde", 227), ("auml", 228), ("bdquo", 8222), ("beta", 946), ("brvbar", 166),
    ("bull", 8226), ("cap", 8745), ("ccedil", 231), ("cedil", 184), ("cent", 162),
    ("chi", 967), ("circ", 710), ("clubs", 9827), ("cong", 8773), ("copy", 169),
    ("crarr", 8629), ("cup", 8746), ("curren", 164), ("dArr", 8659), ("dagger", 8224),
    ("darr", 8595), ("deg", 176), ("delta", 948), ("diams", 9830), ("divide", 247),
    ("eacute", 233), ("ecirc", 234), ("egrave", 232), ("empty", 8709), ("emsp", 8195),
    ("ensp", 8194), ("epsilon", 949), ("equiv", 8801), ("eta", 951), ("eth", 240),
    ("euml", 235), ("euro", 8364), ("exist", 8707), ("fnof", 402), ("forall", 8704),
    ("frac12", 189), ("frac14", 188), ("frac34", 190), ("frasl", 8260), ("gamma", 947),
    ("ge", 8805), ("gt", 62), ("hArr", 8660), ("harr", 8596), ("hearts", 9829),
    ("hellip", 8230), ("iacute", 237), ("icirc", 238), ("iexcl", 161), ("igrave", 236),
    ("image", 8465), ("infin", 8734), ("int", 8747), ("iota", 953), ("iquest", 191),
    ("isin", 8712), ("iuml", 239), ("kappa", 954), ("lArr", 8656), ("lambda", 955),
    ("lang", 9001), ("laquo", 171), ("larr", 8592), ("lceil", 8968), ("ldquo", 8220),
    ("le", 8804), ("lfloor", 8970), ("lowast", 8727), ("loz", 9674), ("lrm", 8206),
    ("lsaquo", 8249), ("lsquo", 8216), ("lt", 60), ("macr", 175), ("mdash", 8212),
    ("micro", 181), ("middot", 183), ("minus", 8722), ("mu", 956), ("nabla", 8711),
    ("nbsp", 160), ("ndash", 8211), ("ne", 8800), ("ni", 8715), ("not", 172), ("notin", 8713),
    ("nsub", 8836), ("ntilde", 241), ("nu", 957), ("oacute", 243), ("ocirc", 244),
    ("oelig", 339), ("ograve", 242), ("oline", 8254), ("omega", 969), ("omicron", 959),
    ("oplus", 8853), ("or", 8744), ("ordf", 170), ("ordm", 186), ("oslash", 248),
    ("otilde", 245), ("otimes", 8855), ("ouml", 246), ("para", 182), ("part", 8706),
    ("permil", 8240), ("perp", 8869), ("phi", 966), ("pi", 960), ("piv", 982), ("plusmn", 177),
    ("pound", 163), ("prime", 8242), ("prod", 8719), ("prop", 8733), ("psi", 968),
    ("quot", 34), ("rArr", 8658), ("radic", 8730), ("rang", 9002), ("raquo", 187),
    ("rarr", 8594), ("rceil", 8969), ("rdquo", 8221), ("real", 8476), ("reg", 174),
    ("rfloor", 8971), ("rho", 961), ("rlm", 8207), ("rsaquo", 8250), ("rsquo", 8217),
    ("sbquo", 8218), ("scaron", 353), ("sdot", 8901), ("sect", 167), ("shy", 173),
    ("sigma", 963), ("sigmaf", 962), ("sim", 8764), ("spades", 9824), ("sub", 8834),
    ("sube", 8838), ("sum", 8721), ("sup", 8835), ("sup1", 185), ("sup2", 178), ("sup3", 179),
    ("supe", 8839), ("szlig", 223), ("tau", 964), ("there4", 8756), ("theta", 952),
    ("thetasym", 977), ("thinsp", 8201), ("thorn", 254), ("tilde", 732), ("times", 215),
    ("trade", 8482), ("uArr", 8657), ("uacute", 250), ("uarr", 8593), ("ucirc", 251),
    ("ugrave", 249), ("uml", 168), ("upsih", 978), ("upsilon", 965), ("uuml", 252),
    ("weierp", 8472), ("xi", 958), ("yacute", 253), ("yen", 165), ("yuml", 255), ("zeta", 950),
    ("zwj", 8205), ("zwnj", 8204),
];

/// Resolve a named entity (without `&` and `;`)
pub fn lookup(name: &str) -> Option<char> {
    ENTITIES
        .binary_search_by(|(entry, _)| entry.cmp(&name))
        .ok()
        .and_then(|index| char::from_u32(ENTITIES[index].1))
}

/// Decode the body of a numeric character reference (the part after `&#`).
///
/// Accepts decimal (`65`) and hexadecimal (`x41` / `X41`) forms. Returns None
/// for empty bodies, bad digits and code points that are not characters.
pub fn decode_numeric(body: &str) -> Option<char> {
    let codepoint = match body.strip_prefix(['x', 'X']) {
        Some(hex) if !hex.is_empty() => u32::from_str_radix(hex, 16).ok()?,
        Some(_) => return None,
        None if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) => body.parse::<u32>().ok()?,
        None => return None,
    };
    char::from_u32(codepoint)
}

/// Escape text and attribute values for XML output.
///
/// Replaces `&`, `<`, `>` and `"`. Apostrophes are left alone since attribute
/// values are always written in double quotes.
pub fn encode_text(input: &str) -> Cow<'_, str> {
    // Fast path: check if any escaping needed
    if !input.bytes().any(|b| matches!(b, b'<' | b'>' | b'&' | b'"')) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape comment text so it cannot terminate the comment early.
///
/// Only the first `-->` is rewritten, to `--&gt;`.
pub fn encode_comment(input: &str) -> Cow<'_, str> {
    if input.contains("-->") {
        Cow::Owned(input.replacen("-->", "--&gt;", 1))
    } else {
        Cow::Borrowed(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(ENTITIES.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_basic_entities() {
        assert_eq!(lookup("amp"), Some('&'));
        assert_eq!(lookup("lt"), Some('<'));
        assert_eq!(lookup("gt"), Some('>'));
        assert_eq!(lookup("quot"), Some('"'));
        assert_eq!(lookup("apos"), Some('\''));
    }

    #[test]
    fn test_html_entities() {
        assert_eq!(lookup("nbsp"), Some('\u{00A0}'));
        assert_eq!(lookup("mdash"), Some('\u{2014}'));
        assert_eq!(lookup("Omega"), Some('Ω'));
        assert_eq!(lookup("omega"), Some('ω'));
        assert_eq!(lookup("diams"), Some('\u{2666}'));
    }

    #[test]
    fn test_unknown_entity() {
        assert_eq!(lookup("unknown"), None);
        assert_eq!(lookup(""), None);
        assert_eq!(lookup("AMP"), None);
    }

    #[test]
    fn test_numeric_decimal() {
        assert_eq!(decode_numeric("65"), Some('A'));
        assert_eq!(decode_numeric("128512"), Some('😀'));
    }

    #[test]
    fn test_numeric_hex() {
        assert_eq!(decode_numeric("x41"), Some('A'));
        assert_eq!(decode_numeric("X1F600"), Some('😀'));
    }

    #[test]
    fn test_numeric_invalid() {
        assert_eq!(decode_numeric(""), None);
        assert_eq!(decode_numeric("x"), None);
        assert_eq!(decode_numeric("12a"), None);
        assert_eq!(decode_numeric("+12"), None);
        assert_eq!(decode_numeric("xD800"), None);
    }

    #[test]
    fn test_encode_text() {
        assert!(matches!(encode_text("plain 'text'"), Cow::Borrowed(_)));
        assert_eq!(encode_text("<hello> & \"world\""), "&lt;hello&gt; &amp; &quot;world&quot;");
    }

    #[test]
    fn test_encode_comment_once() {
        assert_eq!(encode_comment(" a --> b --> c "), " a --&gt; b --> c ");
        assert!(matches!(encode_comment(" fine "), Cow::Borrowed(_)));
    }
}
