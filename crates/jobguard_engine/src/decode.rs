use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use jobguard_logging::guard_warn;

/// How far into the document a `<meta charset>` declaration is looked for.
const META_SNIFF_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSnapshot {
    pub html: String,
    pub encoding_label: String,
    /// Some bytes were invalid for the encoding and became U+FFFD.
    pub had_errors: bool,
}

/// Decodes a saved or fetched page to UTF-8.
///
/// Order: BOM, `Content-Type` charset, `<meta charset>`, chardetng guess.
/// Decoding is lossy: pages routinely carry a few stray bytes, and the text
/// around them is still worth classifying.
pub fn decode_snapshot(bytes: &[u8], content_type: Option<&str>) -> DecodedSnapshot {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    let declared = content_type
        .and_then(charset_param)
        .or_else(|| meta_charset(bytes))
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = declared {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(&['"', '\''][..]).to_string())
    })
}

fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(&['"', '\''][..])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    (!label.is_empty()).then_some(label)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedSnapshot {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        guard_warn!(
            "Snapshot has bytes that are not valid {}; replaced them",
            encoding.name()
        );
    }
    DecodedSnapshot {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
        had_errors,
    }
}
