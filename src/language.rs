use crate::constants::UNKNOWN_LANGUAGE;
use crate::error::ClassifyError;

/// Language identification for cleaned titles
pub trait LanguageClassifier {
    fn detect(&self, text: &str) -> Result<String, ClassifyError>;

    /// Language code, or `"unknown"` when detection fails.
    fn detect_or_unknown(&self, text: &str) -> String {
        self.detect(text).unwrap_or_else(|_| UNKNOWN_LANGUAGE.to_string())
    }
}

/// Trigram detector backed by `whatlang`.
///
/// Codes are ISO 639-1 where one exists, otherwise the ISO 639-3 code
/// `whatlang` reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangClassifier;

impl LanguageClassifier for WhatlangClassifier {
    fn detect(&self, text: &str) -> Result<String, ClassifyError> {
        if text.trim().is_empty() {
            return Err(ClassifyError::Undetermined);
        }

        let info = whatlang::detect(text).ok_or(ClassifyError::Undetermined)?;
        Ok(iso_639_1(info.lang().code()).to_string())
    }
}

fn iso_639_1(code: &'static str) -> &'static str {
    match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl LanguageClassifier for Failing {
        fn detect(&self, _text: &str) -> Result<String, ClassifyError> {
            Err(ClassifyError::Undetermined)
        }
    }

    #[test]
    fn test_failure_defaults_to_unknown() {
        assert_eq!(Failing.detect_or_unknown("anything"), "unknown");
    }

    #[test]
    fn test_empty_text_is_undetermined() {
        assert_eq!(WhatlangClassifier.detect(""), Err(ClassifyError::Undetermined));
        assert_eq!(WhatlangClassifier.detect_or_unknown("   "), "unknown");
    }

    #[test]
    fn test_detects_english_sentence() {
        let code = WhatlangClassifier
            .detect("The quick brown fox jumps over the lazy dog while everyone watches the trending video")
            .unwrap();
        assert_eq!(code, "en");
    }

    #[test]
    fn test_code_mapping() {
        assert_eq!(iso_639_1("eng"), "en");
        assert_eq!(iso_639_1("cmn"), "zh");
        assert_eq!(iso_639_1("xyz"), "xyz");
    }
}
