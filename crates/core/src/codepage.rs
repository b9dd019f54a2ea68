//! Decoding of diagnostic bytes produced in the host's legacy codepage.
//!
//! Scripts on the target hosts write their error output in a local codepage
//! (GBK in the original deployment). Everything that reaches the log is
//! converted to UTF-8 here and nowhere else.

use encoding_rs::Encoding;

/// A resolved diagnostic encoding.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticCodepage {
    encoding: &'static Encoding,
}

impl DiagnosticCodepage {
    /// Resolve a WHATWG encoding label (`gbk`, `gb2312`, `windows-1252`, ...).
    ///
    /// Unknown labels fall back to UTF-8 with a warning so diagnostics are
    /// still logged, lossily.
    pub fn from_label(label: &str) -> Self {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) => Self { encoding },
            None => {
                tracing::warn!(label, "Unknown diagnostic codepage, falling back to UTF-8");
                Self {
                    encoding: encoding_rs::UTF_8,
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode `bytes` into UTF-8, replacing malformed sequences.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, _) = self.encoding.decode(bytes);
        text.into_owned()
    }
}

impl Default for DiagnosticCodepage {
    fn default() -> Self {
        Self::from_label(crate::catalog_config::DEFAULT_CODEPAGE)
    }
}
