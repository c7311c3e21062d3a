use std::io;

use cookie_factory as cf;
use thiserror::Error;

use super::ParseError;

pub const MAX_QNAME_LEN: usize = 255;
pub const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Error)]
pub enum QnameError {
    #[error("bogus qname label length: {0}, expected <= {}", MAX_LABEL_LEN)]
    BadLabelLen(usize),
    #[error("exceeded maximum qname length, expected <= {}", MAX_QNAME_LEN)]
    BadTotalLen,
}

impl<I> From<(I, QnameError)> for ParseError<I> {
    fn from(value: (I, QnameError)) -> Self {
        Self::Qname(value)
    }
}

/// A domain name as an owned list of labels. Decoded names copy their
/// bytes out of the message buffer, so the name stays valid after the
/// buffer is gone.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Qname {
    inner: Vec<String>,
}

impl TryFrom<String> for Qname {
    type Error = QnameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Qname::try_from(value.as_str())
    }
}

impl TryFrom<&str> for Qname {
    type Error = QnameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value
            .split('.')
            .map(String::from)
            .collect::<Vec<String>>()
            .try_into()
    }
}

impl TryFrom<Vec<String>> for Qname {
    type Error = QnameError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        let checked_vec = value
            .into_iter()
            .map(|x| {
                if x.len() <= MAX_LABEL_LEN {
                    Ok(x)
                } else {
                    Err(QnameError::BadLabelLen(x.len()))
                }
            })
            .collect::<Result<Vec<String>, QnameError>>()?;

        let sum: usize = checked_vec.iter().map(|x| x.len() + 1).sum();
        if sum + 1 > MAX_QNAME_LEN {
            return Err(QnameError::BadTotalLen);
        }

        Ok(Self { inner: checked_vec })
    }
}

impl std::fmt::Display for Qname {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.join("."))
    }
}

impl Qname {
    pub fn labels(&self) -> &[String] {
        &self.inner
    }

    pub fn serialize<'a, W: io::Write + 'a>(&'a self) -> impl cf::SerializeFn<W> + 'a {
        use cf::{bytes::be_u8, combinator::string, multi::all, sequence::tuple};
        tuple((
            all(self
                .inner
                .iter()
                .map(|x| tuple((be_u8(x.len() as u8), string(x))))),
            be_u8(0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use cookie_factory as cf;

    use super::{Qname, QnameError};

    #[test]
    fn serializes_as_length_prefixed_labels() {
        let qname = Qname::try_from("example.com").unwrap();
        let bytes = cf::gen_simple(qname.serialize(), Vec::new()).unwrap();
        assert_eq!(bytes, b"\x07example\x03com\x00");
    }

    #[test]
    fn display_joins_labels_with_dots() {
        let qname = Qname::try_from("mail.example.com").unwrap();
        assert_eq!(qname.to_string(), "mail.example.com");
    }

    #[test]
    fn label_of_63_bytes_is_legal() {
        let label = "a".repeat(63);
        let name = format!("{label}.com");
        assert!(Qname::try_from(name.as_str()).is_ok());
    }

    #[test]
    fn label_over_63_bytes_is_rejected() {
        let label = "a".repeat(64);
        let name = format!("{label}.com");
        assert!(matches!(
            Qname::try_from(name.as_str()),
            Err(QnameError::BadLabelLen(64))
        ));
    }

    #[test]
    fn name_over_255_bytes_is_rejected() {
        let name = vec!["a".repeat(63); 4].join(".");
        assert!(matches!(
            Qname::try_from(name.as_str()),
            Err(QnameError::BadTotalLen)
        ));
    }
}
