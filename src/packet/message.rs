use cookie_factory as cf;
use nom::multi::count;
use rand::Rng;
use thiserror::Error;

use super::{
    byte_buffer::{ByteBufferError, ByteMessageBuffer},
    header::{DnsHeader, DnsHeaderFlags},
    qname::{Qname, QnameError},
    query_type::{QueryClass, QueryType},
    question::DnsQuestion,
    record::DnsRecord,
    Input, ParseError, ParseResult,
};

/// Errors crossing the codec boundary. Unknown type and class codes are
/// not errors; they degrade to their numeric form.
#[derive(Debug, Error)]
pub enum DnsMessageError {
    #[error("message shorter than a section declares")]
    Truncated,
    #[error("malformed name: {0}")]
    MalformedName(#[source] ByteBufferError),
    #[error("invalid domain name: {0}")]
    BadName(#[from] QnameError),
    #[error("cannot serialize message: {0:?}")]
    Serialize(cf::GenError),
}

impl<'a> From<nom::Err<ParseError<Input<'a>>>> for DnsMessageError {
    fn from(err: nom::Err<ParseError<Input<'a>>>) -> Self {
        match err {
            nom::Err::Incomplete(_) => Self::Truncated,
            nom::Err::Error(e) | nom::Err::Failure(e) => match e {
                ParseError::Nom(_) => Self::Truncated,
                ParseError::Buffer((_, e)) => Self::MalformedName(e),
                ParseError::Qname((_, e)) => Self::MalformedName(e.into()),
            },
        }
    }
}

/// A decoded message, or a query under construction. Owns all of its
/// contents; nothing borrows from the buffer it was parsed out of.
#[derive(Debug)]
pub struct DnsMessage {
    pub header: DnsHeader,
    pub questions: Vec<DnsQuestion>,
    pub answers: Vec<DnsRecord>,
}

impl DnsMessage {
    /// A standard recursive query with a single question.
    pub fn query<R: Rng>(rng: &mut R, name: Qname, qtype: QueryType, qclass: QueryClass) -> Self {
        Self {
            header: DnsHeader::new_query(rng, DnsHeaderFlags::query()),
            questions: vec![DnsQuestion::new(name, qtype, qclass)],
            answers: Vec::new(),
        }
    }

    pub fn parse<'a>(i: Input<'a>, buf: &'a ByteMessageBuffer<'a>) -> ParseResult<'a, Self> {
        let (i, header) = DnsHeader::parse(i)?;
        let (i, questions) = count(|x| DnsQuestion::parse(x, buf), header.questions as usize)(i)?;
        let (i, answers) = count(|x| DnsRecord::parse(x, buf), header.answers as usize)(i)?;

        // Authority and additional sections stay in the buffer unparsed;
        // their counts remain visible in the header.
        Ok((
            i,
            Self {
                header,
                questions,
                answers,
            },
        ))
    }

    /// Decode a whole message: header, questions, answers.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DnsMessageError> {
        let buf = ByteMessageBuffer::new(data);
        let (_, message) = Self::parse(data, &buf)?;
        Ok(message)
    }

    /// Query-side wire encoding: header plus question section. Answers
    /// only exist on decoded messages and are never re-emitted.
    pub fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cf::SerializeFn<W> + 'a {
        use cf::{multi::all, sequence::tuple};

        tuple((
            self.header.serialize(),
            all(self.questions.iter().map(|x| x.serialize())),
        ))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DnsMessageError> {
        cf::gen_simple(self.serialize(), Vec::new()).map_err(DnsMessageError::Serialize)
    }
}

/// Build the wire form of a single-question recursive query.
///
/// Deterministic except for the id drawn from `rng`.
pub fn build_query<R: Rng>(
    rng: &mut R,
    domain: &str,
    qtype: QueryType,
    qclass: QueryClass,
) -> Result<Vec<u8>, DnsMessageError> {
    let name = Qname::try_from(domain)?;
    DnsMessage::query(rng, name, qtype, qclass).to_bytes()
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::{build_query, DnsMessage, DnsMessageError};
    use crate::packet::query_type::{QueryClass, QueryType};

    /// Response to `example.com A`: one question, one A answer and one
    /// MX answer, both answer names compressed against the question.
    fn sample_response() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&[
            0x17, 0x34, // id
            0x81, 0x80, // QR, RD, RA
            0x00, 0x01, // 1 question
            0x00, 0x02, // 2 answers
            0x00, 0x00, 0x00, 0x00,
        ]);
        data.extend_from_slice(b"\x07example\x03com\x00");
        data.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]); // A IN
        data.extend_from_slice(&[
            0xC0, 12, // name -> example.com
            0x00, 0x01, 0x00, 0x01, // A IN
            0x00, 0x00, 0x0E, 0x10, // ttl 3600
            0x00, 0x04, // rdlength
            93, 184, 216, 34,
        ]);
        data.extend_from_slice(&[
            0xC0, 12, // name -> example.com
            0x00, 0x0F, 0x00, 0x01, // MX IN
            0x00, 0x00, 0x01, 0x2C, // ttl 300
            0x00, 0x09, // rdlength
            0x00, 0x0A, // preference 10
            0x04, b'm', b'a', b'i', b'l', 0xC0, 12,
        ]);
        data
    }

    #[test]
    fn build_query_wire_layout() {
        let mut rng = StepRng::new(0x1734, 0);
        let bytes = build_query(&mut rng, "example.com", QueryType::Mx, QueryClass::In).unwrap();

        assert_eq!(bytes.len(), 29);
        assert_eq!(&bytes[0..2], &[0x17, 0x34]); // id from the rng
        assert_eq!(&bytes[2..4], &[0x01, 0x00]); // RD only
        assert_eq!(&bytes[4..6], &[0x00, 0x01]); // one question
        assert_eq!(&bytes[6..12], &[0x00; 6]); // no records
        assert_eq!(&bytes[12..25], b"\x07example\x03com\x00");
        // QTYPE before QCLASS, per RFC 1035.
        assert_eq!(&bytes[25..], &[0x00, 0x0F, 0x00, 0x01]);
    }

    #[test]
    fn built_query_parses_back() {
        let mut rng = StepRng::new(0xBEEF, 0);
        let bytes = build_query(&mut rng, "Mail.Example.Com", QueryType::A, QueryClass::In).unwrap();

        let message = DnsMessage::from_bytes(&bytes).unwrap();

        assert_eq!(message.header.id, 0xBEEF);
        assert_eq!(message.header.questions, 1);
        assert_eq!(message.questions.len(), 1);
        assert_eq!(message.questions[0].name.to_string(), "Mail.Example.Com");
        assert_eq!(message.questions[0].qtype, QueryType::A);
        assert_eq!(message.questions[0].qclass, QueryClass::In);
        assert!(message.answers.is_empty());
    }

    #[test]
    fn oversized_label_is_an_encode_error() {
        let mut rng = StepRng::new(0, 0);
        let domain = format!("{}.com", "a".repeat(64));

        let err = build_query(&mut rng, &domain, QueryType::A, QueryClass::In).unwrap_err();
        assert!(matches!(err, DnsMessageError::BadName(_)));
    }

    #[test]
    fn parses_response_with_compressed_answers() {
        let message = DnsMessage::from_bytes(&sample_response()).unwrap();

        assert_eq!(message.header.id, 0x1734);
        assert_eq!(message.header.answers, 2);
        assert_eq!(message.questions.len(), 1);
        assert_eq!(message.questions[0].name.to_string(), "example.com");
        assert_eq!(message.answers.len(), 2);

        assert_eq!(message.answers[0].name.to_string(), "example.com");
        assert_eq!(message.answers[0].ttl, 3600);
        assert_eq!(message.answers[0].rdata.to_string(), "93.184.216.34");

        assert_eq!(message.answers[1].rtype, QueryType::Mx);
        assert_eq!(message.answers[1].rdata.to_string(), "10 mail.example.com");
    }

    #[test]
    fn authority_sections_are_left_unparsed() {
        let mut data = sample_response();
        // Declare one authority entry and append an NS record for it.
        data[9] = 0x01;
        data.extend_from_slice(&[
            0xC0, 12, // name -> example.com
            0x00, 0x02, 0x00, 0x01, // NS IN
            0x00, 0x00, 0x0E, 0x10, // ttl
            0x00, 0x02, // rdlength
            0xC0, 12,
        ]);

        let message = DnsMessage::from_bytes(&data).unwrap();

        assert_eq!(message.header.authoritative_entries, 1);
        assert_eq!(message.answers.len(), 2);
    }

    #[test]
    fn truncated_header_is_reported() {
        let err = DnsMessage::from_bytes(&[0u8; 11]).unwrap_err();
        assert!(matches!(err, DnsMessageError::Truncated));
    }

    #[test]
    fn missing_declared_answer_is_reported() {
        let mut data = sample_response();
        data.truncate(35); // cut into the first answer
        let err = DnsMessage::from_bytes(&data).unwrap_err();
        assert!(matches!(err, DnsMessageError::Truncated));
    }

    #[test]
    fn pointer_cycle_is_reported_as_malformed() {
        let mut data = Vec::new();
        data.extend_from_slice(&[
            0x17, 0x34, 0x81, 0x80, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]);
        data.extend_from_slice(&[0xC0, 12]); // question name pointing at itself
        data.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);

        let err = DnsMessage::from_bytes(&data).unwrap_err();
        assert!(matches!(err, DnsMessageError::MalformedName(_)));
    }
}
