use std::io;

use cookie_factory as cf;
use nom::sequence::tuple;

use super::{
    byte_buffer::ByteMessageBuffer,
    qname::Qname,
    query_type::{QueryClass, QueryType},
    Input, ParseResult,
};

#[derive(Debug, PartialEq)]
pub struct DnsQuestion {
    pub name: Qname,
    pub qtype: QueryType,
    pub qclass: QueryClass,
}

impl DnsQuestion {
    pub fn new(name: Qname, qtype: QueryType, qclass: QueryClass) -> Self {
        Self {
            name,
            qtype,
            qclass,
        }
    }

    pub fn parse<'a>(i: Input<'a>, buf: &'a ByteMessageBuffer<'a>) -> ParseResult<'a, Self> {
        let (i, (name, qtype, qclass)) =
            tuple((buf.read_qname(), QueryType::parse, QueryClass::parse))(i)?;

        Ok((
            i,
            Self {
                name,
                qtype,
                qclass,
            },
        ))
    }

    /// Wire order per RFC 1035 section 4.1.2: QNAME, QTYPE, QCLASS.
    pub fn serialize<'a, W: io::Write + 'a>(&'a self) -> impl cf::SerializeFn<W> + 'a {
        use cf::sequence::tuple;

        tuple((
            self.name.serialize(),
            self.qtype.serialize(),
            self.qclass.serialize(),
        ))
    }
}
