use std::fmt;
use std::net::Ipv4Addr;

use nom::{
    bytes::complete::take,
    number::complete::{be_u16, be_u32},
    sequence::tuple,
};

use super::{
    byte_buffer::ByteMessageBuffer,
    qname::Qname,
    query_type::{QueryClass, QueryType},
    Input, ParseResult,
};

/// Type-specific payload of an answer record. Anything outside the
/// understood set keeps its raw bytes and renders as lowercase hex.
#[derive(Debug, PartialEq)]
pub enum RData {
    A(Ipv4Addr),
    Ns(Qname),
    Cname(Qname),
    Mx { preference: u16, exchange: Qname },
    Other(Vec<u8>),
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => write!(f, "{addr}"),
            RData::Ns(host) => write!(f, "{host}"),
            RData::Cname(host) => write!(f, "{host}"),
            RData::Mx {
                preference,
                exchange,
            } => write!(f, "{preference} {exchange}"),
            RData::Other(data) => {
                for byte in data {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct DnsRecord {
    pub name: Qname,
    pub rtype: QueryType,
    pub rclass: QueryClass,
    pub ttl: u32,
    pub rdata: RData,
}

impl DnsRecord {
    pub fn parse<'a>(i: Input<'a>, buf: &'a ByteMessageBuffer<'a>) -> ParseResult<'a, Self> {
        let (i, (name, rtype, rclass, ttl, data_len)) = tuple((
            buf.read_qname(),
            QueryType::parse,
            QueryClass::parse,
            be_u32,
            be_u16,
        ))(i)?;

        // The cursor always advances exactly `data_len` past the rdata,
        // whatever its interpretation. Names inside rdata are read
        // against the whole message so compression pointers resolve.
        let (rest, data) = take(data_len)(i)?;

        let rdata = match rtype {
            QueryType::A if data.len() == 4 => {
                RData::A(Ipv4Addr::new(data[0], data[1], data[2], data[3]))
            }
            QueryType::Ns if !data.is_empty() => {
                let (_, host) = buf.read_qname()(i)?;
                RData::Ns(host)
            }
            QueryType::Cname if !data.is_empty() => {
                let (_, host) = buf.read_qname()(i)?;
                RData::Cname(host)
            }
            QueryType::Mx if data.len() > 2 => {
                let (after_preference, preference) = be_u16(i)?;
                let (_, exchange) = buf.read_qname()(after_preference)?;
                RData::Mx {
                    preference,
                    exchange,
                }
            }
            // Records with an rdlength too small for their fixed part
            // degrade to the raw rendering instead of failing the parse.
            _ => RData::Other(data.to_vec()),
        };

        Ok((
            rest,
            Self {
                name,
                rtype,
                rclass,
                ttl,
                rdata,
            },
        ))
    }
}
