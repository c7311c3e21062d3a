use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{Input, ParseResult};

/// Record types from RFC 1035 section 3.2.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Unknown(u16),
    A,     // a host address
    Ns,    // an authoritative name server
    Md,    // a mail destination (obsolete)
    Mf,    // a mail forwarder (obsolete)
    Cname, // the canonical name for an alias
    Soa,   // marks the start of a zone of authority
    Mb,    // a mailbox domain name
    Mg,    // a mail group member
    Mr,    // a mail rename domain name
    Null,  // a null RR
    Wks,   // a well known service description
    Ptr,   // a domain name pointer
    Hinfo, // host information
    Minfo, // mailbox or mail list information
    Mx,    // mail exchange
    Txt,   // text strings
}

impl From<u16> for QueryType {
    fn from(value: u16) -> Self {
        match value {
            1 => QueryType::A,
            2 => QueryType::Ns,
            3 => QueryType::Md,
            4 => QueryType::Mf,
            5 => QueryType::Cname,
            6 => QueryType::Soa,
            7 => QueryType::Mb,
            8 => QueryType::Mg,
            9 => QueryType::Mr,
            10 => QueryType::Null,
            11 => QueryType::Wks,
            12 => QueryType::Ptr,
            13 => QueryType::Hinfo,
            14 => QueryType::Minfo,
            15 => QueryType::Mx,
            16 => QueryType::Txt,
            _ => QueryType::Unknown(value),
        }
    }
}

impl From<QueryType> for u16 {
    fn from(value: QueryType) -> Self {
        match value {
            QueryType::Unknown(x) => x,
            QueryType::A => 1,
            QueryType::Ns => 2,
            QueryType::Md => 3,
            QueryType::Mf => 4,
            QueryType::Cname => 5,
            QueryType::Soa => 6,
            QueryType::Mb => 7,
            QueryType::Mg => 8,
            QueryType::Mr => 9,
            QueryType::Null => 10,
            QueryType::Wks => 11,
            QueryType::Ptr => 12,
            QueryType::Hinfo => 13,
            QueryType::Minfo => 14,
            QueryType::Mx => 15,
            QueryType::Txt => 16,
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Unrecognized codes keep their decimal form instead of failing.
        match *self {
            QueryType::Unknown(x) => write!(f, "{x}"),
            QueryType::A => write!(f, "A"),
            QueryType::Ns => write!(f, "NS"),
            QueryType::Md => write!(f, "MD"),
            QueryType::Mf => write!(f, "MF"),
            QueryType::Cname => write!(f, "CNAME"),
            QueryType::Soa => write!(f, "SOA"),
            QueryType::Mb => write!(f, "MB"),
            QueryType::Mg => write!(f, "MG"),
            QueryType::Mr => write!(f, "MR"),
            QueryType::Null => write!(f, "NULL"),
            QueryType::Wks => write!(f, "WKS"),
            QueryType::Ptr => write!(f, "PTR"),
            QueryType::Hinfo => write!(f, "HINFO"),
            QueryType::Minfo => write!(f, "MINFO"),
            QueryType::Mx => write!(f, "MX"),
            QueryType::Txt => write!(f, "TXT"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown record type name: {0}")]
pub struct UnknownTypeName(pub String);

impl FromStr for QueryType {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(QueryType::A),
            "NS" => Ok(QueryType::Ns),
            "MD" => Ok(QueryType::Md),
            "MF" => Ok(QueryType::Mf),
            "CNAME" => Ok(QueryType::Cname),
            "SOA" => Ok(QueryType::Soa),
            "MB" => Ok(QueryType::Mb),
            "MG" => Ok(QueryType::Mg),
            "MR" => Ok(QueryType::Mr),
            "NULL" => Ok(QueryType::Null),
            "WKS" => Ok(QueryType::Wks),
            "PTR" => Ok(QueryType::Ptr),
            "HINFO" => Ok(QueryType::Hinfo),
            "MINFO" => Ok(QueryType::Minfo),
            "MX" => Ok(QueryType::Mx),
            "TXT" => Ok(QueryType::Txt),
            _ => Err(UnknownTypeName(s.to_string())),
        }
    }
}

impl QueryType {
    pub const NAMES: &'static [&'static str] = &[
        "A", "NS", "MD", "MF", "CNAME", "SOA", "MB", "MG", "MR", "NULL", "WKS", "PTR", "HINFO",
        "MINFO", "MX", "TXT",
    ];

    pub fn parse(i: Input) -> ParseResult<Self> {
        let (i, qtype) = nom::number::complete::be_u16(i)?;
        Ok((i, Self::from(qtype)))
    }

    pub fn serialize<'a, W: std::io::Write + 'a>(
        &'a self,
    ) -> impl cookie_factory::SerializeFn<W> + 'a {
        cookie_factory::bytes::be_u16((*self).into())
    }
}

/// Record classes from RFC 1035 section 3.2.4. Almost everything on the
/// public internet is IN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryClass {
    Unknown(u16),
    In, // the Internet
    Cs, // the CSNET class (obsolete)
    Ch, // the CHAOS class
    Hs, // Hesiod
}

impl From<u16> for QueryClass {
    fn from(value: u16) -> Self {
        match value {
            1 => QueryClass::In,
            2 => QueryClass::Cs,
            3 => QueryClass::Ch,
            4 => QueryClass::Hs,
            _ => QueryClass::Unknown(value),
        }
    }
}

impl From<QueryClass> for u16 {
    fn from(value: QueryClass) -> Self {
        match value {
            QueryClass::Unknown(x) => x,
            QueryClass::In => 1,
            QueryClass::Cs => 2,
            QueryClass::Ch => 3,
            QueryClass::Hs => 4,
        }
    }
}

impl fmt::Display for QueryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            QueryClass::Unknown(x) => write!(f, "{x}"),
            QueryClass::In => write!(f, "IN"),
            QueryClass::Cs => write!(f, "CS"),
            QueryClass::Ch => write!(f, "CH"),
            QueryClass::Hs => write!(f, "HS"),
        }
    }
}

impl QueryClass {
    pub fn parse(i: Input) -> ParseResult<Self> {
        let (i, qclass) = nom::number::complete::be_u16(i)?;
        Ok((i, Self::from(qclass)))
    }

    pub fn serialize<'a, W: std::io::Write + 'a>(
        &'a self,
    ) -> impl cookie_factory::SerializeFn<W> + 'a {
        cookie_factory::bytes::be_u16((*self).into())
    }
}
