//! DNS wire codec per RFC 1035: builds query packets and parses response
//! packets, including label-sequence name compression. Transport is the
//! caller's business; everything here is a pure function over byte
//! buffers, plus an injected random source for query ids.

pub mod packet;

pub use packet::message::{build_query, DnsMessage, DnsMessageError};
pub use packet::qname::Qname;
pub use packet::query_type::{QueryClass, QueryType};
