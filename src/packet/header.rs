use std::io;

use cookie_factory as cf;
use nom::bits::bits;
use nom::number::complete::be_u16;
use nom::sequence::tuple;
use rand::Rng;
use ux::{u3, u4};

use super::{write_bits, BitParsable, BitSerialize, Input, ParseResult, ResultCode};

pub const DNS_HEADER_LEN: usize = 12;

/// The 16-bit header flag word, MSB to LSB:
/// QR(1) OPCODE(4) AA(1) TC(1) RD(1) RA(1) Z(3) RCODE(4).
#[derive(Debug, PartialEq)]
pub struct DnsHeaderFlags {
    pub response: bool,             // 1 bit
    pub opcode: u4,                 // 4 bits
    pub authoritative_answer: bool, // 1 bit
    pub truncated_message: bool,    // 1 bit
    pub recursion_desired: bool,    // 1 bit

    pub recursion_available: bool, // 1 bit
    pub z: u3,                     // 3 bits, reserved
    pub rescode: ResultCode,       // 4 bits
}

impl DnsHeaderFlags {
    /// Flags for a standard recursive query: everything clear except RD.
    pub fn query() -> Self {
        Self {
            response: false,
            opcode: u4::new(0),
            authoritative_answer: false,
            truncated_message: false,
            recursion_desired: true,

            recursion_available: false,
            z: u3::new(0),
            rescode: ResultCode::NoError,
        }
    }

    pub fn parse(i: Input) -> ParseResult<Self> {
        // 1st byte of flags
        let (i, (response, opcode, authoritative_answer, truncated_message, recursion_desired)) =
            bits(tuple((
                bool::parse,
                u4::parse,
                bool::parse,
                bool::parse,
                bool::parse,
            )))(i)?;

        // 2nd byte of flags
        let (i, (recursion_available, z, rescode)) =
            bits(tuple((bool::parse, u3::parse, u4::parse)))(i)?;

        Ok((
            i,
            Self {
                response,
                opcode,
                authoritative_answer,
                truncated_message,
                recursion_desired,
                recursion_available,
                z,
                rescode: ResultCode::from(rescode),
            },
        ))
    }

    pub fn serialize<'a, W: io::Write + 'a>(&'a self) -> impl cf::SerializeFn<W> + 'a {
        write_bits(move |b| {
            self.response.write(b);
            self.opcode.write(b);
            self.authoritative_answer.write(b);
            self.truncated_message.write(b);
            self.recursion_desired.write(b);
            self.recursion_available.write(b);
            self.z.write(b);
            u4::from(self.rescode).write(b);
        })
    }

    /// The packed flag word.
    pub fn bits(&self) -> u16 {
        let bytes = cf::gen_simple(self.serialize(), Vec::new()).unwrap();
        u16::from_be_bytes([bytes[0], bytes[1]])
    }
}

#[derive(Debug, PartialEq)]
pub struct DnsHeader {
    pub id: u16,
    pub flags: DnsHeaderFlags, // 16 bits
    pub questions: u16,
    pub answers: u16,
    pub authoritative_entries: u16,
    pub resource_entries: u16,
}

impl DnsHeader {
    /// Header for an outbound query: random id, one question, no records.
    /// The id source is injected so callers control determinism.
    pub fn new_query<R: Rng>(rng: &mut R, flags: DnsHeaderFlags) -> Self {
        Self {
            id: rng.gen(),
            flags,
            questions: 1,
            answers: 0,
            authoritative_entries: 0,
            resource_entries: 0,
        }
    }

    pub fn parse(i: Input) -> ParseResult<Self> {
        let (i, (id, flags, questions, answers, authoritative_entries, resource_entries)) =
            tuple((be_u16, DnsHeaderFlags::parse, be_u16, be_u16, be_u16, be_u16))(i)?;

        Ok((
            i,
            Self {
                id,
                flags,
                questions,
                answers,
                authoritative_entries,
                resource_entries,
            },
        ))
    }

    pub fn serialize<'a, W: io::Write + 'a>(&'a self) -> impl cf::SerializeFn<W> + 'a {
        use cf::{bytes::be_u16, sequence::tuple};

        tuple((
            be_u16(self.id),
            self.flags.serialize(),
            be_u16(self.questions),
            be_u16(self.answers),
            be_u16(self.authoritative_entries),
            be_u16(self.resource_entries),
        ))
    }
}
