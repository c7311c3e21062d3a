use std::net::UdpSocket;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, info};

use dnsq::packet::byte_buffer::MAX_DNS_MSG_SIZE;
use dnsq::{build_query, DnsMessage, QueryClass, QueryType};

const DEFAULT_SERVER: &str = "8.8.8.8";
const DNS_PORT: u16 = 53;
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn lookup(domain: &str, qtype: QueryType, server: (&str, u16)) -> Result<DnsMessage> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.set_read_timeout(Some(RECV_TIMEOUT))?;

    let query = build_query(&mut rand::thread_rng(), domain, qtype, QueryClass::In)?;
    socket.send_to(&query, server)?;
    debug!("sent {} byte query to {}:{}", query.len(), server.0, server.1);

    let mut buf = [0u8; MAX_DNS_MSG_SIZE];
    let (len, _) = socket
        .recv_from(&mut buf)
        .context("no response from server")?;
    debug!("received {len} bytes");

    Ok(DnsMessage::from_bytes(&buf[..len])?)
}

fn print_message(message: &DnsMessage) {
    println!("DNS Response:");
    println!("Header:");
    println!("  ID: {}", message.header.id);
    println!("  Flags: {:#06x}", message.header.flags.bits());
    println!("  Questions: {}", message.header.questions);
    println!("  Answers: {}", message.header.answers);
    println!("  Authorities: {}", message.header.authoritative_entries);
    println!("  Additionals: {}", message.header.resource_entries);

    println!("\nQuestions:");
    for question in &message.questions {
        println!(
            "  {} (Type: {}, Class: {})",
            question.name, question.qtype, question.qclass
        );
    }

    println!("\nAnswers:");
    for answer in &message.answers {
        println!(
            "  {} (Type: {}, Class: {}, TTL: {})",
            answer.name, answer.rtype, answer.rclass, answer.ttl
        );
        println!("    Data: {}", answer.rdata);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let domain = args.next().unwrap_or_else(|| "example.com".to_string());
    let qtype = match args.next() {
        Some(raw) => match raw.parse::<QueryType>() {
            Ok(qtype) => qtype,
            Err(_) => bail!(
                "invalid record type {raw:?}. Available types: {}",
                QueryType::NAMES.join(", ")
            ),
        },
        None => QueryType::A,
    };

    info!("querying {DEFAULT_SERVER} for {domain} ({qtype})");
    let response = lookup(&domain, qtype, (DEFAULT_SERVER, DNS_PORT))?;
    print_message(&response);

    Ok(())
}
