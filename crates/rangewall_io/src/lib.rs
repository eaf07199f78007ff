//! This crate parses the line formats of the engine: rule records
//! (`direction,protocol,port_spec,addr_spec`) and packet queries
//! (`direction,protocol,port,A.B.C.D`), and streams them out of any [BufRead](std::io::BufRead)
//! source one line at a time.
mod default;

use nom::{
    character::complete::char,
    combinator::all_consuming,
    error::Error as NomError,
    sequence::{terminated, tuple},
    Finish, IResult,
};

use rangewall_core::{
    class::Classification,
    error::{Error, Result},
    record::{PacketQuery, RuleRecord},
};

use crate::basic::parser::{
    parse_addr_spec, parse_direction, parse_field, parse_ipv4_dotted, parse_port, parse_port_spec,
    parse_protocol,
};

pub use default::{open_rules, queries, rules, ReaderConfig, RecordReader};

/// [RecordParser] turns one trimmed line into a typed record.
///
/// ***`at` is the 1-based line number used for error reports.***
pub trait RecordParser {
    type Output;

    // Required method
    fn parse_line(&self, line: &str, at: usize) -> Result<Self::Output>;
}

/// Parses rule records.
#[derive(Default, Clone, Copy, Debug)]
pub struct RuleParser;

/// Parses packet queries.
#[derive(Default, Clone, Copy, Debug)]
pub struct QueryParser;

impl RecordParser for RuleParser {
    type Output = RuleRecord;

    fn parse_line(&self, line: &str, at: usize) -> Result<RuleRecord> {
        let (direction, protocol, ports, addrs) = finish_line(
            all_consuming(tuple((
                terminated(parse_field, char(',')),
                terminated(parse_field, char(',')),
                terminated(parse_port_spec, char(',')),
                parse_addr_spec,
            )))(line),
            at,
        )?;
        let class = classify(direction, protocol, at)?;
        Ok(RuleRecord {
            line: at,
            class,
            ports,
            addrs,
        })
    }
}

impl RecordParser for QueryParser {
    type Output = PacketQuery;

    fn parse_line(&self, line: &str, at: usize) -> Result<PacketQuery> {
        let (direction, protocol, port, addr) = finish_line(
            all_consuming(tuple((
                terminated(parse_field, char(',')),
                terminated(parse_field, char(',')),
                terminated(parse_port, char(',')),
                parse_ipv4_dotted,
            )))(line),
            at,
        )
        .map_err(|e| Error::InvalidInput(e.to_string()))?;
        let class = classify(direction, protocol, at)
            .map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(PacketQuery { class, port, addr })
    }
}

/// Maps the two leading tokens of a line onto one of the four classifications.
pub fn classify(direction: &str, protocol: &str, at: usize) -> Result<Classification> {
    let d = all_consuming(parse_direction::<()>)(direction).finish();
    let p = all_consuming(parse_protocol::<()>)(protocol).finish();
    match (d, p) {
        (Ok((_, d)), Ok((_, p))) => Ok(Classification::new(d, p)),
        _ => Err(Error::UnknownClassification {
            line: at,
            direction: direction.to_owned(),
            protocol: protocol.to_owned(),
        }),
    }
}

fn finish_line<'x, O>(res: IResult<&'x str, O, NomError<&'x str>>, at: usize) -> Result<O> {
    match res.finish() {
        Ok((_, o)) => Ok(o),
        Err(e) => Err(Error::MalformedRecord {
            line: at,
            reason: if e.input.is_empty() {
                format!("unexpected end of line ({})", e.code.description())
            } else {
                format!("unexpected `{}` ({})", e.input, e.code.description())
            },
        }),
    }
}

/// Basics for io
pub mod basic {
    /// Basic helper functions for parsing
    pub mod parser {
        use nom::branch::alt;
        use nom::bytes::complete::{is_not, tag};
        use nom::character::complete::{char, digit1};
        use nom::combinator::{opt, value};
        use nom::error::{ErrorKind, ParseError};
        use nom::sequence::{preceded, tuple};
        use nom::Err::Error;
        use nom::IResult;

        use rangewall_core::{
            class::{Direction, Protocol},
            octet::Octets,
            rule::{AddrBox, PortRange, MIN_PORT},
        };

        /// r"[^,]+"
        pub fn parse_field<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, &'a str, E> {
            is_not(",")(input)
        }

        /// r"inbound|outbound"
        pub fn parse_direction<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, Direction, E> {
            alt((
                value(Direction::Inbound, tag("inbound")),
                value(Direction::Outbound, tag("outbound")),
            ))(input)
        }

        /// r"tcp|udp"
        pub fn parse_protocol<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, Protocol, E> {
            alt((
                value(Protocol::Tcp, tag("tcp")),
                value(Protocol::Udp, tag("udp")),
            ))(input)
        }

        /// r"[1-65535]"
        pub fn parse_port<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, u16, E> {
            let (rest, num) = digit1(input)?;
            match num.parse::<u16>() {
                Ok(port) if port >= MIN_PORT => Ok((rest, port)),
                _ => Err(Error(E::from_error_kind(input, ErrorKind::Verify))),
            }
        }

        /// r"[<=255]"
        pub fn parse_octet<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, u8, E> {
            let (rest, num) = digit1(input)?;
            if let Ok(num) = num.parse::<u8>() {
                Ok((rest, num))
            } else {
                Err(Error(E::from_error_kind(input, ErrorKind::Digit)))
            }
        }

        /// r"[<=255].[<=255].[<=255].[<=255]"
        pub fn parse_ipv4_dotted<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, Octets, E> {
            let (rest, (o1, _, o2, _, o3, _, o4)) = tuple((
                parse_octet,
                char('.'),
                parse_octet,
                char('.'),
                parse_octet,
                char('.'),
                parse_octet,
            ))(input)?;
            Ok((rest, Octets::new(o1, o2, o3, o4)))
        }

        /// "P" or "P1-P2"
        pub fn parse_port_spec<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, PortRange, E> {
            let (rest, low) = parse_port(input)?;
            let (rest, high) = opt(preceded(char('-'), parse_port))(rest)?;
            Ok((rest, PortRange::new(low, high.unwrap_or(low))))
        }

        /// "A.B.C.D" or "A.B.C.D-E.F.G.H"
        pub fn parse_addr_spec<'a, E: ParseError<&'a str>>(
            input: &'a str,
        ) -> IResult<&'a str, AddrBox, E> {
            let (rest, low) = parse_ipv4_dotted(input)?;
            let (rest, high) = opt(preceded(char('-'), parse_ipv4_dotted))(rest)?;
            Ok((rest, AddrBox::new(low, high.unwrap_or(low))))
        }
    }
}

#[allow(missing_docs)]
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        open_rules, queries, rules, QueryParser, ReaderConfig, RecordParser, RecordReader,
        RuleParser,
    };
}
