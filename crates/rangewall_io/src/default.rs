use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use rangewall_core::error::{Error, Result};

use crate::{QueryParser, RecordParser, RuleParser};

/// Line-level options of a [RecordReader].
#[derive(Clone, Debug)]
pub struct ReaderConfig {
    /// Blank (or all-whitespace) lines are skipped instead of rejected.
    pub skip_blank: bool,
    /// Lines starting with this character, after trimming, are skipped.
    pub comment_prefix: Option<char>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            skip_blank: true,
            comment_prefix: Some('#'),
        }
    }
}

/// [RecordReader] streams typed records out of a line-oriented source.
///
/// A single line buffer is reused for the whole source, so memory does not grow with the number
/// of lines. The reader is fused after the first error: a failed line ends the stream.
///
/// Lines are read as bytes; a line that is not UTF-8 is a malformed record, not an I/O error.
pub struct RecordReader<R, P> {
    source: R,
    parser: P,
    config: ReaderConfig,
    buf: Vec<u8>,
    line: usize,
    done: bool,
}

impl<R: BufRead, P: RecordParser> RecordReader<R, P> {
    pub fn new(source: R, parser: P) -> Self {
        Self::with_config(source, parser, ReaderConfig::default())
    }

    pub fn with_config(source: R, parser: P, config: ReaderConfig) -> Self {
        RecordReader {
            source,
            parser,
            config,
            buf: Vec::new(),
            line: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far, including skipped ones.
    pub fn line(&self) -> usize {
        self.line
    }

    fn skipped(&self, line: &str) -> bool {
        if line.is_empty() {
            return self.config.skip_blank;
        }
        matches!(self.config.comment_prefix, Some(c) if line.starts_with(c))
    }
}

impl<R: BufRead, P: RecordParser> Iterator for RecordReader<R, P> {
    type Item = Result<P::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            self.buf.clear();
            match self.source.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => self.line += 1,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
            let line = match std::str::from_utf8(&self.buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    tracing::debug!(line = self.line, error = %e, "record rejected");
                    self.done = true;
                    return Some(Err(Error::MalformedRecord {
                        line: self.line,
                        reason: format!("invalid UTF-8: {e}"),
                    }));
                }
            };
            if self.skipped(line) {
                continue;
            }
            let res = self.parser.parse_line(line, self.line);
            if let Err(e) = &res {
                tracing::debug!(line = self.line, error = %e, "record rejected");
                self.done = true;
            }
            return Some(res);
        }
    }
}

/// Streams rule records from `source` with the default [ReaderConfig].
pub fn rules<R: BufRead>(source: R) -> RecordReader<R, RuleParser> {
    RecordReader::new(source, RuleParser)
}

/// Streams packet queries from `source` with the default [ReaderConfig].
pub fn queries<R: BufRead>(source: R) -> RecordReader<R, QueryParser> {
    RecordReader::new(source, QueryParser)
}

/// Opens a rule file for streaming.
pub fn open_rules(
    path: impl AsRef<Path>,
    config: ReaderConfig,
) -> Result<RecordReader<BufReader<File>, RuleParser>> {
    let file = File::open(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), "opened rule source");
    Ok(RecordReader::with_config(
        BufReader::new(file),
        RuleParser,
        config,
    ))
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use rangewall_core::class::{Classification, Direction, Protocol};

    use super::*;

    #[test]
    fn test_reader_streams_rules() {
        let content = r#"
        # permit web
        inbound,tcp,80-85,192.168.1.1-192.168.1.10

        outbound,udp,500,1.1.1.1
        "#;
        let mut reader = rules(content.as_bytes());
        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.line, 3);
        assert_eq!(first.class, Classification::new(Direction::Inbound, Protocol::Tcp));
        let second = reader.next().unwrap().unwrap();
        assert_eq!(second.line, 5);
        assert_eq!(second.class, Classification::new(Direction::Outbound, Protocol::Udp));
        assert!(reader.next().is_none());
        assert_eq!(reader.line(), 6);
    }

    #[test]
    fn test_reader_handles_crlf() {
        let content = "inbound,tcp,443,10.0.0.1\r\ninbound,tcp,443,10.0.0.1\r\n";
        let records: Vec<_> = rules(content.as_bytes()).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ports, records[1].ports);
    }

    #[test]
    fn test_reader_strict_config() {
        let config = ReaderConfig {
            skip_blank: false,
            comment_prefix: None,
        };
        let content = "inbound,tcp,443,10.0.0.1\n\ninbound,tcp,443,10.0.0.1\n";
        let mut reader = RecordReader::with_config(content.as_bytes(), RuleParser, config.clone());
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
        assert!(reader.next().is_none());

        let content = "# comment\n";
        let mut reader = RecordReader::with_config(content.as_bytes(), RuleParser, config);
        assert!(reader.next().unwrap().is_err());
    }

    #[test]
    fn test_reader_fuses_after_error() {
        let content = "inbound,tcp,80,1.1.1.1\nbogus\noutbound,udp,53,8.8.8.8\n";
        let results: Vec<_> = rules(content.as_bytes()).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_reader_propagates_io_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
            }
        }
        let mut reader = rules(io::BufReader::new(Broken));
        assert!(matches!(reader.next(), Some(Err(Error::Io(_)))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_reader_rejects_invalid_utf8() {
        let content: &[u8] = b"inbound,tcp,80,1.1.1.1\ninbound,tcp,80,1.1.1.\xff\noutbound,udp,53,8.8.8.8\n";
        let results: Vec<_> = rules(content).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }), "{err}");
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_queries() {
        let content = "inbound,tcp,82,192.168.1.5\noutbound,udp,501,1.1.1.1\n";
        let qs: Vec<_> = queries(content.as_bytes()).collect::<Result<_>>().unwrap();
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[1].port, 501);
    }

    #[test]
    fn test_open_rules_missing_file() {
        let err = open_rules("/nonexistent/rangewall/rules.csv", ReaderConfig::default());
        assert!(matches!(err, Err(Error::Io(_))));
    }
}
