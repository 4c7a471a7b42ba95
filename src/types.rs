use crate::constants::*;
use crate::errors::{LookupError, Result};
use serde::Serialize;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Fixed 12-byte message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHeader {
    pub id: u16,
    pub flags: u16,
    pub num_questions: u16,
    pub num_answers: u16,
    pub num_authorities: u16,
    pub num_additionals: u16,
}

impl DnsHeader {
    /// Header for a single-question recursive query
    pub fn query(id: u16) -> Self {
        Self {
            id,
            flags: QUERY_FLAGS,
            num_questions: 1,
            num_answers: 0,
            num_authorities: 0,
            num_additionals: 0,
        }
    }

    pub fn is_response(&self) -> bool {
        self.flags & FLAG_QR != 0
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags & OPCODE_MASK) >> OPCODE_SHIFT) as u8
    }

    pub fn is_authoritative(&self) -> bool {
        self.flags & FLAG_AA != 0
    }

    pub fn is_truncated(&self) -> bool {
        self.flags & FLAG_TC != 0
    }

    pub fn recursion_desired(&self) -> bool {
        self.flags & FLAG_RD != 0
    }

    pub fn recursion_available(&self) -> bool {
        self.flags & FLAG_RA != 0
    }

    /// Reserved Z bits, shifted down
    pub fn z(&self) -> u8 {
        ((self.flags & Z_MASK) >> 4) as u8
    }

    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from_u8((self.flags & RCODE_MASK) as u8)
    }
}

/// RCODE values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    NoError,
    FormatError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    Unknown(u8),
}

impl ResponseCode {
    pub fn from_u8(value: u8) -> Self {
        match value & 0x0F {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            n => ResponseCode::Unknown(n),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormatError => 1,
            ResponseCode::ServerFailure => 2,
            ResponseCode::NameError => 3,
            ResponseCode::NotImplemented => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Unknown(n) => *n,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::NoError => write!(f, "No error (NOERROR)"),
            ResponseCode::FormatError => write!(f, "Format error (FORMERR)"),
            ResponseCode::ServerFailure => write!(f, "Server failure (SERVFAIL)"),
            ResponseCode::NameError => write!(f, "Name error (NXDOMAIN)"),
            ResponseCode::NotImplemented => write!(f, "Not implemented (NOTIMP)"),
            ResponseCode::Refused => write!(f, "Refused (REFUSED)"),
            ResponseCode::Unknown(n) => write!(f, "Unknown error (RCODE {})", n),
        }
    }
}

/// Query type as selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Other(u16),
}

impl RecordType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            TYPE_A => RecordType::A,
            TYPE_AAAA => RecordType::Aaaa,
            TYPE_CNAME => RecordType::Cname,
            n => RecordType::Other(n),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            RecordType::A => TYPE_A,
            RecordType::Aaaa => TYPE_AAAA,
            RecordType::Cname => TYPE_CNAME,
            RecordType::Other(n) => n,
        }
    }
}

impl Default for RecordType {
    fn default() -> Self {
        RecordType::A
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::Aaaa => write!(f, "AAAA"),
            RecordType::Cname => write!(f, "CNAME"),
            RecordType::Other(n) => write!(f, "TYPE{}", n),
        }
    }
}

impl FromStr for RecordType {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            other => {
                let digits = other.strip_prefix("TYPE").unwrap_or(other);
                digits
                    .parse::<u16>()
                    .map(RecordType::from_u16)
                    .map_err(|_| LookupError::InvalidRecordType(trimmed.to_string()))
            }
        }
    }
}

/// Single question of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl DnsQuestion {
    /// Build an IN-class question. A single trailing dot is dropped.
    pub fn new(name: &str, record_type: RecordType) -> Self {
        let name = name.strip_suffix('.').unwrap_or(name);
        Self {
            name: name.to_string(),
            qtype: record_type.to_u16(),
            qclass: CLASS_IN,
        }
    }

    /// Check the name against the label limits the encoder does not enforce.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(LookupError::InvalidName("empty domain name".to_string()));
        }

        let mut encoded_len = 1;
        for label in self.name.split('.') {
            if label.is_empty() {
                return Err(LookupError::InvalidName(format!(
                    "empty label in '{}'",
                    self.name
                )));
            }
            if !label.is_ascii() {
                return Err(LookupError::InvalidName(format!(
                    "non-ASCII label '{}'",
                    label
                )));
            }
            if label.len() > MAX_LABEL_LENGTH {
                return Err(LookupError::InvalidName(format!(
                    "label of {} bytes exceeds {}",
                    label.len(),
                    MAX_LABEL_LENGTH
                )));
            }
            encoded_len += label.len() + 1;
        }

        if encoded_len > MAX_NAME_LENGTH {
            return Err(LookupError::InvalidName(format!(
                "encoded name of {} bytes exceeds {}",
                encoded_len, MAX_NAME_LENGTH
            )));
        }

        Ok(())
    }
}

/// Interpreted RDATA of an answer record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    CnamePlaceholder,
    /// Record type the decoder does not interpret; never part of a result
    Unsupported(u16),
}

impl RecordData {
    pub fn kind(&self) -> &'static str {
        match self {
            RecordData::A(_) => "A",
            RecordData::Aaaa(_) => "AAAA",
            RecordData::CnamePlaceholder => "CNAME",
            RecordData::Unsupported(_) => "UNSUPPORTED",
        }
    }

    pub fn value(&self) -> String {
        match self {
            RecordData::A(ip) => ip.to_string(),
            RecordData::Aaaa(ip) => ip.to_string(),
            RecordData::CnamePlaceholder => CNAME_PLACEHOLDER.to_string(),
            RecordData::Unsupported(rtype) => format!("TYPE{}", rtype),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, RecordData::Unsupported(_))
    }
}

/// Answer record; the owner name is not kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsRecord {
    pub class: u16,
    pub ttl: u32,
    pub data: RecordData,
}

impl DnsRecord {
    pub fn kind(&self) -> &'static str {
        self.data.kind()
    }

    pub fn value(&self) -> String {
        self.data.value()
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            kind: self.kind().to_string(),
            value: self.value(),
            ttl: self.ttl,
        }
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} record: {} (TTL: {}s)",
            self.kind(),
            self.value(),
            self.ttl
        )
    }
}

/// Serializable (kind, value, ttl) view of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub ttl: u32,
}

/// Decoded response: header summary plus answers in wire order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResponse {
    pub header: DnsHeader,
    pub answers: Vec<DnsRecord>,
}
