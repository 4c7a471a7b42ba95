use crate::constants::*;
use crate::errors::{LookupError, Result};
use crate::reader::{ByteReader, Underrun};
use crate::types::{DnsHeader, DnsRecord, DnsResponse, RecordData, ResponseCode};
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::trace;

/// Decode a response into its answer records.
///
/// Records of types other than A, AAAA and CNAME are dropped; any read past
/// the end of `data` fails the whole message.
pub fn decode(data: &[u8]) -> Result<Vec<DnsRecord>> {
    decode_message(data).map(|response| response.answers)
}

/// Decode a response, keeping the header summary.
pub fn decode_message(data: &[u8]) -> Result<DnsResponse> {
    let mut reader = ByteReader::new(data);

    let header = read_header(&mut reader)?;
    check_header(&header)?;

    // Exactly one question is echoed back, whatever QDCOUNT claims
    skip_question(&mut reader).map_err(truncated_record)?;

    let mut answers = Vec::new();
    for _ in 0..header.num_answers {
        let record = read_record(&mut reader)?;
        if record.data.is_supported() {
            answers.push(record);
        } else {
            trace!(
                offset = reader.position(),
                record_type = %record.value(),
                "skipping unsupported answer"
            );
        }
    }

    Ok(DnsResponse { header, answers })
}

fn truncated_record(err: Underrun) -> LookupError {
    trace!(%err, "response truncated");
    LookupError::TruncatedRecord
}

fn read_header(reader: &mut ByteReader<'_>) -> Result<DnsHeader> {
    let fields: [u8; HEADER_SIZE] = reader
        .read_array()
        .map_err(|_| LookupError::TruncatedHeader)?;
    let field = |i: usize| u16::from_be_bytes([fields[i * 2], fields[i * 2 + 1]]);

    Ok(DnsHeader {
        id: field(0),
        flags: field(1),
        num_questions: field(2),
        num_answers: field(3),
        num_authorities: field(4),
        num_additionals: field(5),
    })
}

fn check_header(header: &DnsHeader) -> Result<()> {
    if !header.is_response() {
        return Err(LookupError::NotAResponse);
    }
    match header.response_code() {
        ResponseCode::NoError => Ok(()),
        code => Err(LookupError::ServerError(code)),
    }
}

/// Walk length-prefixed labels up to and including the zero terminator.
fn skip_labels(reader: &mut ByteReader<'_>) -> std::result::Result<(), Underrun> {
    loop {
        let len = reader.read_u8()? as usize;
        if len == 0 {
            return Ok(());
        }
        reader.skip(len)?;
    }
}

// Question names are never compressed in an echoed query.
fn skip_question(reader: &mut ByteReader<'_>) -> std::result::Result<(), Underrun> {
    skip_labels(reader)?;
    reader.skip(4)
}

/// Owner name: a 2-byte pointer is consumed without being followed.
fn skip_owner_name(reader: &mut ByteReader<'_>) -> std::result::Result<(), Underrun> {
    if reader.peek_u8()? & POINTER_MASK == POINTER_MASK {
        reader.skip(2)
    } else {
        skip_labels(reader)
    }
}

fn read_record(reader: &mut ByteReader<'_>) -> Result<DnsRecord> {
    skip_owner_name(reader).map_err(truncated_record)?;

    let rtype = reader.read_u16().map_err(truncated_record)?;
    let class = reader.read_u16().map_err(truncated_record)?;
    let ttl = reader.read_u32().map_err(truncated_record)?;
    let rdlength = reader.read_u16().map_err(truncated_record)? as usize;
    let rdata = reader.read_bytes(rdlength).map_err(truncated_record)?;

    let data = match rtype {
        TYPE_A => RecordData::A(Ipv4Addr::from(fixed_rdata::<IPV4_RDATA_LEN>(rdata)?)),
        TYPE_AAAA => RecordData::Aaaa(Ipv6Addr::from(fixed_rdata::<IPV6_RDATA_LEN>(rdata)?)),
        TYPE_CNAME => RecordData::CnamePlaceholder,
        other => RecordData::Unsupported(other),
    };

    Ok(DnsRecord { class, ttl, data })
}

/// Address RDATA must be exactly `N` bytes long.
fn fixed_rdata<const N: usize>(rdata: &[u8]) -> Result<[u8; N]> {
    <[u8; N]>::try_from(rdata).map_err(|_| {
        trace!(expected = N, actual = rdata.len(), "bad address rdata length");
        LookupError::TruncatedRecord
    })
}
