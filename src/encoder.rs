use crate::constants::TYPE_A;
use crate::types::{DnsHeader, DnsQuestion};

/// Encode a single-question query for `domain`.
///
/// Labels are written as given: a label longer than 63 bytes or an empty
/// label produces a malformed packet. Callers that need those checks run
/// [`DnsQuestion::validate`] first.
pub fn encode(domain: &str, query_type: u16, transaction_id: u16) -> Vec<u8> {
    let question = DnsQuestion {
        name: domain.to_string(),
        qtype: query_type,
        qclass: crate::constants::CLASS_IN,
    };
    encode_query(&DnsHeader::query(transaction_id), &question)
}

/// Encode an A query for `domain`
pub fn encode_a(domain: &str, transaction_id: u16) -> Vec<u8> {
    encode(domain, TYPE_A, transaction_id)
}

/// Encode a query for a prepared question
pub fn encode_question_query(question: &DnsQuestion, transaction_id: u16) -> Vec<u8> {
    encode_query(&DnsHeader::query(transaction_id), question)
}

pub fn encode_query(header: &DnsHeader, question: &DnsQuestion) -> Vec<u8> {
    let mut buf = encode_header(header);
    buf.extend_from_slice(&encode_question(question));
    buf
}

pub fn encode_header(header: &DnsHeader) -> Vec<u8> {
    [
        header.id.to_be_bytes(),
        header.flags.to_be_bytes(),
        header.num_questions.to_be_bytes(),
        header.num_answers.to_be_bytes(),
        header.num_authorities.to_be_bytes(),
        header.num_additionals.to_be_bytes(),
    ]
    .concat()
}

pub fn encode_question(question: &DnsQuestion) -> Vec<u8> {
    let mut buf = encode_name(&question.name);
    buf.extend_from_slice(&question.qtype.to_be_bytes());
    buf.extend_from_slice(&question.qclass.to_be_bytes());
    buf
}

/// Length-prefixed labels followed by the zero terminator
pub fn encode_name(name: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(name.len() + 2);
    for label in name.split('.') {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
    buf
}
