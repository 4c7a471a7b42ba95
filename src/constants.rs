use std::time::Duration;

// ============================================================================
// Client defaults
// ============================================================================

/// Default resolver address
pub const DEFAULT_SERVER: &str = "8.8.8.8";
/// Default resolver port
pub const DEFAULT_DNS_PORT: u16 = 53;
/// Default receive timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
/// Default receive timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
/// Default UDP receive buffer size
pub const DEFAULT_BUFFER_SIZE: usize = 1024;
/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// ============================================================================
// DNS header
// ============================================================================

/// Size of the fixed DNS header
pub const HEADER_SIZE: usize = 12;
/// Flags for an outgoing query: standard query, recursion desired
pub const QUERY_FLAGS: u16 = 0x0100;

pub const FLAG_QR: u16 = 1 << 15;
pub const OPCODE_MASK: u16 = 0x7800; // bits 11-14
pub const OPCODE_SHIFT: u16 = 11;
pub const FLAG_AA: u16 = 1 << 10;
pub const FLAG_TC: u16 = 1 << 9;
pub const FLAG_RD: u16 = 1 << 8;
pub const FLAG_RA: u16 = 1 << 7;
pub const Z_MASK: u16 = 0x0070; // bits 4-6
pub const RCODE_MASK: u16 = 0x000F;

// ============================================================================
// Names and records
// ============================================================================

/// Top two bits of a length byte marking a compression pointer
pub const POINTER_MASK: u8 = 0xC0;
/// Longest label allowed on the wire
pub const MAX_LABEL_LENGTH: usize = 63;
/// Longest encoded name allowed on the wire, length bytes included
pub const MAX_NAME_LENGTH: usize = 255;

pub const TYPE_A: u16 = 1;
pub const TYPE_CNAME: u16 = 5;
pub const TYPE_AAAA: u16 = 28;
pub const CLASS_IN: u16 = 1;

pub const IPV4_RDATA_LEN: usize = 4;
pub const IPV6_RDATA_LEN: usize = 16;

/// Value reported for CNAME answers; the target name is not decompressed
pub const CNAME_PLACEHOLDER: &str = "<CNAME data>";

// ============================================================================
// Configuration validation
// ============================================================================

/// Largest receive timeout accepted from configuration
pub const MAX_TIMEOUT_SECS: u64 = 300;
/// Smallest receive buffer able to hold a header
pub const MIN_BUFFER_SIZE: usize = HEADER_SIZE;
/// Largest UDP payload
pub const MAX_BUFFER_SIZE: usize = 65_535;

/// Check a timeout value
pub fn is_valid_timeout(secs: u64) -> bool {
    secs > 0 && secs <= MAX_TIMEOUT_SECS
}

/// Check a receive buffer size
pub fn is_valid_buffer_size(size: usize) -> bool {
    (MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&size)
}

/// Check a port number
pub fn is_valid_port(port: u16) -> bool {
    port != 0
}
