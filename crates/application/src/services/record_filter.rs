use hickory_proto::rr::{DNSClass, Record, RecordType};

/// Removes Internet-class IPv6 address records from record sets.
pub struct RecordFilter;

impl RecordFilter {
    /// Returns `records` without AAAA/IN entries, preserving order.
    ///
    /// AAAA records in another class are kept.
    pub fn strip_ipv6(records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|record| !Self::is_internet_ipv6(record))
            .cloned()
            .collect()
    }

    pub fn is_internet_ipv6(record: &Record) -> bool {
        record.record_type() == RecordType::AAAA && record.dns_class() == DNSClass::IN
    }
}
