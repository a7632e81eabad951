use hickory_proto::op::Query;
use hickory_proto::rr::rdata::{A, AAAA, CNAME, TXT};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub fn question(name: &str, record_type: RecordType) -> Query {
    Query::query(Name::from_str(name).unwrap(), record_type)
}

pub fn a_record(name: &str, ip: &str) -> Record {
    let addr: Ipv4Addr = ip.parse().unwrap();
    Record::from_rdata(Name::from_str(name).unwrap(), 300, RData::A(A(addr)))
}

pub fn aaaa_record(name: &str, ip: &str) -> Record {
    let addr: Ipv6Addr = ip.parse().unwrap();
    Record::from_rdata(Name::from_str(name).unwrap(), 300, RData::AAAA(AAAA(addr)))
}

pub fn cname_record(name: &str, target: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::CNAME(CNAME(Name::from_str(target).unwrap())),
    )
}

pub fn txt_record(name: &str, text: &str) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        300,
        RData::TXT(TXT::new(vec![text.to_string()])),
    )
}

/// Same record moved to a non-Internet class.
pub fn with_class(mut record: Record, class: DNSClass) -> Record {
    record.set_dns_class(class);
    record
}

pub fn is_aaaa_in(record: &Record) -> bool {
    record.record_type() == RecordType::AAAA && record.dns_class() == DNSClass::IN
}
