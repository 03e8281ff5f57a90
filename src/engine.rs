//! Resolution engine: async DNS lookups over the configured resolver list.
//!
//! This module wraps `hickory-resolver` behind the small lookup surface the
//! pipeline needs:
//! - `resolve`: A-record convenience lookup returning IP strings
//! - `resolve_raw`: per-configured-type lookup returning `type\tvalue`
//!   entries plus a dig-style response dump
//! - `query_multiple` / `query_one`: structured per-type record sets
//!
//! Retry across the resolver list, transport selection, and wire-format
//! parsing all live inside hickory; IP-literal inputs short-circuit without
//! any network call.

use std::net::IpAddr;

use anyhow::{Error, Result};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::{RData, Record, RecordType as ProtoRecordType};
use hickory_resolver::TokioAsyncResolver;

use crate::config::RecordType;
use crate::error_handling::InitializationError;
use crate::initialization::init_resolver;

impl From<RecordType> for ProtoRecordType {
    fn from(rt: RecordType) -> Self {
        match rt {
            RecordType::A => ProtoRecordType::A,
            RecordType::Aaaa => ProtoRecordType::AAAA,
            RecordType::Cname => ProtoRecordType::CNAME,
            RecordType::Ns => ProtoRecordType::NS,
            RecordType::Ptr => ProtoRecordType::PTR,
            RecordType::Mx => ProtoRecordType::MX,
            RecordType::Soa => ProtoRecordType::SOA,
            RecordType::Txt => ProtoRecordType::TXT,
        }
    }
}

/// Structured result of a multi-type query: one value list per record type,
/// plus the raw response text. Unrequested types stay empty.
#[derive(Debug, Clone, Default)]
#[allow(missing_docs)] // Field names are the record types themselves
pub struct DnsData {
    pub a: Vec<String>,
    pub aaaa: Vec<String>,
    pub cname: Vec<String>,
    pub ns: Vec<String>,
    pub ptr: Vec<String>,
    pub mx: Vec<String>,
    pub soa: Vec<String>,
    pub txt: Vec<String>,
    /// Raw dig-style response text across all queried types.
    pub raw: String,
}

/// Result of a raw lookup: tab-delimited `type\tvalue` entries in
/// query-issue order, plus the raw response text.
#[derive(Debug, Clone, Default)]
pub struct DnsResponse {
    /// Tab-delimited `type\tvalue` entries, one per answer record.
    pub entries: Vec<String>,
    /// Raw dig-style response text across all queried types.
    pub raw: String,
}

/// DNS client shared read-only across all workers.
///
/// Safe for concurrent use without external locking; the underlying resolver
/// multiplexes queries internally.
pub struct DnsClient {
    resolver: TokioAsyncResolver,
    record_types: Vec<RecordType>,
}

impl DnsClient {
    /// Creates a client over the given resolver endpoints with the given
    /// retry budget and record-type set.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolver list is empty or contains an endpoint
    /// that does not parse as a socket address.
    pub fn new(
        resolvers: &[String],
        retries: usize,
        record_types: Vec<RecordType>,
    ) -> Result<Self, InitializationError> {
        let resolver = init_resolver(resolvers, retries)?;
        Ok(Self {
            resolver,
            record_types,
        })
    }

    /// A-record convenience lookup returning the resolved IPs.
    ///
    /// IP-literal inputs are returned unchanged without a network call.
    pub async fn resolve(&self, host: &str) -> Result<Vec<String>> {
        if host.parse::<IpAddr>().is_ok() {
            return Ok(vec![host.to_string()]);
        }

        let response = self.resolver.lookup_ip(host).await.map_err(Error::new)?;
        Ok(response.iter().map(|ip| ip.to_string()).collect())
    }

    /// Queries every configured record type and returns `type\tvalue`
    /// entries plus a raw dig-style response dump.
    ///
    /// Entries appear in query-issue order: the order record types were
    /// configured, answers within a type in response order. IP-literal inputs
    /// produce a single pass-through entry with no network call. Per-type
    /// "no records" answers contribute nothing; an error is surfaced only
    /// when every requested type fails outright.
    pub async fn resolve_raw(&self, host: &str) -> Result<DnsResponse> {
        if host.parse::<IpAddr>().is_ok() {
            return Ok(DnsResponse {
                entries: vec![host.to_string()],
                raw: String::new(),
            });
        }

        let mut response = DnsResponse::default();
        let mut first_err: Option<Error> = None;
        let mut any_ok = false;

        for rtype in &self.record_types {
            match self.lookup_records(host, (*rtype).into()).await {
                Ok(records) => {
                    any_ok = true;
                    response
                        .entries
                        .extend(records.iter().filter_map(record_entry));
                    if !records.is_empty() {
                        if !response.raw.is_empty() {
                            response.raw.push('\n');
                        }
                        response
                            .raw
                            .push_str(&raw_section(host, (*rtype).into(), &records));
                    }
                }
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }

        match (any_ok, first_err) {
            (false, Some(e)) => Err(e),
            _ => Ok(response),
        }
    }

    /// Queries every configured record type and aggregates the answers into
    /// a structured [`DnsData`].
    pub async fn query_multiple(&self, host: &str) -> Result<DnsData> {
        let mut data = DnsData::default();

        for rtype in &self.record_types {
            let proto: ProtoRecordType = (*rtype).into();
            let records = self.lookup_records(host, proto).await?;
            let values = typed_values(&records, proto);
            match rtype {
                RecordType::A => data.a = values,
                RecordType::Aaaa => data.aaaa = values,
                RecordType::Cname => data.cname = values,
                RecordType::Ns => data.ns = values,
                RecordType::Ptr => data.ptr = values,
                RecordType::Mx => data.mx = values,
                RecordType::Soa => data.soa = values,
                RecordType::Txt => data.txt = values,
            }
            if !records.is_empty() {
                if !data.raw.is_empty() {
                    data.raw.push('\n');
                }
                data.raw.push_str(&raw_section(host, proto, &records));
            }
        }

        Ok(data)
    }

    /// Single A-record structured lookup, used by the wildcard detector.
    ///
    /// IP-literal inputs pass through like in [`resolve`](Self::resolve).
    pub async fn query_one(&self, host: &str) -> Result<DnsData> {
        if host.parse::<IpAddr>().is_ok() {
            return Ok(DnsData {
                a: vec![host.to_string()],
                ..DnsData::default()
            });
        }

        let records = self.lookup_records(host, ProtoRecordType::A).await?;
        let raw = if records.is_empty() {
            String::new()
        } else {
            raw_section(host, ProtoRecordType::A, &records)
        };
        Ok(DnsData {
            a: typed_values(&records, ProtoRecordType::A),
            raw,
            ..DnsData::default()
        })
    }

    /// Runs a single-type lookup, mapping empty answers (NXDomain, no records
    /// of the type) to an empty vector and propagating real failures.
    async fn lookup_records(
        &self,
        host: &str,
        rtype: ProtoRecordType,
    ) -> Result<Vec<Record>> {
        match self.resolver.lookup(host, rtype).await {
            Ok(lookup) => Ok(lookup.records().to_vec()),
            // An empty answer is data, not a failure
            Err(e) if is_empty_answer(&e) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// True for NXDOMAIN and no-data answers, which hickory surfaces as a
/// `NoRecordsFound` error rather than an empty lookup.
fn is_empty_answer(e: &ResolveError) -> bool {
    matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

/// Renders a record as a `type\tvalue` entry, skipping records with no data.
fn record_entry(record: &Record) -> Option<String> {
    let data = record.data()?;
    Some(format!("{}\t{}", record.record_type(), rdata_value(data)))
}

/// Values of the given type only; answers for e.g. an A query may also carry
/// the CNAME chain, which structured fields must not absorb.
fn typed_values(records: &[Record], rtype: ProtoRecordType) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.record_type() == rtype)
        .filter_map(|r| r.data())
        .map(rdata_value)
        .collect()
}

fn rdata_value(data: &RData) -> String {
    match data {
        RData::A(a) => a.to_string(),
        RData::AAAA(aaaa) => aaaa.to_string(),
        RData::CNAME(cname) => cname.to_utf8(),
        RData::NS(ns) => ns.to_utf8(),
        RData::PTR(ptr) => ptr.to_utf8(),
        RData::MX(mx) => format!("{} {}", mx.preference(), mx.exchange().to_utf8()),
        RData::SOA(soa) => format!(
            "{} {} {} {} {} {} {}",
            soa.mname().to_utf8(),
            soa.rname().to_utf8(),
            soa.serial(),
            soa.refresh(),
            soa.retry(),
            soa.expire(),
            soa.minimum()
        ),
        RData::TXT(txt) => txt
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).to_string())
            .collect::<Vec<String>>()
            .join(""),
        other => other.to_string(),
    }
}

/// Formats one query's answers as a dig-style text section.
fn raw_section(host: &str, rtype: ProtoRecordType, records: &[Record]) -> String {
    let mut out = format!(";; QUESTION SECTION:\n;{host}.\tIN\t{rtype}\n\n;; ANSWER SECTION:\n");
    for record in records {
        let value = record.data().map(rdata_value).unwrap_or_default();
        out.push_str(&format!(
            "{}\t{}\tIN\t{}\t{}\n",
            record.name().to_utf8(),
            record.ttl(),
            record.record_type(),
            value
        ));
    }
    out
}
