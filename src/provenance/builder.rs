//! Provenance Chain Builder
//!
//! Turns an ordered version history into a fully linked event chain. Output
//! is a pure function of (scheme, subject id, versions): the same input
//! always rebuilds byte-identical hashes, markers and ids.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{debug, info};

use crate::error::{ProvenanceError, Result};
use crate::provenance::event::{MutationType, ProvenanceChain, ProvenanceEvent, VersionDescriptor};
use crate::provenance::fingerprint::{
    format_timestamp, string_hash, Fingerprinter, HashScheme, GENESIS_HASH,
};
use crate::provenance::merkle::compute_merkle_root;
use crate::provenance::verify::verify_chain;
use crate::source::ContentVersionSource;

/// Epoch used when a label is not of the form `YYYY-Qn`
const FALLBACK_EPOCH: &str = "2025-Q1";

/// Sub-event minute offsets advance in steps of this many minutes
const SUB_EVENT_STEP_MINUTES: u64 = 47;

const SUB_EVENT_REASON_TEMPLATES: u64 = 5;

/// Builds provenance chains with a fixed fingerprint scheme
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainBuilder {
    scheme: HashScheme,
}

impl ChainBuilder {
    pub fn new(scheme: HashScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// Build the chain for `subject_id` from its ordered version history
    pub fn build(&self, subject_id: &str, versions: &[VersionDescriptor]) -> Result<ProvenanceChain> {
        if subject_id.is_empty() {
            return Err(ProvenanceError::empty_subject_id());
        }
        if versions.is_empty() {
            return Err(ProvenanceError::empty_version_history(subject_id));
        }

        let seed = u64::from(string_hash(subject_id));
        let mut cursor = ChainCursor::new(self.scheme, subject_id);

        for (vi, descriptor) in versions.iter().enumerate() {
            let base_timestamp = epoch_timestamp(&descriptor.epoch_label);
            let mutation_type = if vi == 0 {
                MutationType::Genesis
            } else {
                MutationType::Evolution
            };
            let content_hash = self.scheme.hash(&format!(
                "{}:{}:{}:{}",
                subject_id, descriptor.version_label, descriptor.reason, vi
            ));
            cursor.append(
                descriptor,
                content_hash,
                base_timestamp,
                descriptor.reason.clone(),
                mutation_type,
            );

            if vi == 0 {
                continue;
            }

            let vi = vi as u64;
            let sub_event_count = 1 + (seed + vi * 3) % 3;
            for ei in 0..sub_event_count {
                let type_index = (seed + vi * 7 + ei * 13) % MutationType::SUB_EVENT_TYPES.len() as u64;
                let sub_type = MutationType::SUB_EVENT_TYPES[type_index as usize];
                let template = (seed + vi * 5 + ei * 11) % SUB_EVENT_REASON_TEMPLATES;
                let offset_minutes = (ei + 1) * SUB_EVENT_STEP_MINUTES + (seed + vi + ei) % 60;

                let content_hash = self.scheme.hash(&format!(
                    "{}:{}:extra{}:{}:{}",
                    subject_id, descriptor.version_label, ei, sub_type, vi
                ));
                cursor.append(
                    descriptor,
                    content_hash,
                    base_timestamp + Duration::minutes(offset_minutes as i64),
                    sub_event_reason(template, descriptor),
                    sub_type,
                );
            }
        }

        let mut chain = cursor.finish();
        chain.valid = verify_chain(&chain).valid;

        info!(
            "Built provenance chain {} for {}: {} events from {} versions",
            chain.chain_id,
            subject_id,
            chain.events.len(),
            versions.len()
        );
        Ok(chain)
    }

    /// Build the chain for `subject_id` from an injected version source
    pub fn build_from_source(
        &self,
        source: &dyn ContentVersionSource,
        subject_id: &str,
    ) -> Result<ProvenanceChain> {
        let versions = source.versions(subject_id)?;
        self.build(subject_id, &versions)
    }
}

/// Build a chain with the default fingerprint scheme
pub fn build_chain(subject_id: &str, versions: &[VersionDescriptor]) -> Result<ProvenanceChain> {
    ChainBuilder::default().build(subject_id, versions)
}

/// Deterministic chain id derived from the subject id
pub fn chain_id(subject_id: &str) -> String {
    let prefix: String = subject_id
        .chars()
        .take(16)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    format!("prov-{}-{}", prefix, to_base36(string_hash(subject_id)))
}

/// Map an epoch label such as `2025-Q3` onto its calendar timestamp
pub fn epoch_timestamp(epoch_label: &str) -> DateTime<Utc> {
    parse_quarter(epoch_label)
        .or_else(|| parse_quarter(FALLBACK_EPOCH))
        .unwrap_or_default()
}

fn parse_quarter(label: &str) -> Option<DateTime<Utc>> {
    let (year, quarter) = label.trim().split_once("-Q")?;
    let year: i32 = year.parse().ok()?;
    let quarter: u32 = quarter.parse().ok()?;
    if !(1..=4).contains(&quarter) {
        return None;
    }

    // First day of the quarter's last month
    Utc.with_ymd_and_hms(year, quarter * 3, 1, 0, 0, 0).single()
}

fn sub_event_reason(template: u64, descriptor: &VersionDescriptor) -> String {
    match template {
        0 => format!(
            "Approved remediation action applied to {}",
            descriptor.version_label
        ),
        1 => format!("Quality gate passed with score {}/100", descriptor.score),
        2 => format!(
            "Automated hardening pass completed for {}",
            descriptor.version_label
        ),
        3 => "SOC2 / ISO 27001 compliance mapping updated".to_string(),
        _ => format!(
            "CVE patch integrated: {}",
            descriptor.reason.split('–').next().unwrap_or_default().trim()
        ),
    }
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.iter().rev().map(|&b| b as char).collect()
}

/// Tail of a chain under construction
struct ChainCursor<'a> {
    scheme: HashScheme,
    subject_id: &'a str,
    chain_id: String,
    events: Vec<ProvenanceEvent>,
    previous_hash: String,
}

impl<'a> ChainCursor<'a> {
    fn new(scheme: HashScheme, subject_id: &'a str) -> Self {
        Self {
            scheme,
            subject_id,
            chain_id: chain_id(subject_id),
            events: Vec::new(),
            previous_hash: GENESIS_HASH.to_string(),
        }
    }

    fn append(
        &mut self,
        descriptor: &VersionDescriptor,
        content_hash: String,
        timestamp: DateTime<Utc>,
        reason: String,
        mutation_type: MutationType,
    ) {
        let index = self.events.len();
        let signature =
            self.scheme
                .sign(&content_hash, &self.previous_hash, &format_timestamp(&timestamp));

        let event = ProvenanceEvent {
            id: format!("{}-evt-{:03}", self.chain_id, index),
            timestamp,
            subject_id: self.subject_id.to_string(),
            version: descriptor.version_label.clone(),
            content_hash: content_hash.clone(),
            previous_hash: std::mem::replace(&mut self.previous_hash, content_hash),
            signature,
            reason,
            mutation_type,
            index,
            epoch_label: descriptor.epoch_label.clone(),
        };

        debug!("Appended provenance event {}", event.summary());
        self.events.push(event);
    }

    fn finish(self) -> ProvenanceChain {
        let leaves: Vec<String> = self.events.iter().map(|e| e.content_hash.clone()).collect();
        let merkle_root = compute_merkle_root(self.scheme, &leaves);
        let created_at = self.events.first().map(|e| e.timestamp).unwrap_or_default();
        let updated_at = self.events.last().map(|e| e.timestamp).unwrap_or_default();

        ProvenanceChain {
            subject_id: self.subject_id.to_string(),
            chain_id: self.chain_id,
            hash_scheme: self.scheme,
            total_signatures: self.events.len(),
            created_at,
            updated_at,
            events: self.events,
            merkle_root,
            valid: false,
        }
    }
}
