pub mod base;
pub mod v1;
pub mod v10;
pub mod v11;
pub mod v12;
pub mod v13;
pub mod v2;
pub mod v3;
pub mod v4;
pub mod v5;
pub mod v6;
pub mod v7;
pub mod v8;
pub mod v9;

use crate::feed::ID;
pub use base::ReportError;
use base::ReportBase;

use serde::{Deserialize, Serialize};

/// The decoded structured-binary envelope: `(reportContext, reportBlob,
/// rawRs, rawSs, rawVs)`. `reportBlob` is itself decoded against the payload
/// schema selected by the feed's schema version; see [`Payload::decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullReport {
    pub report_context: [[u8; 32]; 3],
    pub report_blob: Vec<u8>,
    pub raw_rs: Vec<[u8; 32]>,
    pub raw_ss: Vec<[u8; 32]>,
    pub raw_vs: [u8; 32],
}

/// Number of 32-byte words in the envelope's fixed head: 3 for
/// `reportContext`, one offset each for `reportBlob`/`rawRs`/`rawSs`, and one
/// for `rawVs`.
const HEAD_WORDS: usize = 7;

impl FullReport {
    /// Decodes a structured-binary `fullReport` blob into its 5-tuple.
    ///
    /// # Errors
    ///
    /// Returns a `ReportError` if the head is truncated or any offset/length
    /// overflows the input.
    pub fn decode(data: &[u8]) -> Result<Self, ReportError> {
        const WORD: usize = ReportBase::WORD_SIZE;

        if data.len() < HEAD_WORDS * WORD {
            return Err(ReportError::DataTooShort("FullReport head"));
        }

        let mut report_context = [[0u8; 32]; 3];
        for (i, word) in report_context.iter_mut().enumerate() {
            *word = data[i * WORD..(i + 1) * WORD]
                .try_into()
                .map_err(|_| ReportError::InvalidLength("reportContext"))?;
        }

        let blob_offset = read_offset(data, 3 * WORD)?;
        let rs_offset = read_offset(data, 4 * WORD)?;
        let ss_offset = read_offset(data, 5 * WORD)?;
        let raw_vs = data[6 * WORD..7 * WORD]
            .try_into()
            .map_err(|_| ReportError::InvalidLength("rawVs"))?;

        let report_blob = decode_bytes(data, blob_offset)?;
        let raw_rs = decode_word_array(data, rs_offset)?;
        let raw_ss = decode_word_array(data, ss_offset)?;

        Ok(Self {
            report_context,
            report_blob,
            raw_rs,
            raw_ss,
            raw_vs,
        })
    }

    /// Encodes the 5-tuple back into its structured-binary wire form.
    pub fn encode(&self) -> Vec<u8> {
        const WORD: usize = ReportBase::WORD_SIZE;

        let mut head = Vec::with_capacity(HEAD_WORDS * WORD);
        let mut tail = Vec::new();

        for word in &self.report_context {
            head.extend_from_slice(word);
        }

        head.extend_from_slice(&encode_offset(HEAD_WORDS * WORD + tail.len()));
        encode_bytes(&mut tail, &self.report_blob);

        head.extend_from_slice(&encode_offset(HEAD_WORDS * WORD + tail.len()));
        encode_word_array(&mut tail, &self.raw_rs);

        head.extend_from_slice(&encode_offset(HEAD_WORDS * WORD + tail.len()));
        encode_word_array(&mut tail, &self.raw_ss);

        head.extend_from_slice(&self.raw_vs);

        let mut out = head;
        out.extend_from_slice(&tail);
        out
    }
}

fn read_offset(data: &[u8], word_offset: usize) -> Result<usize, ReportError> {
    ReportBase::read_uint64(data, word_offset).map(|v| v as usize)
}

fn encode_offset(offset: usize) -> [u8; 32] {
    ReportBase::encode_uint64(offset as u64).expect("offset fits in u64")
}

fn decode_bytes(data: &[u8], offset: usize) -> Result<Vec<u8>, ReportError> {
    const WORD: usize = ReportBase::WORD_SIZE;

    let length = ReportBase::read_uint64(data, offset)? as usize;
    let start = offset + WORD;
    let end = start
        .checked_add(length)
        .ok_or(ReportError::InvalidLength("reportBlob length overflow"))?;

    data.get(start..end)
        .map(<[u8]>::to_vec)
        .ok_or(ReportError::DataTooShort("reportBlob"))
}

fn encode_bytes(tail: &mut Vec<u8>, bytes: &[u8]) {
    tail.extend_from_slice(&encode_offset(bytes.len()));
    tail.extend_from_slice(bytes);
    let padding =
        (ReportBase::WORD_SIZE - (bytes.len() % ReportBase::WORD_SIZE)) % ReportBase::WORD_SIZE;
    tail.extend(std::iter::repeat(0u8).take(padding));
}

fn decode_word_array(data: &[u8], offset: usize) -> Result<Vec<[u8; 32]>, ReportError> {
    const WORD: usize = ReportBase::WORD_SIZE;

    let count = ReportBase::read_uint64(data, offset)? as usize;
    let start = offset + WORD;

    let mut items = Vec::with_capacity(count);
    for i in 0..count {
        let item_start = start
            .checked_add(i * WORD)
            .ok_or(ReportError::InvalidLength("array index overflow"))?;
        let word = data
            .get(item_start..item_start + WORD)
            .ok_or(ReportError::DataTooShort("array element"))?;
        items.push(word.try_into().expect("slice is exactly WORD bytes"));
    }

    Ok(items)
}

fn encode_word_array(tail: &mut Vec<u8>, items: &[[u8; 32]]) {
    tail.extend_from_slice(&encode_offset(items.len()));
    for item in items {
        tail.extend_from_slice(item);
    }
}

/// A decoded payload, tagged by the schema version embedded in the feed ID.
#[derive(Debug)]
pub enum Payload {
    V1(v1::ReportDataV1),
    V2(v2::ReportDataV2),
    V3(v3::ReportDataV3),
    V4(v4::ReportDataV4),
    V5(v5::ReportDataV5),
    V6(v6::ReportDataV6),
    V7(v7::ReportDataV7),
    V8(v8::ReportDataV8),
    V9(v9::ReportDataV9),
    V10(v10::ReportDataV10),
    V11(v11::ReportDataV11),
    V12(v12::ReportDataV12),
    V13(v13::ReportDataV13),
}

impl Payload {
    /// Dispatches on `feed_id`'s schema version and decodes `report_blob`
    /// under the matching schema.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::ParseError` for an unknown schema version, or
    /// whatever error the matched schema's decoder produces.
    pub fn decode(feed_id: &ID, report_blob: &[u8]) -> Result<Self, ReportError> {
        match feed_id.version().0 {
            1 => v1::ReportDataV1::decode(report_blob).map(Payload::V1),
            2 => v2::ReportDataV2::decode(report_blob).map(Payload::V2),
            3 => v3::ReportDataV3::decode(report_blob).map(Payload::V3),
            4 => v4::ReportDataV4::decode(report_blob).map(Payload::V4),
            5 => v5::ReportDataV5::decode(report_blob).map(Payload::V5),
            6 => v6::ReportDataV6::decode(report_blob).map(Payload::V6),
            7 => v7::ReportDataV7::decode(report_blob).map(Payload::V7),
            8 => v8::ReportDataV8::decode(report_blob).map(Payload::V8),
            9 => v9::ReportDataV9::decode(report_blob).map(Payload::V9),
            10 => v10::ReportDataV10::decode(report_blob).map(Payload::V10),
            11 => v11::ReportDataV11::decode(report_blob).map(Payload::V11),
            12 => v12::ReportDataV12::decode(report_blob).map(Payload::V12),
            13 => v13::ReportDataV13::decode(report_blob).map(Payload::V13),
            _ => Err(ReportError::ParseError("unknown schema version")),
        }
    }
}

/// Report envelope as delivered by the REST and WebSocket APIs.
///
/// # Examples
///
/// ```rust
/// use data_streams_sdk::feed::ID;
/// use data_streams_sdk::report::Report;
///
/// let feed_id = ID::from_hex_str(
///     "0x00036b4aa7e57ca7b68ae1bf45653f56b656fd3aa335ef7fae696b663f1b8472",
/// )
/// .unwrap();
/// let report = Report {
///     feed_id,
///     valid_from_timestamp: 1718885772,
///     observations_timestamp: 1718885772,
///     full_report: "0x00".to_string(),
/// };
/// assert_eq!(report.observations_timestamp, 1718885772);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "feedID")]
    pub feed_id: ID,

    #[serde(rename = "validFromTimestamp")]
    pub valid_from_timestamp: u32,

    #[serde(rename = "observationsTimestamp")]
    pub observations_timestamp: u32,

    #[serde(rename = "fullReport")]
    pub full_report: String,
}

impl Report {
    /// Decodes `full_report`'s hex-encoded structured-binary envelope and
    /// dispatches the embedded `reportBlob` to its payload schema.
    pub fn decode_payload(&self) -> Result<Payload, ReportError> {
        let bytes = hex::decode(self.full_report.trim_start_matches("0x"))
            .map_err(|_| ReportError::ParseError("fullReport is not valid hex"))?;
        let full_report = FullReport::decode(&bytes)?;
        Payload::decode(&self.feed_id, &full_report.report_blob)
    }
}
