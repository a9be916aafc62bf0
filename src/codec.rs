//! Decoding server payloads and re-encoding filtered records.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde_json::{Map, Value};

use crate::error::InfoError;
use crate::filter::Record;
use crate::request::{InfoType, OutputFormat};

/// Extract the record list keyed by `info_type` from a JSON payload.
///
/// # Errors
///
/// Returns `InfoError::Decode` if the payload is not JSON or the list does
/// not hold string-valued records, and `InfoError::MissingList` if the key
/// is absent.
pub fn decode(text: &str, info_type: InfoType) -> Result<Vec<Record>, InfoError> {
    let mut payload: Value = serde_json::from_str(text)?;
    let list = payload
        .get_mut(info_type.as_str())
        .map(Value::take)
        .ok_or(InfoError::MissingList(info_type.as_str()))?;
    Ok(serde_json::from_value(list)?)
}

/// Encode records as `format`. JSON yields `{"<info_type>": [...]}`; every
/// other format yields XML.
pub fn encode(
    records: &[Record],
    info_type: InfoType,
    format: OutputFormat,
) -> Result<String, InfoError> {
    match format {
        OutputFormat::Json => encode_json(records, info_type),
        OutputFormat::Plain | OutputFormat::Xml => encode_xml(records, info_type),
    }
}

fn encode_json(records: &[Record], info_type: InfoType) -> Result<String, InfoError> {
    let mut payload = Map::new();
    payload.insert(
        info_type.as_str().to_string(),
        serde_json::to_value(records)?,
    );
    Ok(serde_json::to_string(&Value::Object(payload))?)
}

/// `<images><image id=".." name=".." /></images>`, one empty element per
/// record with the record's fields as attributes.
fn encode_xml(records: &[Record], info_type: InfoType) -> Result<String, InfoError> {
    let root = info_type.as_str();
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Start(BytesStart::new(root)))
        .map_err(xml_error)?;
    for record in records {
        let mut element = BytesStart::new(info_type.singular());
        element.extend_attributes(record.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        writer
            .write_event(Event::Empty(element))
            .map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(root)))
        .map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

fn xml_error(e: impl std::fmt::Display) -> InfoError {
    InfoError::Xml(e.to_string())
}
