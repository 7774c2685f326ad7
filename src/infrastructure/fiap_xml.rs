// FIAP (IEEE 1888) SOAP envelope building and response parsing
use crate::domain::point::{FiapErrorInfo, PointValue, RetrievalOutcome};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Which single value a key asks for. No select means every value in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Select {
    Maximum,
    Minimum,
}

impl Select {
    fn as_str(&self) -> &'static str {
        match self {
            Select::Maximum => "maximum",
            Select::Minimum => "minimum",
        }
    }
}

/// One `<key>` of a storage query, on the `time` attribute.
#[derive(Debug, Clone)]
pub struct QueryKey<'a> {
    pub point_id: &'a str,
    pub gteq: Option<DateTime<FixedOffset>>,
    pub lteq: Option<DateTime<FixedOffset>>,
    pub select: Option<Select>,
}

pub fn build_query_envelope(query_id: &str, keys: &[QueryKey<'_>]) -> String {
    let mut key_elements = String::new();
    for key in keys {
        key_elements.push_str(&format!(
            r#"<key id="{}" attrName="time""#,
            escape(key.point_id)
        ));
        if let Some(gteq) = key.gteq {
            key_elements.push_str(&format!(r#" gteq="{}""#, format_time(gteq)));
        }
        if let Some(lteq) = key.lteq {
            key_elements.push_str(&format!(r#" lteq="{}""#, format_time(lteq)));
        }
        if let Some(select) = key.select {
            key_elements.push_str(&format!(r#" select="{}""#, select.as_str()));
        }
        key_elements.push_str("/>");
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soapenv:Body>"#,
            r#"<ns2:queryRQ xmlns:ns2="http://soap.fiap.org/">"#,
            r#"<transport xmlns="http://gutp.jp/fiap/2009/11/">"#,
            r#"<header><query id="{}" type="storage">{}</query></header>"#,
            r#"</transport>"#,
            r#"</ns2:queryRQ>"#,
            r#"</soapenv:Body>"#,
            r#"</soapenv:Envelope>"#,
        ),
        escape(query_id),
        key_elements
    )
}

fn format_time(time: DateTime<FixedOffset>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Text currently being collected, and what it belongs to.
enum Capture {
    Error { kind: String },
    Value { time: DateTime<FixedOffset> },
    Fault,
}

/// Parse a `queryRS` envelope.
///
/// Point sets record their direct children only. Points nested inside point sets are
/// still reported as points. A SOAP fault or a response without a `transport` element
/// is an error.
pub fn parse_query_response(xml: &str) -> Result<RetrievalOutcome> {
    // Text is only read inside captured elements, and value text is kept as sent.
    let mut reader = Reader::from_str(xml);

    let mut outcome = RetrievalOutcome::default();
    let mut point_set_stack: Vec<String> = Vec::new();
    let mut current_point: Option<String> = None;
    let mut capture: Option<Capture> = None;
    let mut text = String::new();
    let mut fault: Option<String> = None;
    let mut saw_transport = false;

    loop {
        match reader.read_event().context("Malformed FIAP response")? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"transport" => saw_transport = true,
                b"error" => {
                    let kind = attribute(&e, "type")?.unwrap_or_default();
                    capture = Some(Capture::Error { kind });
                    text.clear();
                }
                b"faultstring" => {
                    capture = Some(Capture::Fault);
                    text.clear();
                }
                b"pointSet" => {
                    let id = required_attribute(&e, "pointSet", "id")?;
                    register_point_set(&mut outcome, &point_set_stack, &id);
                    point_set_stack.push(id);
                }
                b"point" => {
                    let id = required_attribute(&e, "point", "id")?;
                    register_point(&mut outcome, &point_set_stack, &id);
                    current_point = Some(id);
                }
                b"value" if current_point.is_some() => {
                    let time = value_time(&e)?;
                    capture = Some(Capture::Value { time });
                    text.clear();
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"error" => {
                    let kind = attribute(&e, "type")?.unwrap_or_default();
                    outcome.fiap_error = Some(FiapErrorInfo {
                        kind,
                        detail: String::new(),
                    });
                }
                b"pointSet" => {
                    let id = required_attribute(&e, "pointSet", "id")?;
                    register_point_set(&mut outcome, &point_set_stack, &id);
                }
                b"point" => {
                    let id = required_attribute(&e, "point", "id")?;
                    register_point(&mut outcome, &point_set_stack, &id);
                }
                b"value" => {
                    if let Some(id) = &current_point {
                        let time = value_time(&e)?;
                        push_value(&mut outcome, id, PointValue::new(time, ""));
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if capture.is_some() {
                    text.push_str(&t.unescape().context("Malformed FIAP response text")?);
                }
            }
            Event::CData(c) => {
                if capture.is_some() {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"error" => {
                    if let Some(Capture::Error { kind }) = capture.take() {
                        outcome.fiap_error = Some(FiapErrorInfo {
                            kind,
                            detail: std::mem::take(&mut text).trim().to_string(),
                        });
                    }
                }
                b"faultstring" => {
                    if let Some(Capture::Fault) = capture.take() {
                        fault = Some(std::mem::take(&mut text).trim().to_string());
                    }
                }
                b"value" => {
                    if let (Some(Capture::Value { time }), Some(id)) =
                        (capture.take(), current_point.as_ref())
                    {
                        push_value(&mut outcome, id, PointValue::new(time, std::mem::take(&mut text)));
                    }
                }
                b"point" => current_point = None,
                b"pointSet" => {
                    point_set_stack.pop();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(fault) = fault {
        bail!("SOAP fault: {}", fault);
    }
    if !saw_transport {
        bail!("FIAP response has no transport element");
    }

    Ok(outcome)
}

fn register_point_set(outcome: &mut RetrievalOutcome, parents: &[String], id: &str) {
    outcome.point_sets.entry(id.to_string()).or_default();
    if let Some(parent) = parents.last() {
        outcome
            .point_sets
            .entry(parent.clone())
            .or_default()
            .point_set_ids
            .push(id.to_string());
    }
}

fn register_point(outcome: &mut RetrievalOutcome, parents: &[String], id: &str) {
    outcome.points.entry(id.to_string()).or_default();
    if let Some(parent) = parents.last() {
        outcome
            .point_sets
            .entry(parent.clone())
            .or_default()
            .point_ids
            .push(id.to_string());
    }
}

fn push_value(outcome: &mut RetrievalOutcome, point_id: &str, value: PointValue) {
    outcome
        .points
        .entry(point_id.to_string())
        .or_default()
        .push(value);
}

fn value_time(element: &BytesStart<'_>) -> Result<DateTime<FixedOffset>> {
    let raw = required_attribute(element, "value", "time")?;
    DateTime::parse_from_rfc3339(&raw).with_context(|| format!("bad value time: {raw}"))
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match element.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn required_attribute(element: &BytesStart<'_>, tag: &str, name: &str) -> Result<String> {
    attribute(element, name)?
        .with_context(|| format!("<{tag}> element without {name} attribute"))
}
