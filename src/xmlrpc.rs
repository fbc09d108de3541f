//! Minimal XML-RPC encoding for string-parameter method calls

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FAULT_STRING: Regex = Regex::new(
        r"(?s)<fault>.*?<name>\s*faultString\s*</name>\s*<value>(.*?)</value>"
    )
    .unwrap();
    static ref FAULT: Regex = Regex::new(r"<fault>").unwrap();
    static ref FIRST_PARAM: Regex =
        Regex::new(r"(?s)<params>\s*<param>\s*<value>(.*?)</value>").unwrap();
    static ref TYPED: Regex = Regex::new(r"(?s)^\s*<(\w+)>(.*)</(\w+)>\s*$").unwrap();
    static ref EMPTY_TYPED: Regex = Regex::new(r"^\s*<\w+\s*/>\s*$").unwrap();
}

/// Outcome of decoding a `methodResponse` document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Text of the first returned parameter
    Value(String),
    /// The server's `faultString`
    Fault(String),
}

/// Build a `methodCall` document whose parameters are all strings
pub fn method_call(method: &str, params: &[&str]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<methodCall>");
    xml.push_str(&format!("<methodName>{}</methodName><params>", method));
    for param in params {
        xml.push_str(&format!(
            "<param><value><string>{}</string></value></param>",
            html_escape::encode_text(param)
        ));
    }
    xml.push_str("</params></methodCall>\n");
    xml
}

/// Decode a `methodResponse` document
///
/// Returns `None` when the body is neither a fault nor carries a parameter.
pub fn parse_response(body: &str) -> Option<Response> {
    if FAULT.is_match(body) {
        let message = FAULT_STRING
            .captures(body)
            .map(|caps| scalar_text(&caps[1]))
            .unwrap_or_else(|| "unknown fault".to_string());
        return Some(Response::Fault(message));
    }

    FIRST_PARAM
        .captures(body)
        .map(|caps| Response::Value(scalar_text(&caps[1])))
}

/// Text of a `<value>` body, with a single scalar type tag removed
fn scalar_text(value: &str) -> String {
    if EMPTY_TYPED.is_match(value) {
        return String::new();
    }
    let inner = match TYPED.captures(value) {
        Some(caps) if caps[1] == caps[3] => caps.get(2).map_or("", |m| m.as_str()),
        _ => value,
    };
    html_escape::decode_html_entities(inner).into_owned()
}
