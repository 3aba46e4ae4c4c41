/// parse document with structure like
/// ```text
/// title1
///   key1: value1, value2
///   key2: value3
/// title2
///   key3: value4, value5
/// ```
/// which has titles on their own lines and lines of pairs key-vector of values. A value is
/// everything up to the next comma or the end of the line, so values may contain spaces
/// and operators (`eq: x + y = 10`). A key repeated inside a section adds its values to
/// the ones already read. Lines starting with //, #, % or ; are comments.
/// User may pass a template HashMap<String, HashMap<String, Option<Vec<Value>>>>: every
/// field of the template not found in the document will be field_x:None.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, line_ending, space0},
    combinator::{eof, map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type DocumentMap = HashMap<String, SectionMap>;
pub type SectionMap = HashMap<String, Option<Vec<Value>>>;
/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    // Helper functions to access different value types
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// integers are numbers too
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    // Try to convert to string representation
    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

// Implement Display for Value
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

fn identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

/// end of a line or of the whole input
fn end_of_line(input: &str) -> IResult<&str, &str> {
    preceded(space0, alt((line_ending, eof))).parse(input)
}

/// Parses a title: word characters alone on a line
pub(crate) fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, _) = space0(input)?;
    terminated(identifier, end_of_line).parse(input)
}

/// Parses a key (word characters without spaces)
pub(crate) fn parse_key(input: &str) -> IResult<&str, String> {
    identifier(input)
}

pub(crate) fn parse_value(input: &str) -> IResult<&str, Value> {
    // a single value runs up to a comma or the end of the line
    let value_parser = take_while1(|c: char| !matches!(c, ',' | '\n' | '\r'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<Value, String> {
        let s = s.trim();
        // Try parsing as different types in order
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

pub(crate) fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, _) = space0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    separated_list0(separator_coma, parse_value).parse(input)
}

/// Parses a key-value pair where value is a list, up to the end of the line
pub(crate) fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    // Parse the colon with optional whitespace
    let colon_separator = delimited(space0, tag(":"), space0);
    let parser = separated_pair(parse_key, colon_separator, parse_value_list);
    preceded(space0, terminated(parser, end_of_line)).parse(input)
}

/// Parses a section with a title and zero or more key-value lines
pub(crate) fn parse_section(input: &str) -> IResult<&str, (String, HashMap<String, Vec<Value>>)> {
    let (input, title) = parse_title(input)?;
    let (input, pairs) = many0(parse_key_value_pair).parse(input)?;

    let mut section_map: HashMap<String, Vec<Value>> = HashMap::new();
    for (key, values) in pairs {
        section_map.entry(key).or_default().extend(values);
    }

    Ok((input, (title, section_map)))
}

/// Filters out comment lines (starting with //, #, %, or ;) and blank lines
pub(crate) fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire (comment free) document into a HashMap
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let (input, sections) = many1(parse_section).parse(input)?;

    let mut result: DocumentMap = HashMap::new();
    for (title, section_map) in sections.into_iter() {
        let title_map = result.entry(title).or_default();
        for (key, values) in section_map {
            title_map
                .entry(key)
                .or_insert(None)
                .get_or_insert_with(Vec::new)
                .extend(values);
        }
    }

    Ok((input, result))
}

fn parse_whole_document(input: &str) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    match parse_document(&filtered) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining.lines().next().unwrap_or_default()
                ));
            }
            Ok(parsed)
        }
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}

/// adds every title and key of the template missing in the document, with value None
fn merge_template<T>(parsed: &mut HashMap<String, HashMap<String, Option<T>>>, template: &HashMap<String, HashMap<String, Option<T>>>) {
    for (title, keys_map) in template {
        let section_map = parsed.entry(title.clone()).or_default();
        for key in keys_map.keys() {
            section_map.entry(key.clone()).or_insert(None);
        }
    }
}

/// Parses a document and merges with a template HashMap, ensuring all expected keys exist
pub(crate) fn parse_document_with_template(
    input: &str,
    template: &DocumentMap,
) -> Result<DocumentMap, String> {
    let mut parsed = parse_whole_document(input)?;
    merge_template(&mut parsed, template);
    Ok(parsed)
}

/// Helper function to parse a document
pub fn parse_document_as(input: &str, template: Option<DocumentMap>) -> Result<DocumentMap, String> {
    match template {
        Some(template) => parse_document_with_template(input, &template),
        None => parse_whole_document(input),
    }
}

/// function to parse document into HashMap<String, HashMap<String, Option<Vec<String>>>
/// the differ is that nested hashmap has type not  HashMap<String, Option<Vec<Value>>>
/// but HashMap<String, Option<Vec<String>>
pub fn parse_document_as_strings(
    input: &str,
    template: Option<HashMap<String, HashMap<String, Option<Vec<String>>>>>,
) -> Result<HashMap<String, HashMap<String, Option<Vec<String>>>>, String> {
    let value_map = parse_document_as(input, None)?;
    let mut string_map: HashMap<String, HashMap<String, Option<Vec<String>>>> = value_map
        .into_iter()
        .map(|(title, section_map)| {
            let string_section = section_map
                .into_iter()
                .map(|(key, value_opt)| {
                    let string_values = value_opt.map(|values| {
                        values
                            .into_iter()
                            .map(|v| v.to_string_value())
                            .collect::<Vec<String>>()
                    });
                    (key, string_values)
                })
                .collect();
            (title, string_section)
        })
        .collect();
    if let Some(template) = template {
        merge_template(&mut string_map, &template);
    }
    Ok(string_map)
}
