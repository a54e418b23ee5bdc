//! Validation of poem payloads returned by the remote API.
//!
//! `GET /title/{title}` answers with a JSON array holding one poem object.
//! Unknown titles come back as HTTP 200 with an object body instead, so shape
//! checks happen here rather than in the transport layer.

use serde_json::{Map, Value};

use crate::{
  model::PoemRecord,
  outcome::{Outcome, Skip},
};

const REQUIRED_FIELDS: [&str; 3] = ["author", "title", "linecount"];

/// Validate a decoded poem payload.
///
/// Anything other than a one-element array whose element carries `author`,
/// `title` and `linecount` is skipped, never an error. `linecount` is
/// accepted either as a number or as a string holding one, which is how the
/// API actually serves it.
pub fn parse_poem_payload(payload: Value) -> Outcome<PoemRecord> {
  let mut items = match payload {
    Value::Array(items) => items,
    other => {
      return Outcome::Skipped(Skip::UnexpectedShape(format!(
        "expected an array, got {}",
        json_kind(&other)
      )));
    }
  };

  if items.len() != 1 {
    return Outcome::Skipped(Skip::UnexpectedShape(format!(
      "expected exactly one poem, got {}",
      items.len()
    )));
  }

  let Value::Object(fields) = items.remove(0) else {
    return Outcome::Skipped(Skip::UnexpectedShape(
      "poem entry is not an object".into(),
    ));
  };

  if let Some(missing) = REQUIRED_FIELDS.into_iter().find(|f| !fields.contains_key(*f)) {
    return Outcome::Skipped(Skip::MissingField(missing));
  }

  match record_from_fields(fields) {
    Ok(record) => Outcome::Done(record),
    Err(skip) => Outcome::Skipped(skip),
  }
}

fn record_from_fields(mut fields: Map<String, Value>) -> Result<PoemRecord, Skip> {
  let author = take_string(&mut fields, "author")?;
  let title = take_string(&mut fields, "title")?;
  let line_count = match fields.remove("linecount") {
    Some(Value::Number(n)) => n.as_i64(),
    Some(Value::String(s)) => s.trim().parse().ok(),
    _ => None,
  }
  .ok_or(Skip::InvalidField("linecount"))?;

  let lines = match fields.remove("lines") {
    None | Some(Value::Null) => Vec::new(),
    Some(Value::Array(lines)) => lines
      .into_iter()
      .map(|line| match line {
        Value::String(s) => Ok(s),
        _ => Err(Skip::InvalidField("lines")),
      })
      .collect::<Result<_, _>>()?,
    Some(_) => return Err(Skip::InvalidField("lines")),
  };

  Ok(PoemRecord { author, title, line_count, lines })
}

fn take_string(fields: &mut Map<String, Value>, key: &'static str) -> Result<String, Skip> {
  match fields.remove(key) {
    Some(Value::String(s)) => Ok(s),
    _ => Err(Skip::InvalidField(key)),
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn ozymandias() -> Value {
    json!([{
      "title": "Ozymandias",
      "author": "Percy Bysshe Shelley",
      "lines": ["I met a traveller from an antique land", "Who said:"],
      "linecount": "14"
    }])
  }

  #[test]
  fn valid_payload_with_string_linecount() {
    let record = parse_poem_payload(ozymandias()).done().unwrap();
    assert_eq!(record.author, "Percy Bysshe Shelley");
    assert_eq!(record.title, "Ozymandias");
    assert_eq!(record.line_count, 14);
    assert_eq!(record.lines.len(), 2);
  }

  #[test]
  fn numeric_linecount_is_accepted() {
    let payload = json!([{ "title": "T", "author": "A", "linecount": 3, "lines": [] }]);
    assert_eq!(parse_poem_payload(payload).done().unwrap().line_count, 3);
  }

  #[test]
  fn missing_linecount_is_skipped() {
    let payload = json!([{ "title": "T", "author": "A", "lines": ["x"] }]);
    assert_eq!(
      parse_poem_payload(payload),
      Outcome::Skipped(Skip::MissingField("linecount"))
    );
  }

  #[test]
  fn missing_author_is_reported_first() {
    let payload = json!([{ "lines": [] }]);
    assert_eq!(
      parse_poem_payload(payload),
      Outcome::Skipped(Skip::MissingField("author"))
    );
  }

  #[test]
  fn more_than_one_poem_is_skipped() {
    let payload = json!([
      { "title": "T", "author": "A", "linecount": "1" },
      { "title": "T", "author": "B", "linecount": "1" }
    ]);
    assert!(matches!(
      parse_poem_payload(payload),
      Outcome::Skipped(Skip::UnexpectedShape(_))
    ));
  }

  #[test]
  fn not_found_object_body_is_skipped() {
    let payload = json!({ "status": 404, "reason": "Not found" });
    assert!(matches!(
      parse_poem_payload(payload),
      Outcome::Skipped(Skip::UnexpectedShape(_))
    ));
  }

  #[test]
  fn unparseable_linecount_is_invalid() {
    let payload = json!([{ "title": "T", "author": "A", "linecount": "many" }]);
    assert_eq!(
      parse_poem_payload(payload),
      Outcome::Skipped(Skip::InvalidField("linecount"))
    );
  }

  #[test]
  fn absent_lines_default_to_empty() {
    let payload = json!([{ "title": "T", "author": "A", "linecount": "0" }]);
    assert!(parse_poem_payload(payload).done().unwrap().lines.is_empty());
  }

  #[test]
  fn non_string_line_is_invalid() {
    let payload = json!([{ "title": "T", "author": "A", "linecount": "1", "lines": [1] }]);
    assert_eq!(
      parse_poem_payload(payload),
      Outcome::Skipped(Skip::InvalidField("lines"))
    );
  }
}
