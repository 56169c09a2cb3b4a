use cvar_core::{unserialize, unserialize_reader, CVarError, List, Object, Value};

/// Helper: parse and expect a syntax error, returning (line, message).
fn syntax_err(input: &str) -> (u32, String) {
    match unserialize(input) {
        Err(CVarError::Syntax { line, message }) => (line, message),
        other => panic!("expected a syntax error for {input:?}, got {other:?}"),
    }
}

/// Helper: parse and expect an end-of-input error, returning its line.
fn eof_err(input: &str) -> u32 {
    match unserialize(input) {
        Err(CVarError::UnexpectedEof { line, .. }) => line,
        other => panic!("expected unexpected end of input for {input:?}, got {other:?}"),
    }
}

// ============================================================================
// Basic structure
// ============================================================================

#[test]
fn parse_empty_object() {
    let root = unserialize("{}").unwrap();
    assert!(root.is_empty());
}

#[test]
fn parse_mixed_structure() {
    let root = unserialize(r#"{"a":1,"b":[1,2,3]}"#).unwrap();

    let mut expected = Object::new();
    expected.insert("a", 1);
    let list: List = [1, 2, 3].into_iter().map(Value::Int).collect();
    expected.insert("b", list);
    assert_eq!(root, expected);
}

#[test]
fn parse_all_scalar_kinds() {
    let root = unserialize(r#"{"i":-4,"f":2.5,"t":true,"n":false,"s":"text"}"#).unwrap();
    assert_eq!(root.get("i"), Some(&Value::Int(-4)));
    assert_eq!(root.get("f"), Some(&Value::Float(2.5)));
    assert_eq!(root.get("t"), Some(&Value::Bool(true)));
    assert_eq!(root.get("n"), Some(&Value::Bool(false)));
    assert_eq!(root.get("s").and_then(Value::as_str), Some("text"));
}

#[test]
fn parse_null_becomes_int_zero() {
    let root = unserialize(r#"{"a":null,"b":[null]}"#).unwrap();
    assert_eq!(root.get("a"), Some(&Value::Int(0)));
    let list = root.get("b").and_then(Value::as_list).unwrap();
    assert_eq!(list.get(0), Some(&Value::Int(0)));
}

#[test]
fn parse_single_quoted_keys_and_values() {
    let root = unserialize("{'name':'value'}").unwrap();
    assert_eq!(root.get("name").and_then(Value::as_str), Some("value"));
}

#[test]
fn parse_nested_objects() {
    let root = unserialize(r#"{"graphics":{"window":{"width":1280,"height":720}},"audio":{}}"#)
        .unwrap();
    let window = root
        .get("graphics")
        .and_then(Value::as_object)
        .and_then(|g| g.get("window"))
        .and_then(Value::as_object)
        .unwrap();
    assert_eq!(window.get("width"), Some(&Value::Int(1280)));
    assert_eq!(window.get("height"), Some(&Value::Int(720)));
    assert!(root.get("audio").and_then(Value::as_object).unwrap().is_empty());
}

#[test]
fn parse_lists_of_containers() {
    let root = unserialize(r#"{"l":[{"a":1},[2,[3]],[],{}]}"#).unwrap();
    let list = root.get("l").and_then(Value::as_list).unwrap();
    assert_eq!(list.len(), 4);
    assert_eq!(
        list.get(0).and_then(Value::as_object).and_then(|o| o.get("a")),
        Some(&Value::Int(1))
    );
    let inner = list.get(1).and_then(Value::as_list).unwrap();
    assert_eq!(inner.get(0), Some(&Value::Int(2)));
    assert_eq!(inner.get(1).and_then(Value::as_list).map(List::len), Some(1));
    assert!(list.get(2).and_then(Value::as_list).unwrap().is_empty());
    assert!(list.get(3).and_then(Value::as_object).unwrap().is_empty());
}

#[test]
fn parse_preserves_key_order() {
    let root = unserialize(r#"{"z":1,"a":2,"m":3}"#).unwrap();
    let keys: Vec<&str> = root.keys().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn parse_whitespace_everywhere() {
    let root = unserialize(" \n{ \"a\" :\t1 ,\r\n \"b\" : [ 1 , 2 ] } \n").unwrap();
    assert_eq!(root.len(), 2);
}

#[test]
fn parse_duplicate_key_last_write_wins() {
    let root = unserialize(r#"{"a":1,"a":2}"#).unwrap();
    assert_eq!(root.len(), 1);
    assert_eq!(root.get("a"), Some(&Value::Int(2)));
}

#[test]
fn parse_duplicate_key_replaced_by_container() {
    let root = unserialize(r#"{"a":1,"b":2,"a":{"c":3}}"#).unwrap();
    let keys: Vec<&str> = root.keys().collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert!(root.get("a").and_then(Value::as_object).is_some());
}

#[test]
fn parse_containers_keep_their_position_among_siblings() {
    let root = unserialize(r#"{"a":1,"o":{"x":[2,{"y":3},4]},"l":[[],5,{}],"z":6}"#).unwrap();
    let keys: Vec<&str> = root.keys().collect();
    assert_eq!(keys, vec!["a", "o", "l", "z"]);

    let inner = root
        .get("o")
        .and_then(Value::as_object)
        .and_then(|o| o.get("x"))
        .and_then(Value::as_list)
        .unwrap();
    let mut y = Object::new();
    y.insert("y", 3);
    let expected: List = [Value::Int(2), Value::Object(y), Value::Int(4)]
        .into_iter()
        .collect();
    assert_eq!(inner, &expected);

    let l = root.get("l").and_then(Value::as_list).unwrap();
    assert_eq!(l.get(0), Some(&Value::List(List::new())));
    assert_eq!(l.get(1), Some(&Value::Int(5)));
    assert_eq!(l.get(2), Some(&Value::Object(Object::new())));
}

#[test]
fn parse_duplicate_key_with_container_keeps_first_position() {
    let root = unserialize(r#"{"a":{"old":1},"b":2,"a":[{"new":2}]}"#).unwrap();
    let keys: Vec<&str> = root.keys().collect();
    assert_eq!(keys, vec!["a", "b"]);
    let a = root.get("a").and_then(Value::as_list).unwrap();
    assert_eq!(a.len(), 1);
    assert!(a.get(0).and_then(Value::as_object).is_some_and(|o| o.contains_key("new")));
}

#[test]
fn parse_from_reader() {
    let text = r#"{"a":[1,2],"b":"x"}"#;
    let root = unserialize_reader(text.as_bytes()).unwrap();
    assert_eq!(root, unserialize(text).unwrap());
}

// ============================================================================
// Deep nesting
// ============================================================================

#[test]
fn parse_deeply_nested_lists() {
    let depth = 100_000;
    let text = format!("{{\"x\":{}{}}}", "[".repeat(depth), "]".repeat(depth));
    let root = unserialize(&text).unwrap();

    let mut level = root.get("x").and_then(Value::as_list).unwrap();
    let mut seen = 1;
    while let Some(inner) = level.get(0).and_then(Value::as_list) {
        level = inner;
        seen += 1;
    }
    assert_eq!(seen, depth);
}

#[test]
fn parse_deeply_nested_objects() {
    let depth = 50_000;
    // {"k":{"k":...{}...}}
    let text = format!("{{{}{}", "\"k\":{".repeat(depth), "}".repeat(depth + 1));
    let root = unserialize(&text).unwrap();
    assert_eq!(root.len(), 1);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn error_missing_value() {
    let (line, message) = syntax_err(r#"{"a":}"#);
    assert_eq!(line, 1);
    assert!(message.contains("expected a value"), "{message}");
}

#[test]
fn error_truncated_after_colon() {
    assert_eq!(eof_err(r#"{"a":"#), 1);
}

#[test]
fn error_lines_in_multiline_input() {
    let (line, _) = syntax_err("{\n  \"a\": 1,\n  \"b\":\n}");
    assert_eq!(line, 4);
    assert_eq!(eof_err("{\n  \"a\": 1,\n  \"b\":\n"), 4);
}

#[test]
fn error_root_must_be_object() {
    let (_, message) = syntax_err("[1,2]");
    assert_eq!(message, "root must be an object");
    let (_, message) = syntax_err("42");
    assert_eq!(message, "root must be an object");
}

#[test]
fn error_empty_input() {
    assert_eq!(eof_err(""), 1);
    assert_eq!(eof_err("  \n "), 2);
}

#[test]
fn error_unterminated_containers() {
    eof_err("{");
    eof_err(r#"{"a":1"#);
    eof_err(r#"{"a":[1,2"#);
    eof_err(r#"{"a":{"b":{}"#);
}

#[test]
fn error_missing_comma() {
    let (line, message) = syntax_err("{\"a\":1\n\"b\":2}");
    assert_eq!(line, 2);
    assert!(message.starts_with("expected comma separator at line 2"), "{message}");

    let (_, message) = syntax_err(r#"{"a":[1 2]}"#);
    assert!(message.contains("expected comma separator"), "{message}");
}

#[test]
fn error_key_must_be_string() {
    let (_, message) = syntax_err(r#"{1:2}"#);
    assert!(message.contains("expected a key"), "{message}");
}

#[test]
fn error_missing_colon() {
    let (_, message) = syntax_err(r#"{"a" 1}"#);
    assert!(message.contains("expected colon separator"), "{message}");
}

#[test]
fn error_trailing_commas() {
    let (_, message) = syntax_err(r#"{"a":1,}"#);
    assert!(message.contains("expected a key"), "{message}");
    let (_, message) = syntax_err(r#"{"a":[1,]}"#);
    assert!(message.contains("expected a value"), "{message}");
}

#[test]
fn error_mismatched_bracket() {
    let (_, message) = syntax_err(r#"{"a":[1}"#);
    assert!(message.contains("expected comma separator"), "{message}");
}

#[test]
fn error_trailing_content_after_root() {
    let (_, message) = syntax_err(r#"{"a":1} {"b":2}"#);
    assert!(message.contains("after the root object"), "{message}");
}

#[test]
fn error_display_includes_kind_and_line() {
    let err = unserialize("{\n\"a\":}").unwrap_err();
    assert_eq!(err.line(), Some(2));
    assert!(err.to_string().starts_with("syntax error at line 2:"), "{err}");

    let err = unserialize("{\n\"a\":").unwrap_err();
    assert!(err.to_string().starts_with("unexpected end of input at line 2:"), "{err}");
}
