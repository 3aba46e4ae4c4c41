/////////////////////////////TESTS////////////////////////////////////////////////////
/*
comprehensive tests:
Basic parsing test
Mixed type parsing test
Template usage test
Empty document test
Malformed document test
File-based parsing test
*/

#[cfg(test)]
mod tests1 {

    use crate::Utils::task_parser::{
        DocumentMap, Value, filter_comments, parse_document, parse_document_as,
        parse_document_as_strings, parse_document_with_template, parse_section,
    };
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_section() {
        let input = "ranges\n a: 1, 5\n b: -2.5, 2.5\nrounding\n a: 0";
        let (remaining, (title, map)) = parse_section(input).unwrap();
        assert_eq!(title, "ranges");
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], vec![Value::Integer(1), Value::Integer(5)]);
        assert_eq!(map["b"], vec![Value::Float(-2.5), Value::Float(2.5)]);
        assert_eq!(remaining, "rounding\n a: 0");
    }

    #[test]
    fn test_parse_section_without_pairs() {
        let (remaining, (title, map)) = parse_section("known\ntargets\n vars: x").unwrap();
        assert_eq!(title, "known");
        assert!(map.is_empty());
        assert_eq!(remaining, "targets\n vars: x");
    }

    #[test]
    fn test_parse_document_basic() {
        let input = "equations\n eq: x + y = 10, x - y = 2\ntargets\n vars: x, y";
        let (remaining, doc) = parse_document(input).unwrap();
        assert_eq!(remaining, "");
        assert_eq!(
            doc["equations"]["eq"],
            Some(vec![
                Value::String("x + y = 10".to_string()),
                Value::String("x - y = 2".to_string())
            ])
        );
        assert_eq!(
            doc["targets"]["vars"],
            Some(vec![
                Value::String("x".to_string()),
                Value::String("y".to_string())
            ])
        );
    }

    #[test]
    fn test_repeated_keys_and_sections_accumulate() {
        let input = "equations\n eq: a*x = b\n eq: c = 2*x\nequations\n eq: d = 1";
        let (_, doc) = parse_document(input).unwrap();
        let equations = doc["equations"]["eq"].as_ref().unwrap();
        assert_eq!(equations.len(), 3);
        assert_eq!(equations[2], Value::String("d = 1".to_string()));
    }

    #[test]
    fn test_parse_document_with_mixed_types() {
        let input = "generation\n count: 5\n seed: 42\n parallel: true\n tokenization: single_letter\nsolver\n tolerance: 1e-9";
        let doc = parse_document_as(input, None).unwrap();
        let generation = &doc["generation"];
        assert_eq!(generation["count"], Some(vec![Value::Integer(5)]));
        assert_eq!(generation["parallel"], Some(vec![Value::Boolean(true)]));
        assert_eq!(
            generation["tokenization"].as_ref().unwrap()[0].as_string(),
            Some(&"single_letter".to_string())
        );
        assert_eq!(doc["solver"]["tolerance"].as_ref().unwrap()[0].as_float(), Some(1e-9));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let input = "// task\n\nequations\n # first one\n eq: x = 1\n\n% done\n; end\n";
        assert_eq!(filter_comments(input), "equations\n eq: x = 1");
        let doc = parse_document_as(input, None).unwrap();
        assert_eq!(doc["equations"]["eq"], Some(vec![Value::String("x = 1".to_string())]));
    }

    #[test]
    fn test_parse_document_with_template() {
        let mut template: DocumentMap = HashMap::new();
        template.insert(
            "generation".to_string(),
            HashMap::from([("count".to_string(), None), ("seed".to_string(), None)]),
        );
        template.insert("output".to_string(), HashMap::from([("table_file".to_string(), None)]));
        let doc = parse_document_with_template("generation\n count: 3", &template).unwrap();
        assert_eq!(doc["generation"]["count"], Some(vec![Value::Integer(3)]));
        assert_eq!(doc["generation"]["seed"], None);
        assert_eq!(doc["output"]["table_file"], None);
    }

    #[test]
    fn test_parse_document_empty() {
        assert!(parse_document_as("", None).is_err());
        assert!(parse_document_as("// only a comment", None).is_err());
    }

    #[test]
    fn test_parse_document_malformed() {
        let res = parse_document_as("equations\n eq: x = 1\n : no key", None);
        assert!(res.is_err());
        assert!(res.unwrap_err().contains(": no key"));
        assert!(parse_document_as("eq: x = 1", None).is_err());
    }

    #[test]
    fn test_parse_document_as_strings() {
        let input = "known\n b: 10\n g: 9.81\nrounding\n a: 0";
        let template = HashMap::from([(
            "ranges".to_string(),
            HashMap::from([("a".to_string(), None)]),
        )]);
        let doc = parse_document_as_strings(input, Some(template)).unwrap();
        assert_eq!(doc["known"]["b"], Some(vec!["10".to_string()]));
        assert_eq!(doc["known"]["g"], Some(vec!["9.81".to_string()]));
        assert_eq!(doc["ranges"]["a"], None);
    }

    #[test]
    fn test_parse_document_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("task.txt");
        let content = r#"
// uniform motion
equations
    eq: s = v*t
known
    v: 12
targets
    vars: s
ranges
    t: 1, 10
"#;
        fs::write(&path, content).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let doc = parse_document_as_strings(&text, None).unwrap();
        assert_eq!(doc.len(), 4);
        assert_eq!(doc["equations"]["eq"], Some(vec!["s = v*t".to_string()]));
        assert_eq!(doc["ranges"]["t"], Some(vec!["1".to_string(), "10".to_string()]));
    }
}
