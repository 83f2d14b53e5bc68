use super::*;
use layerc_parse::statements;
use pretty_assertions::assert_eq;

fn from_source(source: &str) -> Macros {
    let mut macros = Macros::new();
    for statement in statements(source, 0) {
        macros.add_from_statement(&statement);
    }
    macros
}

#[test]
fn statements_register_defines_only() {
    let macros = from_source("#include <x.h>\n#define A 1\nint x;\n#define B(y) y\n");
    assert_eq!(macros.len(), 2);
    assert!(macros.contains("A"));
    assert!(macros.get("B").is_some_and(MacroParts::is_function_like));
}

#[test]
fn add_replaces() {
    let mut macros = from_source("#define A 1\n");
    let old = macros.add(MacroParts::new("A", None, "2"));
    assert_eq!(old.and_then(|m| m.body).map(|b| b.text), Some("1".into()));
    assert_eq!(macros.expand("A").text, "2");
}

#[test]
fn upsert_keeps_first_definition() {
    let mut macros = from_source("#define A 1\n");
    let conflicts = macros.upsert(MacroParts::new("A", None, "2"));
    assert_eq!(conflicts, vec!["macro redefinition: A".to_string()]);
    assert_eq!(macros.expand("A").text, "1");
}

#[test]
fn upsert_identical_is_silent() {
    let mut macros = from_source("#define A 1\n");
    assert!(macros.upsert(MacroParts::new("A", None, "1")).is_empty());
}

#[test]
fn define_programmatic_macros() {
    let mut macros = Macros::new();
    macros.define("CAT", Some(&["a", "b"][..]), "a##b");
    macros.define("WT_UNUSED", Some(&["x"][..]), "(void)(x)");
    assert_eq!(macros.expand("CAT(foo, bar)").text, "foobar");
    assert_eq!(macros.expand("WT_UNUSED(s);").text, "(void)(s);");
}

#[test]
fn merge_in_name_order() {
    let mut a = from_source("#define A 1\n#define C 3\n");
    let b = from_source("#define C 4\n#define B 2\n#define A 5\n");
    let conflicts = a.merge(b);
    assert_eq!(
        conflicts,
        vec![
            "macro redefinition: A".to_string(),
            "macro redefinition: C".to_string(),
        ]
    );
    assert_eq!(a.len(), 3);
    assert_eq!(a.expand("A B C").text, "1 2 3");
}

#[test]
fn empty_registry_is_identity() {
    let expansion = Macros::new().expand("anything (");
    assert_eq!(expansion.text, "anything (");
    assert!(expansion.errors.is_empty());
}

#[test]
fn shared_between_threads() {
    let macros = from_source("#define SQ(x) ((x)*(x))\n");
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let macros = &macros;
                scope.spawn(move || macros.expand(&format!("SQ({i})")).text)
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().expect("thread"), format!("(({i})*({i}))"));
        }
    });
}
