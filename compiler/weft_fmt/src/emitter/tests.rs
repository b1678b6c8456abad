use super::*;

#[test]
fn string_emitter_lines() {
    let mut emitter = StringEmitter::default();
    emitter.emit("def f():");
    emitter.emit_newlines(1);
    emitter.emit_indent(4);
    emitter.emit("pass");
    assert_eq!(emitter.as_str(), "def f():\n    pass");
    assert_eq!(emitter.output(), "def f():\n    pass\n");
}

#[test]
fn string_emitter_blank_lines() {
    let mut emitter = StringEmitter::default();
    emitter.emit("a");
    emitter.emit_newlines(3);
    emitter.emit("b");
    assert_eq!(emitter.output(), "a\n\n\nb\n");
}

#[test]
fn string_emitter_trims_trailing_blank_lines() {
    let mut emitter = StringEmitter::default();
    emitter.emit("content");
    emitter.emit_newlines(2);
    assert_eq!(emitter.output(), "content\n");
}

#[test]
fn string_emitter_empty_stays_empty() {
    let emitter = StringEmitter::with_capacity(16);
    assert!(emitter.is_empty());
    assert_eq!(emitter.output(), "");
}
