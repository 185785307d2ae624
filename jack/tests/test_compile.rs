use jack::{prelude::*, LexError, SymbolError};

#[test]
fn test_compile_counter() {
    let source = include_str!("fixtures/Counter.jack");
    let expected = include_str!("fixtures/Counter.vm");

    match jack::compile(source) {
        Ok(code) => assert_eq!(render(&code), expected),
        Err(err) => panic!("{}", err),
    }
}

#[test]
fn test_compile_program_shares_statics() {
    let compiler = Compiler::default();

    let counter = compiler.compile(include_str!("fixtures/Counter.jack")).unwrap();
    let main = compiler.compile(include_str!("fixtures/Main.jack")).unwrap();

    assert_eq!(render(&counter), include_str!("fixtures/Counter.vm"));
    assert_eq!(render(&main), include_str!("fixtures/Main.vm"));
    assert_eq!(compiler.statics().count(), 2);
}

#[test]
fn test_compile_order_decides_static_numbering() {
    let compiler = Compiler::default();

    let main = compiler.compile(include_str!("fixtures/Main.jack")).unwrap();
    let counter = compiler.compile(include_str!("fixtures/Counter.jack")).unwrap();

    assert!(render(&main).contains("push static 0\n"));
    assert!(render(&counter).contains("pop static 1\n"));
}

fn compile_body(body: &str) -> String {
    let source = format!(
        "class Test {{
            field Foo obj;
            method void test(int a, boolean cond) {{
                var int x, y;
                {body}
                return;
            }}
        }}"
    );
    match jack::compile(&source) {
        Ok(code) => render(&code),
        Err(err) => panic!("{}", err),
    }
}

/// Strip the header and receiver binding, and the trailing `return 0`.
fn body_lines(text: &str) -> Vec<&str> {
    let lines = text.lines().collect::<Vec<_>>();
    lines[3..lines.len() - 2].to_vec()
}

#[test]
fn test_if_else_emits_false_branch_first() {
    let text = compile_body("if (cond) { let x = 1; } else { let y = 2; }");
    assert_eq!(
        body_lines(&text),
        [
            "push argument 2",
            "if-goto IF_TRUE_0",
            "push constant 2",
            "pop local 1",
            "goto IF_END_0",
            "label IF_TRUE_0",
            "push constant 1",
            "pop local 0",
            "label IF_END_0",
        ]
    );
}

#[test]
fn test_while_layout() {
    let text = compile_body("while (a > 0) { let a = a - 1; }");
    assert_eq!(
        body_lines(&text),
        [
            "label WHILE_BEGIN_0",
            "push argument 1",
            "push constant 0",
            "gt",
            "not",
            "if-goto WHILE_END_0",
            "push argument 1",
            "push constant 1",
            "sub",
            "pop argument 1",
            "goto WHILE_BEGIN_0",
            "label WHILE_END_0",
        ]
    );
}

#[test]
fn test_nested_control_flow_gets_unique_labels() {
    let text = compile_body("while (cond) { if (cond) { while (cond) { } } }");
    let labels = text
        .lines()
        .filter(|line| line.starts_with("label "))
        .collect::<Vec<_>>();
    assert_eq!(
        labels,
        [
            "label WHILE_BEGIN_0",
            "label IF_TRUE_1",
            "label WHILE_BEGIN_2",
            "label WHILE_END_2",
            "label IF_END_1",
            "label WHILE_END_0",
        ]
    );
}

#[test]
fn test_method_call_on_field_uses_declared_type() {
    let text = compile_body("do obj.method(x);");
    assert_eq!(
        body_lines(&text),
        [
            "push this 0",
            "push local 0",
            "call Foo.method 2",
            "pop temp 0",
        ]
    );
}

#[test]
fn test_function_call_on_class_has_no_receiver() {
    let text = compile_body("do Utility.compute(1, 2);");
    assert_eq!(
        body_lines(&text),
        [
            "push constant 1",
            "push constant 2",
            "call Utility.compute 2",
            "pop temp 0",
        ]
    );
}

#[test]
fn test_string_literal() {
    let text = compile_body("do Output.printString(\"AB\");");
    assert_eq!(
        body_lines(&text),
        [
            "push constant 2",
            "call String.new 1",
            "push constant 65",
            "call String.appendChar 2",
            "push constant 66",
            "call String.appendChar 2",
            "call Output.printString 1",
            "pop temp 0",
        ]
    );
}

#[test]
fn test_integer_constant_range() {
    let text = compile_body("let x = 32767;");
    assert_eq!(body_lines(&text), ["push constant 32767", "pop local 0"]);

    let source = "class Test { function int f() { return 32768; } }";
    assert!(matches!(
        jack::compile(source),
        Err(JackError::Lex(LexError::IntegerOverflow { .. }))
    ));
}

#[test]
fn test_duplicate_local_aborts_unit() {
    let source = "class Test { function void f() { var int x; var int x; return; } }";
    assert_eq!(
        jack::compile(source),
        Err(JackError::Symbol(SymbolError::Duplicate { name: "x".into() }))
    );
}

#[test]
fn test_method_parameters_start_after_receiver() {
    let source = "class Test {
        method int m(int first) { return first; }
        function int f(int first) { return first; }
        constructor Test new(int first) { return first; }
    }";
    let text = render(&jack::compile(source).unwrap());
    let returned = text
        .lines()
        .zip(text.lines().skip(1))
        .filter(|(_, next)| *next == "return")
        .map(|(line, _)| line)
        .collect::<Vec<_>>();
    assert_eq!(returned, ["push argument 1", "push argument 0", "push argument 0"]);
}

#[test]
fn test_parallel_classes_never_reuse_statics() {
    const CLASSES: usize = 8;
    const STATICS: usize = 5;

    let compiler = Compiler::default();
    let sources = (0..CLASSES)
        .map(|i| {
            format!(
                "class C{i} {{
                    static int a, b;
                    static boolean c, d, e;
                    function void init() {{
                        let a = 1; let b = 2; let c = true; let d = false; let e = a < b;
                        return;
                    }}
                }}"
            )
        })
        .collect::<Vec<_>>();

    let listings = std::thread::scope(|scope| {
        let handles = sources
            .iter()
            .map(|source| {
                let compiler = compiler.clone();
                scope.spawn(move || render(&compiler.compile(source).unwrap()))
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });

    let mut indices = listings
        .iter()
        .flat_map(|text| text.lines())
        .filter_map(|line| line.strip_prefix("pop static "))
        .map(|index| index.parse::<u16>().unwrap())
        .collect::<Vec<_>>();
    indices.sort_unstable();

    let expected = (0..(CLASSES * STATICS) as u16).collect::<Vec<_>>();
    assert_eq!(indices, expected);
    assert_eq!(compiler.statics().count() as usize, CLASSES * STATICS);
}
