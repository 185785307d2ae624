use super::{
    ir::{ArithOp, Instr, Segment},
    symbol::{StaticCounter, SymbolKind, SymbolTable},
};
use crate::{
    constants::{os, MAX_INT_CONSTANT},
    error::SymbolError,
    parsing::{
        AstVisitor, BinaryOp, Class, Expression, IfStmt, LetStmt, Stmt, Subroutine, SubroutineCall,
        SubroutineKind, Term, UnaryOp, WhileStmt,
    },
};
use smol_str::SmolStr;
use std::convert::TryFrom;

/// Code generator.
///
/// Walks the syntax tree of one class and emits stack machine
/// instructions. A generator is consumed by [`CodeGen::compile`],
/// so every class gets fresh symbol tables and label numbering.
pub struct CodeGen {
    /// Resulting generated code.
    code: Vec<Instr>,
    symbols: SymbolTable,
    /// Name of the class being compiled, prefix of every subroutine name.
    class_name: SmolStr,
    /// Source of unique label suffixes, shared by `if` and `while`.
    label_id: u32,
}

impl CodeGen {
    pub fn new(statics: StaticCounter) -> Self {
        Self {
            code: vec![],
            symbols: SymbolTable::new(statics),
            class_name: SmolStr::default(),
            label_id: 0,
        }
    }

    pub fn compile(mut self, class: &Class) -> Result<Vec<Instr>, SymbolError> {
        self.class(class)?;
        log::debug!(
            "generated {} instructions for class '{}'",
            self.code.len(),
            self.class_name
        );
        Ok(self.code)
    }

    #[inline]
    fn emit(&mut self, instr: Instr) {
        self.code.push(instr);
    }

    #[inline]
    fn push(&mut self, segment: Segment, index: u16) {
        self.emit(Instr::Push(segment, index));
    }

    #[inline]
    fn pop(&mut self, segment: Segment, index: u16) {
        self.emit(Instr::Pop(segment, index));
    }

    #[inline]
    fn arith(&mut self, op: ArithOp) {
        self.emit(Instr::Arith(op));
    }

    fn emit_call(&mut self, name: impl ToString, args: u16) {
        self.emit(Instr::Call {
            name: name.to_string(),
            args,
        });
    }

    /// Allocate the next label suffix.
    fn next_label_id(&mut self) -> u32 {
        let id = self.label_id;
        self.label_id += 1;
        id
    }

    fn statements(&mut self, stmts: &[Stmt]) -> Result<(), SymbolError> {
        for stmt in stmts {
            self.stmt(stmt)?;
        }
        Ok(())
    }

    /// Push the value of a named variable.
    fn push_var(&mut self, name: &str) -> Result<(), SymbolError> {
        let (segment, index) = self.lookup(name)?;
        self.push(segment, index);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<(Segment, u16), SymbolError> {
        self.symbols
            .resolve(name)
            .map(|symbol| (symbol.segment(), symbol.index))
            .ok_or_else(|| SymbolError::Unresolved { name: name.into() })
    }

    /// Push the address of an array element, `base + index`.
    fn array_address(&mut self, base: &str, index: &Expression) -> Result<(), SymbolError> {
        self.push_var(base)?;
        self.expr(index)?;
        self.arith(ArithOp::Add);
        Ok(())
    }

    /// Strings are built one UTF-16 unit at a time, and every
    /// unit and the length must fit a `push constant`.
    fn string_const(&mut self, value: &str) -> Result<(), SymbolError> {
        let units = value.encode_utf16().collect::<Vec<_>>();
        let len = u16::try_from(units.len())
            .ok()
            .filter(|len| *len <= MAX_INT_CONSTANT)
            .ok_or(SymbolError::Overflow { segment: "constant" })?;
        if units.iter().any(|unit| *unit > MAX_INT_CONSTANT) {
            return Err(SymbolError::Overflow { segment: "constant" });
        }

        self.push(Segment::Constant, len);
        self.emit_call(os::STRING_NEW, 1);
        for unit in units {
            self.push(Segment::Constant, unit);
            self.emit_call(os::STRING_APPEND_CHAR, 2);
        }
        Ok(())
    }

    fn binary_op(&mut self, op: BinaryOp) {
        match op {
            BinaryOp::Add => self.arith(ArithOp::Add),
            BinaryOp::Subtract => self.arith(ArithOp::Sub),
            BinaryOp::And => self.arith(ArithOp::And),
            BinaryOp::Or => self.arith(ArithOp::Or),
            BinaryOp::Lesser => self.arith(ArithOp::Lt),
            BinaryOp::Greater => self.arith(ArithOp::Gt),
            BinaryOp::Equal => self.arith(ArithOp::Eq),
            // No native multiply or divide on the target machine.
            BinaryOp::Multiply => self.emit_call(os::MATH_MULTIPLY, 2),
            BinaryOp::Divide => self.emit_call(os::MATH_DIVIDE, 2),
        }
    }

    /// Declare the class level variables.
    fn class_variables(&mut self, class: &Class) -> Result<(), SymbolError> {
        for decl in &class.variables {
            let kind = if decl.is_static {
                SymbolKind::Static
            } else {
                SymbolKind::Field
            };
            for name in &decl.identifiers {
                self.symbols.declare(name.clone(), kind, decl.ty.clone())?;
            }
        }
        Ok(())
    }
}

fn arg_count(arguments: &[Expression], receiver: bool) -> Result<u16, SymbolError> {
    u16::try_from(arguments.len())
        .ok()
        .and_then(|count| count.checked_add(u16::from(receiver)))
        .ok_or(SymbolError::Overflow { segment: "argument" })
}

impl AstVisitor for CodeGen {
    type Output = Result<(), SymbolError>;

    fn class(&mut self, class: &Class) -> Self::Output {
        self.class_name = class.identifier.clone();
        self.class_variables(class)?;

        for subroutine in &class.subroutines {
            self.subroutine(subroutine)?;
        }
        Ok(())
    }

    fn subroutine(&mut self, subroutine: &Subroutine) -> Self::Output {
        log::trace!(
            "{} {}.{}",
            subroutine.kind,
            self.class_name,
            subroutine.identifier
        );

        self.symbols
            .start_subroutine(subroutine.kind == SubroutineKind::Method);
        for param in &subroutine.parameters {
            self.symbols
                .declare(param.identifier.clone(), SymbolKind::Argument, param.ty.clone())?;
        }
        for decl in &subroutine.locals {
            for name in &decl.identifiers {
                self.symbols
                    .declare(name.clone(), SymbolKind::Local, decl.ty.clone())?;
            }
        }

        let name = format!("{}.{}", self.class_name, subroutine.identifier);
        let locals = self.symbols.local_count();
        self.emit(Instr::Function { name, locals });

        match subroutine.kind {
            SubroutineKind::Function => {}
            SubroutineKind::Method => {
                self.push(Segment::Argument, 0);
                self.pop(Segment::Pointer, 0);
            }
            SubroutineKind::Constructor => {
                let size = self.symbols.field_count();
                self.push(Segment::Constant, size);
                self.emit_call(os::MEMORY_ALLOC, 1);
                self.pop(Segment::Pointer, 0);
            }
        }

        self.statements(&subroutine.body)
    }

    fn let_stmt(&mut self, stmt: &LetStmt) -> Self::Output {
        match &stmt.index {
            None => {
                self.expr(&stmt.value)?;
                let (segment, index) = self.lookup(&stmt.identifier)?;
                self.pop(segment, index);
            }
            Some(index) => {
                // Address is parked in temp 0 while the value is evaluated,
                // which may itself use pointer 1.
                self.array_address(&stmt.identifier, index)?;
                self.pop(Segment::Temp, 0);
                self.expr(&stmt.value)?;
                self.push(Segment::Temp, 0);
                self.pop(Segment::Pointer, 1);
                self.pop(Segment::That, 0);
            }
        }
        Ok(())
    }

    fn if_stmt(&mut self, stmt: &IfStmt) -> Self::Output {
        let id = self.next_label_id();
        let on_true = format!("IF_TRUE_{id}");
        let end = format!("IF_END_{id}");

        self.expr(&stmt.condition)?;
        self.emit(Instr::IfGoto(on_true.clone()));
        self.statements(&stmt.else_branch)?;
        self.emit(Instr::Goto(end.clone()));
        self.emit(Instr::Label(on_true));
        self.statements(&stmt.then_branch)?;
        self.emit(Instr::Label(end));
        Ok(())
    }

    fn while_stmt(&mut self, stmt: &WhileStmt) -> Self::Output {
        let id = self.next_label_id();
        let begin = format!("WHILE_BEGIN_{id}");
        let end = format!("WHILE_END_{id}");

        self.emit(Instr::Label(begin.clone()));
        self.expr(&stmt.condition)?;
        self.arith(ArithOp::Not);
        self.emit(Instr::IfGoto(end.clone()));
        self.statements(&stmt.body)?;
        self.emit(Instr::Goto(begin));
        self.emit(Instr::Label(end));
        Ok(())
    }

    fn do_stmt(&mut self, call: &SubroutineCall) -> Self::Output {
        self.call(call)?;
        // Every subroutine returns a value, void ones included.
        self.pop(Segment::Temp, 0);
        Ok(())
    }

    fn return_stmt(&mut self, value: &Expression) -> Self::Output {
        self.expr(value)?;
        self.emit(Instr::Return);
        Ok(())
    }

    fn expr(&mut self, expr: &Expression) -> Self::Output {
        self.term(&expr.primary)?;
        for (op, term) in &expr.secondaries {
            self.term(term)?;
            self.binary_op(*op);
        }
        Ok(())
    }

    fn term(&mut self, term: &Term) -> Self::Output {
        match term {
            Term::IntConst(value) => self.push(Segment::Constant, *value),
            Term::StringConst(value) => self.string_const(value)?,
            Term::Null | Term::False => self.push(Segment::Constant, 0),
            Term::True => {
                self.push(Segment::Constant, 0);
                self.arith(ArithOp::Not);
            }
            Term::This => self.push(Segment::Pointer, 0),
            Term::Var(name) => self.push_var(name)?,
            Term::Index { identifier, index } => {
                self.array_address(identifier, index)?;
                self.pop(Segment::Pointer, 1);
                self.push(Segment::That, 0);
            }
            Term::Paren(expr) => self.expr(expr)?,
            Term::Unary { op, operand } => {
                self.term(operand)?;
                match op {
                    UnaryOp::Negate => self.arith(ArithOp::Neg),
                    UnaryOp::Invert => self.arith(ArithOp::Not),
                }
            }
            Term::Call(call) => self.call(call)?,
        }
        Ok(())
    }

    /// Emit a subroutine call with one of three calling conventions.
    ///
    /// - No prefix is a method call on the current object.
    /// - A prefix naming a variable is a method call on that
    ///   variable, dispatched on its declared type.
    /// - Any other prefix is taken as a class name, and the call
    ///   is a function or constructor call without a receiver.
    fn call(&mut self, call: &SubroutineCall) -> Self::Output {
        let (class, receiver) = match &call.callee {
            None => {
                self.push(Segment::Pointer, 0);
                (self.class_name.to_string(), true)
            }
            Some(callee) => match self.symbols.resolve(callee) {
                Some(symbol) => {
                    let (segment, index, class) = (symbol.segment(), symbol.index, symbol.ty.to_string());
                    self.push(segment, index);
                    (class, true)
                }
                None => (callee.to_string(), false),
            },
        };

        for argument in &call.arguments {
            self.expr(argument)?;
        }

        let args = arg_count(&call.arguments, receiver)?;
        self.emit_call(format!("{}.{}", class, call.identifier), args);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{compile::render, lex::tokenize, parsing::parse};

    fn generate_src(source: &str) -> Result<Vec<Instr>, SymbolError> {
        let tokens = tokenize(source).unwrap();
        let class = parse(&tokens).unwrap();
        CodeGen::new(StaticCounter::new()).compile(&class)
    }

    fn vm(source: &str) -> String {
        render(&generate_src(source).unwrap())
    }

    #[test]
    fn test_function_header_counts_local_names() {
        let text = vm("class A { function void f() { var int a, b; var char c; return; } }");
        assert_eq!(text, "function A.f 3\npush constant 0\nreturn\n");
    }

    #[test]
    fn test_method_binds_receiver() {
        let text = vm("class A { field int x; method int getX() { return x; } }");
        assert_eq!(
            text,
            "function A.getX 0\n\
             push argument 0\n\
             pop pointer 0\n\
             push this 0\n\
             return\n"
        );
    }

    #[test]
    fn test_constructor_allocates_fields() {
        let text = vm("class P { field int x, y; static int n; constructor P new() { return this; } }");
        assert_eq!(
            text,
            "function P.new 0\n\
             push constant 2\n\
             call Memory.alloc 1\n\
             pop pointer 0\n\
             push pointer 0\n\
             return\n"
        );
    }

    #[test]
    fn test_labels_shared_between_if_and_while() {
        let text = vm("class A { function void f() {
            if (true) { }
            while (false) { }
            if (true) { } else { }
            return;
        } }");
        assert!(text.contains("label IF_TRUE_0\n"));
        assert!(text.contains("label WHILE_BEGIN_1\n"));
        assert!(text.contains("label IF_END_2\n"));
    }

    #[test]
    fn test_array_store_parks_address() {
        let text = vm("class A { function void f(Array a) { let a[1] = a[2]; return; } }");
        assert_eq!(
            text,
            "function A.f 0\n\
             push argument 0\n\
             push constant 1\n\
             add\n\
             pop temp 0\n\
             push argument 0\n\
             push constant 2\n\
             add\n\
             pop pointer 1\n\
             push that 0\n\
             push temp 0\n\
             pop pointer 1\n\
             pop that 0\n\
             push constant 0\n\
             return\n"
        );
    }

    #[test]
    fn test_operators_left_to_right() {
        let text = vm("class A { function int f(int x) { return -x * 2 / (x - 1); } }");
        assert_eq!(
            text,
            "function A.f 0\n\
             push argument 0\n\
             neg\n\
             push constant 2\n\
             call Math.multiply 2\n\
             push argument 0\n\
             push constant 1\n\
             sub\n\
             call Math.divide 2\n\
             return\n"
        );
    }

    #[test]
    fn test_keyword_constants() {
        let text = vm("class A { method boolean f() { return ~(true & (null = this)); } }");
        assert_eq!(
            text,
            "function A.f 0\n\
             push argument 0\n\
             pop pointer 0\n\
             push constant 0\n\
             not\n\
             push constant 0\n\
             push pointer 0\n\
             eq\n\
             and\n\
             not\n\
             return\n"
        );
    }

    #[test]
    fn test_implicit_call_on_current_object() {
        let text = vm("class A { method void f() { do g(1); return; } }");
        assert_eq!(
            text,
            "function A.f 0\n\
             push argument 0\n\
             pop pointer 0\n\
             push pointer 0\n\
             push constant 1\n\
             call A.g 2\n\
             pop temp 0\n\
             push constant 0\n\
             return\n"
        );
    }

    #[test]
    fn test_call_on_variable_uses_declared_type() {
        let text = vm("class A { function void f(int a, Ball b) { do b.bounce(a); return; } }");
        assert_eq!(
            text,
            "function A.f 0\n\
             push argument 1\n\
             push argument 0\n\
             call Ball.bounce 2\n\
             pop temp 0\n\
             push constant 0\n\
             return\n"
        );
    }

    #[test]
    fn test_unresolved_variable() {
        assert_eq!(
            generate_src("class A { function int f() { return y; } }"),
            Err(SymbolError::Unresolved { name: "y".into() })
        );
        assert_eq!(
            generate_src("class A { function void f() { let z = 1; return; } }"),
            Err(SymbolError::Unresolved { name: "z".into() })
        );
    }

    #[test]
    fn test_duplicate_parameter() {
        assert_eq!(
            generate_src("class A { function void f(int a, int a) { return; } }"),
            Err(SymbolError::Duplicate { name: "a".into() })
        );
    }

    #[test]
    fn test_let_reports_value_before_target() {
        assert_eq!(
            generate_src("class A { function void f() { let z = y; return; } }"),
            Err(SymbolError::Unresolved { name: "y".into() })
        );
    }

    #[test]
    fn test_string_outside_constant_range() {
        // Surrogate pairs are above the largest pushable constant.
        assert_eq!(
            generate_src("class A { function String f() { return \"\u{1F600}\"; } }"),
            Err(SymbolError::Overflow { segment: "constant" })
        );

        let long = "a".repeat(MAX_INT_CONSTANT as usize + 1);
        let source = format!("class A {{ function String f() {{ return \"{long}\"; }} }}");
        assert_eq!(
            generate_src(&source),
            Err(SymbolError::Overflow { segment: "constant" })
        );

        let longest = "a".repeat(MAX_INT_CONSTANT as usize);
        let source = format!("class A {{ function String f() {{ return \"{longest}\"; }} }}");
        let code = generate_src(&source).unwrap();
        assert_eq!(code[1], Instr::Push(Segment::Constant, MAX_INT_CONSTANT));
    }

    #[test]
    fn test_string_counts_utf16_units() {
        let code = generate_src("class A { function String f() { return \"é\"; } }").unwrap();
        assert_eq!(code[1], Instr::Push(Segment::Constant, 1));
        assert_eq!(code[3], Instr::Push(Segment::Constant, 0xE9));
    }
}
