use super::{
    class::Class,
    expr::{Expression, SubroutineCall, Term},
    stmts::{IfStmt, LetStmt, Stmt, WhileStmt},
    subroutine::Subroutine,
};

/// Walks the syntax tree of one class.
///
/// Statement dispatch is provided, each node kind
/// is handled by the implementor.
pub trait AstVisitor {
    type Output;
    fn class(&mut self, class: &Class) -> Self::Output;
    fn subroutine(&mut self, subroutine: &Subroutine) -> Self::Output;
    fn let_stmt(&mut self, stmt: &LetStmt) -> Self::Output;
    fn if_stmt(&mut self, stmt: &IfStmt) -> Self::Output;
    fn while_stmt(&mut self, stmt: &WhileStmt) -> Self::Output;
    fn do_stmt(&mut self, call: &SubroutineCall) -> Self::Output;
    fn return_stmt(&mut self, value: &Expression) -> Self::Output;
    fn expr(&mut self, expr: &Expression) -> Self::Output;
    fn term(&mut self, term: &Term) -> Self::Output;
    fn call(&mut self, call: &SubroutineCall) -> Self::Output;

    #[inline]
    fn stmt(&mut self, stmt: &Stmt) -> Self::Output {
        match stmt {
            Stmt::Let(stmt) => self.let_stmt(stmt),
            Stmt::If(stmt) => self.if_stmt(stmt),
            Stmt::While(stmt) => self.while_stmt(stmt),
            Stmt::Do(call) => self.do_stmt(call),
            Stmt::Return(value) => self.return_stmt(value),
        }
    }
}
